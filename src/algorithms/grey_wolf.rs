//! Grey wolf optimizer
//!
//! The three best wolves (alpha, beta and delta) lead the pack. Every other
//! wolf moves to the average of three positions, each derived from one
//! leader, and keeps the move only if it improves its fitness. Wolves are
//! updated in parallel, each with a generator seeded from the trial's
//! generator, so results do not depend on thread scheduling.

use crate::error::Result;
use crate::experiment::{trial_rng, Experiment, HyperParameters, Problem, TrialResult};
use crate::population::{mean_fitness, sort_by_fitness, Candidate};

use rand::Rng;
use rayon::prelude::*;

/// Hyperparameters of [`GreyWolfAlgorithm`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreyWolfSettings {
    /// Number of wolves (`populationSize`)
    pub population_size: usize,
    /// Number of generations (`maxGenerations`)
    pub generations: usize,
}

impl Default for GreyWolfSettings {
    fn default() -> Self {
        GreyWolfSettings {
            population_size: 30,
            generations: 50,
        }
    }
}

/// Grey wolf optimizer
#[derive(Clone, Debug)]
pub struct GreyWolfAlgorithm {
    problem: Problem,
    settings: GreyWolfSettings,
}

impl Default for GreyWolfAlgorithm {
    fn default() -> Self {
        GreyWolfAlgorithm {
            problem: Problem::new(30),
            settings: GreyWolfSettings::default(),
        }
    }
}

impl GreyWolfAlgorithm {
    /// Registered name
    pub const NAME: &'static str = "GreyWolfAlgorithm";
    /// Current hyperparameters
    pub fn settings(&self) -> &GreyWolfSettings {
        &self.settings
    }
    /// Propose a new position following the three leaders
    ///
    /// `a` decreases linearly from 2 to 0 over the run.
    fn hunt<R: Rng + ?Sized>(&self, rng: &mut R, wolf: &[f64], leaders: &[Vec<f64>], a: f64) -> Vec<f64> {
        let steps: Vec<(f64, f64)> = leaders
            .iter()
            .map(|_| (a * (2.0 * rng.gen::<f64>() - 1.0), 2.0 * rng.gen::<f64>()))
            .collect();
        let count = leaders.len() as f64;
        let mut position: Vec<f64> = wolf
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let sum: f64 = leaders
                    .iter()
                    .zip(&steps)
                    .map(|(leader, &(big_a, big_c))| {
                        leader[i] - big_a * (big_c * leader[i] - x).abs()
                    })
                    .sum();
                sum / count
            })
            .collect();
        self.problem.clamp(&mut position);
        position
    }
}

impl Experiment for GreyWolfAlgorithm {
    fn name(&self) -> &'static str {
        Self::NAME
    }
    fn problem(&self) -> &Problem {
        &self.problem
    }
    fn problem_mut(&mut self) -> &mut Problem {
        &mut self.problem
    }
    fn set_hyper_parameters(&mut self, params: &HyperParameters) -> Result<()> {
        let dimensions = self.problem.read_dimensions(params)?;
        let defaults = self.settings;
        let settings = GreyWolfSettings {
            population_size: params.count("populationSize", defaults.population_size, 3)?,
            generations: params.count("maxGenerations", defaults.generations, 0)?,
        };
        self.problem.dimensions = dimensions;
        self.settings = settings;
        Ok(())
    }
    fn run_trial_seeded(&self, seed: u64) -> TrialResult {
        let mut rng = trial_rng(seed);
        let generations = self.settings.generations;
        let mut pack: Vec<Candidate> = (0..self.settings.population_size)
            .map(|_| self.problem.random_candidate(&mut rng))
            .collect();
        sort_by_fitness(&mut pack);
        let mut history = Vec::with_capacity(generations + 1);
        for generation in 0..generations {
            history.push(pack[0].fitness);
            let a = 2.0 * (1.0 - generation as f64 / generations as f64);
            let leaders: Vec<Vec<f64>> = pack[..3].iter().map(|c| c.position.clone()).collect();
            let seeds: Vec<u64> = (0..pack.len()).map(|_| rng.gen()).collect();
            pack.par_iter_mut()
                .zip(seeds)
                .for_each(|(wolf, seed)| {
                    let mut rng = trial_rng(seed);
                    let position = self.hunt(&mut rng, &wolf.position, &leaders, a);
                    let moved = self.problem.candidate(position);
                    if moved.cmp_fitness(wolf).is_lt() {
                        *wolf = moved;
                    }
                });
            sort_by_fitness(&mut pack);
        }
        history.push(pack[0].fitness);
        let mean_fit = mean_fitness(&pack);
        TrialResult::new(pack.swap_remove(0), mean_fit, history)
    }
}
