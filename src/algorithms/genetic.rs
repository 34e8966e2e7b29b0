//! Real-coded genetic algorithm
//!
//! Parents are chosen by rank-based roulette selection, recombined by
//! arithmetic crossover and mutated by non-uniform mutation, whose step
//! size shrinks as the run advances. The best `elitism` individuals are
//! copied into the next generation unchanged. At least one individual
//! survives, so the best fitness never gets worse.

use crate::error::{Error, Result};
use crate::experiment::{trial_rng, Experiment, HyperParameters, Problem, TrialResult};
use crate::population::{mean_fitness, sort_by_fitness, Candidate};

use rand::seq::SliceRandom;
use rand::Rng;

/// Hyperparameters of [`GeneticAlgorithm`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneticSettings {
    /// Number of individuals (`populationSize`)
    pub population_size: usize,
    /// Number of generations (`numberOfGenerations`)
    pub generations: usize,
    /// Probability to mutate an offspring (`mutationRate`)
    pub mutation_rate: f64,
    /// Probability to recombine a pair of parents (`crossoverRate`)
    pub crossover_rate: f64,
    /// Number of best individuals surviving unchanged (`elitism`)
    pub elitism: usize,
}

impl Default for GeneticSettings {
    fn default() -> Self {
        GeneticSettings {
            population_size: 100,
            generations: 50,
            mutation_rate: 0.1,
            crossover_rate: 0.9,
            elitism: 1,
        }
    }
}

/// Selection weight of the individual at sorted position `position`
/// (zero is best) in a population of size `len`
pub fn rank_weight(position: usize, len: usize) -> f64 {
    let rank = (len - position) as f64;
    2.0 * (1.0 - (-rank / 2.0).exp())
}

/// Genetic algorithm
#[derive(Clone, Debug)]
pub struct GeneticAlgorithm {
    problem: Problem,
    settings: GeneticSettings,
}

impl Default for GeneticAlgorithm {
    fn default() -> Self {
        GeneticAlgorithm {
            problem: Problem::new(100),
            settings: GeneticSettings::default(),
        }
    }
}

fn probability(params: &HyperParameters, name: &str, default: f64) -> Result<f64> {
    let value = params.real(name, default)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidHyperParameter {
            name: name.to_owned(),
            value,
            reason: "must be between 0 and 1",
        });
    }
    Ok(value)
}

impl GeneticAlgorithm {
    /// Registered name
    pub const NAME: &'static str = "GeneticAlgorithm";
    /// Current hyperparameters
    pub fn settings(&self) -> &GeneticSettings {
        &self.settings
    }
    /// Indices of selected parents (population must be sorted best first)
    fn rank_selection<R: Rng + ?Sized>(&self, rng: &mut R, len: usize) -> Vec<usize> {
        let weights: Vec<f64> = (0..len).map(|p| rank_weight(p, len)).collect();
        let total: f64 = weights.iter().sum();
        let mut parents: Vec<usize> = (0..len)
            .map(|_| {
                let target = rng.gen::<f64>() * total;
                let mut cumulative = 0.0;
                weights
                    .iter()
                    .position(|weight| {
                        cumulative += weight;
                        cumulative > target
                    })
                    .unwrap_or(len - 1)
            })
            .collect();
        parents.shuffle(rng);
        parents
    }
    /// Arithmetic crossover with one blend factor for all coordinates
    fn crossover<R: Rng + ?Sized>(rng: &mut R, a: &[f64], b: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let d: f64 = rng.gen();
        let first = a.iter().zip(b).map(|(x, y)| x * d + y * (1.0 - d)).collect();
        let second = a.iter().zip(b).map(|(x, y)| y * d + x * (1.0 - d)).collect();
        (first, second)
    }
    /// Non-uniform mutation of one random coordinate
    fn mutate<R: Rng + ?Sized>(&self, rng: &mut R, position: &mut [f64], generation: usize) {
        if rng.gen::<f64>() >= self.settings.mutation_rate {
            return;
        }
        let boundary = self.problem.boundary;
        let progress = generation as f64 / self.settings.generations as f64;
        let shrink = 1.0 - rng.gen::<f64>().powf((1.0 - progress).powi(3));
        let i = rng.gen_range(0..position.len());
        let x = position[i];
        position[i] = boundary.clamp(if rng.gen_bool(0.5) {
            x + (boundary.upper - x) * shrink
        } else {
            x - (x - boundary.lower) * shrink
        });
    }
    /// Create offspring from consecutive pairs of parents
    fn reproduce<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        population: &[Candidate],
        parents: &[usize],
        generation: usize,
    ) -> Vec<Candidate> {
        let mut positions: Vec<Vec<f64>> = Vec::with_capacity(parents.len());
        for pair in parents.chunks(2) {
            match *pair {
                [a, b] if rng.gen::<f64>() < self.settings.crossover_rate => {
                    let (first, second) =
                        Self::crossover(rng, &population[a].position, &population[b].position);
                    positions.push(first);
                    positions.push(second);
                }
                _ => positions.extend(pair.iter().map(|&p| population[p].position.clone())),
            }
        }
        positions
            .into_iter()
            .map(|mut position| {
                self.mutate(rng, &mut position, generation);
                self.problem.candidate(position)
            })
            .collect()
    }
}

impl Experiment for GeneticAlgorithm {
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
        let population_size = params.count("populationSize", defaults.population_size, 2)?;
        let elitism = params.count("elitism", defaults.elitism, 1)?;
        if elitism >= population_size {
            return Err(Error::InvalidHyperParameter {
                name: "elitism".to_owned(),
                value: elitism as f64,
                reason: "must be smaller than the population size",
            });
        }
        let settings = GeneticSettings {
            population_size,
            generations: params.count("numberOfGenerations", defaults.generations, 0)?,
            mutation_rate: probability(params, "mutationRate", defaults.mutation_rate)?,
            crossover_rate: probability(params, "crossoverRate", defaults.crossover_rate)?,
            elitism,
        };
        self.problem.dimensions = dimensions;
        self.settings = settings;
        Ok(())
    }
    fn run_trial_seeded(&self, seed: u64) -> TrialResult {
        let mut rng = trial_rng(seed);
        let size = self.settings.population_size;
        let elitism = self.settings.elitism;
        let mut population: Vec<Candidate> = (0..size)
            .map(|_| self.problem.random_candidate(&mut rng))
            .collect();
        sort_by_fitness(&mut population);
        let mut history = Vec::with_capacity(self.settings.generations + 1);
        for generation in 0..self.settings.generations {
            history.push(population[0].fitness);
            let parents = self.rank_selection(&mut rng, size);
            let offspring = self.reproduce(&mut rng, &population, &parents, generation);
            population.truncate(elitism);
            population.extend(offspring.into_iter().take(size - elitism));
            sort_by_fitness(&mut population);
        }
        history.push(population[0].fitness);
        let mean_fit = mean_fitness(&population);
        TrialResult::new(population.swap_remove(0), mean_fit, history)
    }
}
