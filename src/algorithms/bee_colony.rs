//! Artificial bee colony with neighbourhood-guided search
//!
//! Every food source carries a counter of failed improvement attempts.
//! A cycle consists of three phases:
//!
//! * employed bees move one random coordinate of each source relative to
//!   the best source of its ring neighbourhood (plus an optional pull toward
//!   the global best, weighted by `c`),
//! * onlooker bees start from the neighbourhood best instead,
//! * scout bees replace exhausted sources by the best of a random source, a
//!   recombination around the neighbourhood best, and the reflection of the
//!   neighbourhood best within the per-dimension range of the colony.
//!
//! The pool is sorted by fitness after every cycle, so ring neighbourhoods
//! consist of sources of similar rank. The search stops after an evaluation
//! budget of `maxIterations × dimensions` fitness evaluations.

use crate::error::Result;
use crate::experiment::{trial_rng, Experiment, HyperParameters, Problem, TrialResult};
use crate::population::{cmp_fitness, mean_fitness, Candidate};

use rand::Rng;
use std::cmp::Ordering;

/// Hyperparameters of [`ArtificialBeeColony`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeeColonySettings {
    /// Number of food sources (`foodSourcePoolSize`)
    pub pool_size: usize,
    /// Radius of the ring neighbourhood (`neighbourSearch`)
    pub neighbour_search: usize,
    /// Failed attempts after which a source is abandoned (`abondmendLimit`)
    pub abandonment_limit: usize,
    /// Evaluations per dimension (`maxIterations`)
    pub max_iterations: usize,
    /// Weight of the pull toward the global best (`c`)
    pub c: f64,
}

impl Default for BeeColonySettings {
    fn default() -> Self {
        BeeColonySettings {
            pool_size: 100,
            neighbour_search: 5,
            abandonment_limit: 100,
            max_iterations: 3000,
            c: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
struct FoodSource {
    candidate: Candidate,
    failures: usize,
}

impl FoodSource {
    fn new(candidate: Candidate) -> Self {
        FoodSource {
            candidate,
            failures: 0,
        }
    }
    fn position(&self) -> &[f64] {
        &self.candidate.position
    }
    /// Replace source if `candidate` is strictly better, count failure
    /// otherwise
    fn offer(&mut self, candidate: Candidate) {
        if candidate.cmp_fitness(&self.candidate) == Ordering::Less {
            *self = FoodSource::new(candidate);
        } else {
            self.failures += 1;
        }
    }
}

/// Artificial bee colony
#[derive(Clone, Debug)]
pub struct ArtificialBeeColony {
    problem: Problem,
    settings: BeeColonySettings,
}

impl Default for ArtificialBeeColony {
    fn default() -> Self {
        ArtificialBeeColony {
            problem: Problem::new(30),
            settings: BeeColonySettings::default(),
        }
    }
}

fn best_of(sources: &[FoodSource], indices: impl Iterator<Item = usize>) -> usize {
    indices
        .min_by(|&a, &b| sources[a].candidate.cmp_fitness(&sources[b].candidate))
        .unwrap_or(0)
}

fn random_index_excluding<R: Rng + ?Sized>(rng: &mut R, len: usize, excluded: &[usize]) -> usize {
    loop {
        let idx = rng.gen_range(0..len);
        if !excluded.contains(&idx) {
            return idx;
        }
    }
}

impl ArtificialBeeColony {
    /// Registered name
    pub const NAME: &'static str = "ArtificialBeeColony";
    /// Current hyperparameters
    pub fn settings(&self) -> &BeeColonySettings {
        &self.settings
    }
    /// Total number of fitness evaluations per trial
    pub fn evaluation_budget(&self) -> usize {
        self.settings.max_iterations * self.problem.dimensions
    }
    /// Indices `i - s` and `i + s` (wrapping) for `s` below the search radius
    fn neighbourhood(&self, len: usize, i: usize) -> impl Iterator<Item = usize> {
        let radius = self.settings.neighbour_search;
        (0..radius).flat_map(move |s| {
            let s = s % len;
            [(i + len - s) % len, (i + s) % len]
        })
    }
    fn neighbourhood_best(&self, sources: &[FoodSource], i: usize) -> usize {
        best_of(sources, self.neighbourhood(sources.len(), i))
    }
    fn employed_phase<R: Rng + ?Sized>(&self, rng: &mut R, sources: &mut [FoodSource]) -> usize {
        let n = sources.len();
        for i in 0..n {
            let j = rng.gen_range(0..self.problem.dimensions);
            let best_j = sources[best_of(sources, 0..n)].position()[j];
            let nb_j = sources[self.neighbourhood_best(sources, i)].position()[j];
            let phi: f64 = rng.gen_range(-1.0..1.0);
            let phi_c = rng.gen::<f64>() * self.settings.c;
            let k = random_index_excluding(rng, n, &[i]);
            let mut position = sources[i].position().to_vec();
            position[j] = self
                .problem
                .boundary
                .clamp(nb_j + phi * (nb_j - sources[k].position()[j]) + phi_c * (best_j - nb_j));
            sources[i].offer(self.problem.candidate(position));
        }
        n
    }
    fn onlooker_phase<R: Rng + ?Sized>(&self, rng: &mut R, sources: &mut [FoodSource]) -> usize {
        let n = sources.len();
        for i in 0..n {
            let j = rng.gen_range(0..self.problem.dimensions);
            let mut position = sources[self.neighbourhood_best(sources, i)].position().to_vec();
            let phi: f64 = rng.gen_range(-1.0..1.0);
            let k = random_index_excluding(rng, n, &[i]);
            let nb_j = position[j];
            position[j] = self
                .problem
                .boundary
                .clamp(nb_j + phi * (nb_j - sources[k].position()[j]));
            sources[i].offer(self.problem.candidate(position));
        }
        n
    }
    fn scout_phase<R: Rng + ?Sized>(&self, rng: &mut R, sources: &mut [FoodSource]) -> usize {
        let n = sources.len();
        let dim = self.problem.dimensions;
        let mut evaluations = 0;
        for i in 0..n {
            if sources[i].failures < self.settings.abandonment_limit {
                continue;
            }
            let ib = self.neighbourhood_best(sources, i);
            let r1 = random_index_excluding(rng, n, &[ib]);
            let r2 = random_index_excluding(rng, n, &[ib, r1]);
            let nb = sources[ib].position();
            let mut recombined = Vec::with_capacity(dim);
            let mut reflected = Vec::with_capacity(dim);
            for j in 0..dim {
                let step = rng.gen::<f64>() * (sources[r1].position()[j] - sources[r2].position()[j]);
                recombined.push(self.problem.boundary.clamp(nb[j] + step));
                let (min, max) = sources
                    .iter()
                    .map(|source| source.position()[j])
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), x| {
                        (min.min(x), max.max(x))
                    });
                reflected.push(self.problem.boundary.clamp(min + max - nb[j]));
            }
            let replacement = [
                self.problem.random_candidate(rng),
                self.problem.candidate(recombined),
                self.problem.candidate(reflected),
            ]
            .into_iter()
            .min_by(Candidate::cmp_fitness)
            .map(FoodSource::new);
            if let Some(replacement) = replacement {
                sources[i] = replacement;
            }
            evaluations += 3;
        }
        evaluations
    }
    /// Run employed, onlooker and scout phase, then sort the pool
    ///
    /// Returns the number of fitness evaluations and keeps the best source
    /// ever seen in `best`.
    fn cycle<R: Rng + ?Sized>(&self, rng: &mut R, sources: &mut [FoodSource], best: &mut Candidate) -> usize {
        let mut evaluations = self.employed_phase(rng, sources);
        evaluations += self.onlooker_phase(rng, sources);
        memorize(sources, best);
        evaluations += self.scout_phase(rng, sources);
        sort_pool(sources);
        memorize(sources, best);
        evaluations
    }
}

fn sort_pool(sources: &mut [FoodSource]) {
    sources.sort_by(|a, b| a.candidate.cmp_fitness(&b.candidate));
}

/// Keep the best candidate ever seen in `best`
fn memorize(sources: &[FoodSource], best: &mut Candidate) {
    let idx = best_of(sources, 0..sources.len());
    if cmp_fitness(sources[idx].candidate.fitness, best.fitness) == Ordering::Less {
        *best = sources[idx].candidate.clone();
    }
}

impl Experiment for ArtificialBeeColony {
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
        let settings = BeeColonySettings {
            pool_size: params.count("foodSourcePoolSize", defaults.pool_size, 3)?,
            neighbour_search: params.count("neighbourSearch", defaults.neighbour_search, 1)?,
            abandonment_limit: params.count("abondmendLimit", defaults.abandonment_limit, 1)?,
            max_iterations: params.count("maxIterations", defaults.max_iterations, 0)?,
            c: params.real("c", defaults.c)?,
        };
        self.problem.dimensions = dimensions;
        self.settings = settings;
        Ok(())
    }
    fn run_trial_seeded(&self, seed: u64) -> TrialResult {
        let mut rng = trial_rng(seed);
        let mut sources: Vec<FoodSource> = (0..self.settings.pool_size)
            .map(|_| FoodSource::new(self.problem.random_candidate(&mut rng)))
            .collect();
        sort_pool(&mut sources);
        let mut best = sources[0].candidate.clone();
        let budget = self.evaluation_budget();
        let mut evaluations = sources.len();
        let mut history = Vec::new();
        while evaluations < budget {
            history.push(best.fitness);
            evaluations += self.cycle(&mut rng, &mut sources, &mut best);
        }
        history.push(best.fitness);
        let candidates: Vec<Candidate> = sources.into_iter().map(|source| source.candidate).collect();
        let mean_fit = mean_fitness(&candidates);
        TrialResult::new(best, mean_fit, history)
    }
}
