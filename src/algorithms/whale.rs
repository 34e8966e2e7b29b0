//! Whale optimization algorithm
//!
//! Whales either encircle the best whale, search toward a random other
//! whale, or approach the best whale on a logarithmic spiral. A move is
//! only kept if it improves the whale. Coordinates leaving the boundary are
//! drawn anew instead of being clamped.

use crate::error::Result;
use crate::experiment::{trial_rng, Experiment, HyperParameters, Problem, TrialResult};
use crate::population::{best_index, mean_fitness, Candidate};

use rand::Rng;
use std::f64::consts::PI;

/// Hyperparameters of [`WhaleOptimizationAlgorithm`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WhaleSettings {
    /// Number of whales (`populationSize`)
    pub population_size: usize,
    /// Number of iterations (`maxIterations`)
    pub iterations: usize,
    /// Shape of the logarithmic spiral (`b`)
    pub b: f64,
}

impl Default for WhaleSettings {
    fn default() -> Self {
        WhaleSettings {
            population_size: 30,
            iterations: 50,
            b: 1.0,
        }
    }
}

/// Whale optimization algorithm
#[derive(Clone, Debug)]
pub struct WhaleOptimizationAlgorithm {
    problem: Problem,
    settings: WhaleSettings,
}

impl Default for WhaleOptimizationAlgorithm {
    fn default() -> Self {
        WhaleOptimizationAlgorithm {
            problem: Problem::new(30),
            settings: WhaleSettings::default(),
        }
    }
}

/// Move `whale` toward `prey`, scaled by coefficients `a` and `c`
fn encircle(whale: &[f64], prey: &[f64], a: f64, c: f64) -> Vec<f64> {
    whale
        .iter()
        .zip(prey)
        .map(|(x, p)| p - a * (c * p - x).abs())
        .collect()
}

/// Move `whale` on a logarithmic spiral around `prey`
fn spiral(whale: &[f64], prey: &[f64], b: f64, l: f64) -> Vec<f64> {
    let factor = (b * l).exp() * (2.0 * PI * l).cos();
    whale
        .iter()
        .zip(prey)
        .map(|(x, p)| (p - x).abs() * factor + p)
        .collect()
}

impl WhaleOptimizationAlgorithm {
    /// Registered name
    pub const NAME: &'static str = "WhaleOptimizationAlgorithm";
    /// Current hyperparameters
    pub fn settings(&self) -> &WhaleSettings {
        &self.settings
    }
    /// Propose a new position for whale `index`
    fn hunt<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        pod: &[Candidate],
        index: usize,
        best: &Candidate,
        iteration: usize,
    ) -> Vec<f64> {
        let decay = 2.0 - 2.0 * iteration as f64 / self.settings.iterations as f64;
        let a = 2.0 * decay * rng.gen::<f64>() - decay;
        let c = 2.0 * rng.gen::<f64>();
        let l = rng.gen_range(-1.0..=1.0f64);
        let p: f64 = rng.gen();
        let whale = &pod[index].position;
        let mut position = if p < 0.5 {
            if a.abs() >= 1.0 {
                encircle(whale, &best.position, a, c)
            } else {
                // any whale except this one
                let mut other = rng.gen_range(0..pod.len() - 1);
                if other >= index {
                    other += 1;
                }
                encircle(whale, &pod[other].position, a, c)
            }
        } else {
            spiral(whale, &best.position, self.settings.b, l)
        };
        let boundary = self.problem.boundary;
        for x in position.iter_mut() {
            if !boundary.contains(*x) {
                *x = boundary.sample(rng);
            }
        }
        position
    }
}

impl Experiment for WhaleOptimizationAlgorithm {
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
        let settings = WhaleSettings {
            population_size: params.count("populationSize", defaults.population_size, 2)?,
            iterations: params.count("maxIterations", defaults.iterations, 0)?,
            b: params.real("b", defaults.b)?,
        };
        self.problem.dimensions = dimensions;
        self.settings = settings;
        Ok(())
    }
    fn run_trial_seeded(&self, seed: u64) -> TrialResult {
        let mut rng = trial_rng(seed);
        let mut pod: Vec<Candidate> = (0..self.settings.population_size)
            .map(|_| self.problem.random_candidate(&mut rng))
            .collect();
        let mut best = pod[best_index(&pod).unwrap_or_default()].clone();
        let mut history = Vec::with_capacity(self.settings.iterations + 1);
        for iteration in 0..self.settings.iterations {
            history.push(best.fitness);
            for index in 0..pod.len() {
                let position = self.hunt(&mut rng, &pod, index, &best, iteration);
                let moved = self.problem.candidate(position);
                if moved.cmp_fitness(&pod[index]).is_lt() {
                    if moved.cmp_fitness(&best).is_lt() {
                        best = moved.clone();
                    }
                    pod[index] = moved;
                }
            }
        }
        history.push(best.fitness);
        let mean_fit = mean_fitness(&pod);
        TrialResult::new(best, mean_fit, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::testing::{check_all_functions, check_result, check_seeds, configure};
    use crate::testfuncs::BenchmarkFunction;
    #[test]
    fn test_trials() {
        check_all_functions(
            WhaleOptimizationAlgorithm::default,
            &[("dimensions", 5.0), ("populationSize", 10.0), ("maxIterations", 20.0)],
            Some(20),
        );
    }
    #[test]
    fn test_seeds() {
        let woa = configure(
            WhaleOptimizationAlgorithm::default(),
            BenchmarkFunction::Ackley,
            &[("dimensions", 3.0), ("populationSize", 6.0), ("maxIterations", 5.0)],
        );
        check_seeds(&woa);
    }
    #[test]
    fn test_converges_on_sphere() {
        let woa = configure(
            WhaleOptimizationAlgorithm::default(),
            BenchmarkFunction::Sphere,
            &[("dimensions", 3.0), ("populationSize", 20.0), ("maxIterations", 200.0)],
        );
        let result = woa.run_trial_seeded(12);
        check_result(&woa, &result, Some(200));
        assert!(result.best_fit < 1e-2);
    }
    #[test]
    fn test_two_whales() {
        let woa = configure(
            WhaleOptimizationAlgorithm::default(),
            BenchmarkFunction::Griewank,
            &[("dimensions", 2.0), ("populationSize", 2.0), ("maxIterations", 30.0)],
        );
        let result = woa.run_trial_seeded(4);
        check_result(&woa, &result, Some(30));
    }
    #[test]
    fn test_moves() {
        let whale = [1.0, -2.0];
        let prey = [0.0, 0.0];
        // c = 0 collapses onto the prey distance
        assert_eq!(encircle(&whale, &prey, 1.0, 0.0), vec![-1.0, -2.0]);
        assert_eq!(encircle(&whale, &prey, 0.0, 1.0), vec![0.0, 0.0]);
        // l = 0 puts the whale at prey plus distance
        assert_eq!(spiral(&whale, &prey, 1.0, 0.0), vec![1.0, 2.0]);
        let end = spiral(&whale, &prey, 1.0, -1.0);
        assert!((end[0] - (-1.0f64).exp()).abs() < 1e-12);
    }
    #[test]
    fn test_hunt_stays_in_bounds() {
        let woa = configure(WhaleOptimizationAlgorithm::default(), BenchmarkFunction::Zakharov, &[("dimensions", 4.0)]);
        let mut rng = trial_rng(2);
        let pod: Vec<Candidate> = (0..5).map(|_| woa.problem().random_candidate(&mut rng)).collect();
        for iteration in 0..50 {
            for index in 0..pod.len() {
                let position = woa.hunt(&mut rng, &pod, index, &pod[0], iteration);
                assert!(position.iter().all(|&x| woa.problem().boundary.contains(x)));
            }
        }
    }
    #[test]
    fn test_population_minimum() {
        let mut woa = WhaleOptimizationAlgorithm::default();
        let params: HyperParameters = [("populationSize", 1.0)].into_iter().collect();
        assert!(woa.set_hyper_parameters(&params).is_err());
        assert_eq!(*woa.settings(), WhaleSettings::default());
    }
}
