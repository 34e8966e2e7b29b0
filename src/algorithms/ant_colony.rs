//! Ant colony optimization for continuous domains (Gaussian kernel search)
//!
//! The colony keeps an archive of kernels sorted by fitness. Each
//! generation samples one new candidate per kernel: every coordinate is
//! drawn from a normal distribution centered either at the kernel's own
//! coordinate or at the best kernel's coordinate. Old and new candidates
//! are merged and the best half survives.

use crate::distributions::{LatinHypercube, NormDist};
use crate::error::{Error, Result};
use crate::experiment::{trial_rng, Experiment, HyperParameters, Problem, TrialResult};
use crate::population::{mean_fitness, sort_by_fitness, Candidate};

use rand::distributions::Distribution;
use rand::Rng;

/// Smallest positive subnormal number
///
/// Scaling deviations with it makes the normal distributions degenerate,
/// so new candidates repeat coordinates of existing kernels.
pub const DEFAULT_DEVIATION_SCALE: f64 = 5e-324;

/// Hyperparameters of [`AntColonyOptimizer`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AntColonySettings {
    /// Number of kernels in the archive (`kernels`)
    pub kernels: usize,
    /// Number of generations (`numberOfGenerations`)
    pub generations: usize,
    /// Factor applied to the mean distance between kernels
    /// (`deviationScale`)
    pub deviation_scale: f64,
}

impl Default for AntColonySettings {
    fn default() -> Self {
        AntColonySettings {
            kernels: 50,
            generations: 50,
            deviation_scale: DEFAULT_DEVIATION_SCALE,
        }
    }
}

/// Ant colony kernel search
#[derive(Clone, Debug)]
pub struct AntColonyOptimizer {
    problem: Problem,
    settings: AntColonySettings,
}

impl Default for AntColonyOptimizer {
    fn default() -> Self {
        AntColonyOptimizer {
            problem: Problem::new(30),
            settings: AntColonySettings::default(),
        }
    }
}

impl AntColonyOptimizer {
    /// Registered name
    pub const NAME: &'static str = "AntColonyOptimizer";
    /// Current hyperparameters
    pub fn settings(&self) -> &AntColonySettings {
        &self.settings
    }
    /// Spread of the sampling distribution for every kernel and dimension
    fn deviations(&self, archive: &[Candidate]) -> Vec<Vec<f64>> {
        let norm = (archive.len().max(2) - 1) as f64;
        let scale = self.settings.deviation_scale;
        archive
            .iter()
            .map(|own| {
                (0..self.problem.dimensions)
                    .map(|i| {
                        // own kernel contributes zero
                        let sum: f64 = archive
                            .iter()
                            .map(|other| (other.position[i] - own.position[i]).abs() / norm)
                            .sum();
                        scale * sum
                    })
                    .collect()
            })
            .collect()
    }
    /// Sample one new candidate per kernel
    fn offspring<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        archive: &[Candidate],
        deviations: &[Vec<f64>],
    ) -> Vec<Candidate> {
        let best = &archive[0];
        archive
            .iter()
            .zip(deviations)
            .map(|(own, own_deviations)| {
                let position: Vec<f64> = (0..self.problem.dimensions)
                    .map(|i| {
                        let dist = if rng.gen::<f64>() > 0.5 {
                            NormDist::new(own.position[i], own_deviations[i])
                        } else {
                            NormDist::new(best.position[i], deviations[0][i])
                        };
                        self.problem.boundary.clamp(dist.sample(rng))
                    })
                    .collect();
                self.problem.candidate(position)
            })
            .collect()
    }
}

impl Experiment for AntColonyOptimizer {
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
        let deviation_scale = params.real("deviationScale", defaults.deviation_scale)?;
        if deviation_scale < 0.0 {
            return Err(Error::InvalidHyperParameter {
                name: "deviationScale".to_owned(),
                value: deviation_scale,
                reason: "must not be negative",
            });
        }
        let settings = AntColonySettings {
            kernels: params.count("kernels", defaults.kernels, 1)?,
            generations: params.count("numberOfGenerations", defaults.generations, 0)?,
            deviation_scale,
        };
        self.problem.dimensions = dimensions;
        self.settings = settings;
        Ok(())
    }
    fn run_trial_seeded(&self, seed: u64) -> TrialResult {
        let mut rng = trial_rng(seed);
        let kernels = self.settings.kernels;
        let mut archive: Vec<Candidate> = LatinHypercube {
            boundary: self.problem.boundary,
            count: kernels,
            dim: self.problem.dimensions,
        }
        .sample(&mut rng)
        .into_iter()
        .map(|position| self.problem.candidate(position))
        .collect();
        sort_by_fitness(&mut archive);
        let mut history = Vec::with_capacity(self.settings.generations + 1);
        for _ in 0..self.settings.generations {
            history.push(archive[0].fitness);
            let deviations = self.deviations(&archive);
            let offspring = self.offspring(&mut rng, &archive, &deviations);
            archive.extend(offspring);
            sort_by_fitness(&mut archive);
            archive.truncate(kernels);
        }
        history.push(archive[0].fitness);
        let mean_fit = mean_fitness(&archive);
        TrialResult::new(archive.swap_remove(0), mean_fit, history)
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
            AntColonyOptimizer::default,
            &[("dimensions", 5.0), ("kernels", 10.0), ("numberOfGenerations", 15.0)],
            Some(15),
        );
    }
    #[test]
    fn test_seeds() {
        let aco = configure(
            AntColonyOptimizer::default(),
            BenchmarkFunction::Rastrigin,
            &[("dimensions", 4.0), ("kernels", 8.0), ("numberOfGenerations", 5.0)],
        );
        check_seeds(&aco);
    }
    #[test]
    fn test_archive_stays_sorted_and_elitist() {
        let aco = configure(
            AntColonyOptimizer::default(),
            BenchmarkFunction::Sphere,
            &[("dimensions", 3.0), ("kernels", 6.0), ("deviationScale", 0.85)],
        );
        let mut rng = trial_rng(5);
        let mut archive: Vec<Candidate> = (0..6).map(|_| aco.problem.random_candidate(&mut rng)).collect();
        sort_by_fitness(&mut archive);
        for _ in 0..20 {
            let deviations = aco.deviations(&archive);
            let offspring = aco.offspring(&mut rng, &archive, &deviations);
            let mut union: Vec<f64> = archive.iter().chain(offspring.iter()).map(|c| c.fitness).collect();
            union.sort_by(|a, b| a.partial_cmp(b).unwrap());
            archive.extend(offspring);
            sort_by_fitness(&mut archive);
            archive.truncate(6);
            let kept: Vec<f64> = archive.iter().map(|c| c.fitness).collect();
            assert_eq!(kept, union[..6]);
        }
    }
    #[test]
    fn test_default_deviation_scale_collapses_spread() {
        // With the subnormal scale, sampled coordinates repeat archive
        // coordinates, so the search cannot leave the initial grid.
        let aco = configure(
            AntColonyOptimizer::default(),
            BenchmarkFunction::Sphere,
            &[("dimensions", 4.0), ("kernels", 10.0)],
        );
        let mut rng = trial_rng(9);
        let archive: Vec<Candidate> = (0..10).map(|_| aco.problem.random_candidate(&mut rng)).collect();
        let deviations = aco.deviations(&archive);
        assert!(deviations.iter().flatten().all(|&d| d < 1e-300));
        for candidate in aco.offspring(&mut rng, &archive, &deviations) {
            for (i, x) in candidate.position.iter().enumerate() {
                assert!(archive.iter().any(|kernel| kernel.position[i] == *x));
            }
        }
    }
    #[test]
    fn test_positive_deviation_scale_converges() {
        let aco = configure(
            AntColonyOptimizer::default(),
            BenchmarkFunction::Sphere,
            &[
                ("dimensions", 3.0),
                ("kernels", 20.0),
                ("numberOfGenerations", 200.0),
                ("deviationScale", 0.85),
            ],
        );
        let result = aco.run_trial_seeded(3);
        check_result(&aco, &result, Some(200));
        assert!(result.best_fit < 1e-3);
    }
    #[test]
    fn test_invalid_parameters() {
        let mut aco = AntColonyOptimizer::default();
        let params: HyperParameters = [("kernels", 0.0)].into_iter().collect();
        assert!(aco.set_hyper_parameters(&params).is_err());
        let params: HyperParameters = [("deviationScale", -1.0), ("dimensions", 3.0)].into_iter().collect();
        assert!(aco.set_hyper_parameters(&params).is_err());
        // nothing changed
        assert_eq!(aco.problem().dimensions, 30);
        assert_eq!(*aco.settings(), AntColonySettings::default());
    }
}
