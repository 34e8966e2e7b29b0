//! Common interface of all metaheuristics
//!
//! An [`Experiment`] is configured once (benchmark function, boundaries,
//! [`HyperParameters`]) and then runs any number of independent trials.
//! Trials only borrow the configuration immutably, so one configured
//! instance may run trials on several threads at once.
//!
//! # Example
//!
//! ```
//! use metaheuristics_bench::algorithms::GreyWolfAlgorithm;
//! use metaheuristics_bench::experiment::{Experiment, HyperParameters};
//! use metaheuristics_bench::testfuncs::BenchmarkFunction;
//!
//! let mut gwo = GreyWolfAlgorithm::default();
//! gwo.set_function(BenchmarkFunction::Sphere);
//! gwo.set_boundaries(-5.12, 5.12).unwrap();
//! let params: HyperParameters = [("dimensions", 4.0), ("maxGenerations", 20.0)]
//!     .into_iter()
//!     .collect();
//! gwo.set_hyper_parameters(&params).unwrap();
//!
//! let result = gwo.run_trial_seeded(1);
//! assert_eq!(result.best_fit_arguments.len(), 4);
//! assert_eq!(result.best_fits_per_iteration.len(), 21);
//! ```

use crate::error::{Error, Result};
use crate::population::{self, Candidate};
use crate::testfuncs::{BenchmarkFunction, Boundary};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from hyperparameter name to value
///
/// Integer parameters are truncated toward zero when read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HyperParameters(BTreeMap<String, f64>);

impl HyperParameters {
    /// Empty mapping (all defaults)
    pub fn new() -> Self {
        Self::default()
    }
    /// Set a parameter
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(name.into(), value)
    }
    /// Get raw value of a parameter
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }
    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Return true if no parameter is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Read a real parameter, falling back to `default`
    pub fn real(&self, name: &str, default: f64) -> Result<f64> {
        match self.get(name) {
            None => Ok(default),
            Some(value) if value.is_finite() => Ok(value),
            Some(value) => Err(invalid(name, value, "must be finite")),
        }
    }
    /// Read an integer parameter with a lower limit, falling back to
    /// `default`
    pub fn count(&self, name: &str, default: usize, min: usize) -> Result<usize> {
        let Some(value) = self.get(name) else {
            return Ok(default);
        };
        if !value.is_finite() {
            return Err(invalid(name, value, "must be finite"));
        }
        if value < 0.0 {
            return Err(invalid(name, value, "must not be negative"));
        }
        let count = value.trunc() as usize;
        if count < min {
            return Err(invalid(name, value, "is below the minimum for this algorithm"));
        }
        Ok(count)
    }
}

fn invalid(name: &str, value: f64, reason: &'static str) -> Error {
    Error::InvalidHyperParameter {
        name: name.to_owned(),
        value,
        reason,
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for HyperParameters {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        HyperParameters(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Key of the dimensionality parameter shared by all algorithms
pub const DIMENSIONS: &str = "dimensions";

/// Bound benchmark function, its boundary, and the dimensionality
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Problem {
    /// Objective
    pub function: BenchmarkFunction,
    /// Search domain for every dimension
    pub boundary: Boundary,
    /// Number of coordinates of each candidate
    pub dimensions: usize,
}

impl Problem {
    /// Sphere problem with given dimensionality
    pub fn new(dimensions: usize) -> Self {
        let function = BenchmarkFunction::Sphere;
        Problem {
            function,
            boundary: function.boundary(),
            dimensions,
        }
    }
    /// Read dimensionality from hyperparameters
    pub fn read_dimensions(&self, params: &HyperParameters) -> Result<usize> {
        params.count(DIMENSIONS, self.dimensions, 1)
    }
    /// Fitness of a position
    pub fn evaluate(&self, position: &[f64]) -> f64 {
        self.function.evaluate(position)
    }
    /// Evaluate position and wrap it as [`Candidate`]
    pub fn candidate(&self, position: Vec<f64>) -> Candidate {
        Candidate::new(position, |x| self.evaluate(x))
    }
    /// Uniformly distributed position
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        population::random_position(rng, &self.boundary, self.dimensions)
    }
    /// Uniformly distributed candidate
    pub fn random_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        self.candidate(self.random_position(rng))
    }
    /// Clamp all coordinates into the boundary
    pub fn clamp(&self, position: &mut [f64]) {
        population::clamp_position(position, &self.boundary);
    }
}

/// Outcome of a single trial
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrialResult {
    /// Best fitness found
    pub best_fit: f64,
    /// Average fitness of the final population
    pub mean_fit: f64,
    /// Best fitness per generation, including a final snapshot
    pub best_fits_per_iteration: Vec<f64>,
    /// Position of best fitness
    pub best_fit_arguments: Vec<f64>,
}

impl TrialResult {
    /// Assemble result from best candidate, mean fitness and history
    pub fn new(best: Candidate, mean_fit: f64, best_fits_per_iteration: Vec<f64>) -> Self {
        TrialResult {
            best_fit: best.fitness,
            mean_fit,
            best_fits_per_iteration,
            best_fit_arguments: best.position,
        }
    }
}

/// Create the random number generator of one trial
pub fn trial_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Metaheuristic that can be driven by the
/// [`ExperimentRunner`](crate::runner::ExperimentRunner)
pub trait Experiment: Send + Sync {
    /// Stable name used for lookup
    fn name(&self) -> &'static str;
    /// Bound problem
    fn problem(&self) -> &Problem;
    /// Mutable access to bound problem
    fn problem_mut(&mut self) -> &mut Problem;
    /// Apply hyperparameters
    ///
    /// Unknown keys are ignored, missing keys keep their current value. On
    /// error, no parameter is changed.
    fn set_hyper_parameters(&mut self, params: &HyperParameters) -> Result<()>;
    /// Run one trial with a generator seeded from `seed`
    ///
    /// Equal seeds give equal results.
    fn run_trial_seeded(&self, seed: u64) -> TrialResult;

    /// Bound benchmark function
    fn function(&self) -> BenchmarkFunction {
        self.problem().function
    }
    /// Bind benchmark function
    fn set_function(&mut self, function: BenchmarkFunction) {
        self.problem_mut().function = function;
    }
    /// Set search domain
    fn set_boundaries(&mut self, lower: f64, upper: f64) -> Result<()> {
        if !(lower.is_finite() && upper.is_finite() && lower <= upper) {
            return Err(Error::InvalidBoundary { lower, upper });
        }
        self.problem_mut().boundary = Boundary::new(lower, upper);
        Ok(())
    }
    /// Run one trial with a freshly seeded generator
    fn run_trial(&self) -> TrialResult {
        self.run_trial_seeded(rand::thread_rng().gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_hyper_parameters() {
        let params: HyperParameters = [
            ("populationSize", 20.9),
            ("rate", 0.25),
            ("negative", -1.0),
            ("nan", f64::NAN),
            ("small", 1.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(params.len(), 5);
        assert_eq!(params.count("populationSize", 5, 1).unwrap(), 20);
        assert_eq!(params.count("missing", 5, 1).unwrap(), 5);
        assert_eq!(params.real("rate", 0.5).unwrap(), 0.25);
        assert_eq!(params.real("missing", 0.5).unwrap(), 0.5);
        assert!(params.count("negative", 5, 0).is_err());
        assert!(params.count("nan", 5, 0).is_err());
        assert!(params.real("nan", 0.0).is_err());
        let err = params.count("small", 5, 3).unwrap_err();
        assert!(err.is_configuration());
    }
    #[test]
    fn test_hyper_parameters_json() {
        let params: HyperParameters = serde_json::from_str(r#"{"dimensions": 5, "c": 0.5}"#).unwrap();
        assert_eq!(params.get(DIMENSIONS), Some(5.0));
        assert_eq!(params.get("c"), Some(0.5));
    }
    #[test]
    fn test_problem() {
        let mut problem = Problem::new(3);
        problem.function = BenchmarkFunction::Rastrigin;
        let candidate = problem.candidate(vec![0.0; 3]);
        assert_eq!(candidate.fitness, 0.0);
        let mut rng = trial_rng(3);
        let candidate = problem.random_candidate(&mut rng);
        assert_eq!(candidate.position.len(), 3);
        assert!(candidate.position.iter().all(|&x| problem.boundary.contains(x)));
        let mut position = vec![-10.0, 0.0, 10.0];
        problem.clamp(&mut position);
        assert_eq!(position, vec![-5.12, 0.0, 5.12]);
        let params: HyperParameters = [(DIMENSIONS, 0.0)].into_iter().collect();
        assert!(problem.read_dimensions(&params).is_err());
    }
    #[test]
    fn test_trial_result_json() {
        let result = TrialResult {
            best_fit: 1.0,
            mean_fit: 2.0,
            best_fits_per_iteration: vec![3.0, 1.0],
            best_fit_arguments: vec![0.5],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["BestFit"], 1.0);
        assert_eq!(json["MeanFit"], 2.0);
        assert_eq!(json["BestFitsPerIteration"][1], 1.0);
        assert_eq!(json["BestFitArguments"][0], 0.5);
    }
}
