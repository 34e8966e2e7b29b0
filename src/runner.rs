//! Execution of experiment specifications
//!
//! A specification names an algorithm, a benchmark function,
//! hyperparameters and a number of repetitions. The [`ExperimentRunner`]
//! configures one instance of the algorithm and runs the repetitions as
//! independent trials in batches: all trials of a batch are executed
//! concurrently on the rayon thread pool, and the next batch starts only
//! after every trial of the previous batch has finished.

use crate::error::{Error, Result};
use crate::experiment::{Experiment, HyperParameters, TrialResult};
use crate::registry::AlgorithmRegistry;
use crate::testfuncs::BenchmarkFunction;

use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::{join_all, Future, TryFutureExt};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use std::sync::Arc;
use std::time::Instant;

/// Default number of trials per batch
pub const BATCH_SIZE: usize = 50;

/// Experiment to run, as read from the input file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExperimentSpecification {
    /// Number of independent trials
    pub number_of_experiments: usize,
    /// Name of the benchmark function
    pub function_name: String,
    /// Name of the algorithm
    pub algorithm_name: String,
    /// Hyperparameters (missing ones keep the algorithm's defaults)
    #[serde(default)]
    pub parameters: HyperParameters,
}

/// Results of all trials of one specification
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    /// Name of the algorithm
    pub algorithm_name: String,
    /// Name of the benchmark function
    pub function_name: String,
    /// One result per trial
    pub results: Vec<TrialResult>,
}

/// Sizes of the batches needed to run `total` trials, at most `batch_size`
/// each
///
/// Only the last batch may be smaller than `batch_size`.
///
/// # Panics
///
/// Panics if `batch_size` is zero.
pub fn batch_sizes(total: usize, batch_size: usize) -> impl Iterator<Item = usize> {
    assert_ne!(batch_size, 0, "batch_size must be positive");
    (0..total)
        .step_by(batch_size)
        .map(move |start| batch_size.min(total - start))
}

/// Run a trial on the rayon thread pool
fn spawn_trial(
    experiment: Arc<dyn Experiment>,
    seed: u64,
) -> impl Future<Output = Result<TrialResult>> {
    let (sender, receiver) = oneshot::channel();
    rayon::spawn(move || {
        // receiver is only gone if the caller lost interest
        let _ = sender.send(experiment.run_trial_seeded(seed));
    });
    receiver.map_err(|_| Error::TrialAborted)
}

/// Runs experiment specifications in batches of concurrent trials
#[derive(Clone, Debug)]
pub struct ExperimentRunner {
    registry: AlgorithmRegistry,
    batch_size: usize,
    seed: Option<u64>,
}

impl Default for ExperimentRunner {
    fn default() -> Self {
        ExperimentRunner::new(AlgorithmRegistry::default())
    }
}

impl ExperimentRunner {
    /// Runner resolving algorithms from `registry`
    pub fn new(registry: AlgorithmRegistry) -> Self {
        ExperimentRunner {
            registry,
            batch_size: BATCH_SIZE,
            seed: None,
        }
    }
    /// Set number of trials per batch
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert_ne!(batch_size, 0, "batch_size must be positive");
        self.batch_size = batch_size;
        self
    }
    /// Derive the seeds of all trials from `seed`
    ///
    /// Without a seed, every run uses fresh entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    /// Number of trials per batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
    /// Create and configure the algorithm of a specification
    ///
    /// Fails if the algorithm or function is unknown, or if the
    /// hyperparameters are invalid.
    pub fn configure(&self, spec: &ExperimentSpecification) -> Result<Box<dyn Experiment>> {
        let mut experiment = self.registry.resolve(&spec.algorithm_name)?;
        let function: BenchmarkFunction = spec.function_name.parse()?;
        let boundary = function.boundary();
        experiment.set_function(function);
        experiment.set_boundaries(boundary.lower, boundary.upper)?;
        experiment.set_hyper_parameters(&spec.parameters)?;
        Ok(experiment)
    }
    /// Run all trials of a specification
    pub async fn run_async(&self, spec: &ExperimentSpecification) -> Result<Output> {
        let experiment: Arc<dyn Experiment> = Arc::from(self.configure(spec)?);
        let algorithm = experiment.name();
        let repetitions = spec.number_of_experiments;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            algorithm,
            function = %spec.function_name,
            repetitions,
            batch_size = self.batch_size,
            "starting experiment"
        );
        let start = Instant::now();
        let mut results = Vec::with_capacity(repetitions);
        for (batch, size) in batch_sizes(repetitions, self.batch_size).enumerate() {
            let trials = (0..size).map(|_| spawn_trial(experiment.clone(), rng.gen()));
            for result in join_all(trials).await {
                results.push(result?);
            }
            debug!(algorithm, batch, size, finished = results.len(), "batch finished");
        }
        info!(
            algorithm,
            function = %spec.function_name,
            repetitions,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "experiment finished"
        );
        Ok(Output {
            algorithm_name: algorithm.to_owned(),
            function_name: spec.function_name.clone(),
            results,
        })
    }
    /// Run all trials of a specification, blocking the current thread
    pub fn run(&self, spec: &ExperimentSpecification) -> Result<Output> {
        block_on(self.run_async(spec))
    }
}
