//! Benchmarking of population based metaheuristics
//!
//! Seven metaheuristics (see module [`algorithms`]) minimize the synthetic
//! benchmark functions in [`testfuncs`]. Every algorithm implements the
//! [`Experiment`] trait. An [`ExperimentRunner`] resolves algorithms by name
//! and runs many independent trials of one experiment specification in
//! concurrent batches. The other modules are (public) helper modules.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod algorithms;
pub mod distributions;
pub mod error;
pub mod experiment;
pub mod io;
pub mod population;
pub mod registry;
pub mod runner;
pub mod testfuncs;

pub use error::{Error, Result};
pub use experiment::{Experiment, HyperParameters, TrialResult};
pub use registry::AlgorithmRegistry;
pub use runner::{ExperimentRunner, ExperimentSpecification, Output};
pub use testfuncs::BenchmarkFunction;
