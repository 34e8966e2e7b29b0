//! Error type of this crate.

use thiserror::Error;

/// Errors when configuring or running experiments
///
/// Evaluating a candidate outside the valid domain of a benchmark function
/// is not an error, see [`INFEASIBLE`](crate::testfuncs::INFEASIBLE).
#[derive(Debug, Error)]
pub enum Error {
    /// No algorithm is registered under the given name
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// Specification does not name a benchmark function
    #[error("no benchmark function specified")]
    MissingFunction,
    /// No benchmark function with the given name exists
    #[error("unknown benchmark function `{0}`")]
    UnknownFunction(String),
    /// Lower bound is above upper bound, or a bound is not finite
    #[error("invalid boundaries [{lower}, {upper}]")]
    InvalidBoundary {
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },
    /// Hyperparameter value cannot be used
    #[error("invalid value {value} for hyperparameter `{name}`: {reason}")]
    InvalidHyperParameter {
        /// Key of the hyperparameter
        name: String,
        /// Offending value
        value: f64,
        /// What is required instead
        reason: &'static str,
    },
    /// Trial was dropped before reporting its result
    #[error("trial aborted before producing a result")]
    TrialAborted,
    /// Reading or writing a file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Malformed JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Return true if the error rejects an experiment specification before
    /// any trial was started
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownAlgorithm(_)
                | Error::MissingFunction
                | Error::UnknownFunction(_)
                | Error::InvalidBoundary { .. }
                | Error::InvalidHyperParameter { .. }
        )
    }
}

/// Result type with [`Error`] as default error
pub type Result<T, E = Error> = std::result::Result<T, E>;
