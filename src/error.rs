//! Error types for the particle filter.
//!
//! Models and other collaborators report failures as a `&'static str`. These are carried unchanged in [`FilterError::Model`].

use thiserror::Error;

/// Particle filter error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Construction arguments out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Parameter particles have collapsed, their sample covariance cannot be factorised
    #[error("sample covariance is not positive definite (rcond {rcond})")]
    NotPositiveDefinite { rcond: f64 },

    /// Weights cannot be normalised to a probability distribution
    #[error("degenerate weights: {0}")]
    DegenerateWeights(&'static str),

    /// Observations must be processed in non-decreasing time order
    #[error("observation time {time} precedes the last processed time {last}")]
    TimeOrder { time: i64, last: i64 },

    /// Failure reported by the model
    #[error("{0}")]
    Model(&'static str),
}

impl From<&'static str> for FilterError {
    fn from(message: &'static str) -> Self {
        FilterError::Model(message)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FilterError>;
