//! Error types for sampling operations.

use thiserror::Error;

/// Errors that can occur while building distributions or taking named samples.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbError {
    /// A distribution parameter is outside its valid range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A sample was requested with an empty label.
    #[error("Sample address cannot be empty")]
    EmptyAddress,

    /// The address was already used within the same trace.
    #[error("Address '{address}' already recorded in this trace")]
    DuplicateAddress { address: String },

    /// A replayed or observed value does not fit the distribution's support.
    #[error("Value at '{address}' is {got}, but the distribution produces {expected}")]
    ReplayTypeMismatch {
        address: String,
        expected: &'static str,
        got: &'static str,
    },

    /// A loop of named samples ran out of steps before finishing.
    #[error("No result within {limit} steps")]
    StepLimit { limit: usize },
}

impl ProbError {
    pub(crate) fn invalid(name: &str, reason: &str) -> Self {
        ProbError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
