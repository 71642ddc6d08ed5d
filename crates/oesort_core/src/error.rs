//! # Sort Error Types
//!
//! All errors that can occur while configuring or running a sort.

use thiserror::Error;

/// Errors that can occur in the sorting kernel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// Worker or block count rejected before any thread was spawned.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// The worker substrate failed to run to completion.
    ///
    /// Fatal, never retried. The array holds a valid permutation of the input.
    #[error("execution failure: {reason}")]
    ExecutionFailure {
        /// What broke.
        reason: String,
    },

    /// A config file could not be read or parsed.
    #[error("config error: {reason}")]
    Config {
        /// Parser or IO message.
        reason: String,
    },
}

impl SortError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn execution(reason: impl Into<String>) -> Self {
        Self::ExecutionFailure {
            reason: reason.into(),
        }
    }
}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;
