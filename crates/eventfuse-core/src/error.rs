//! Centralized error types for eventfuse.

use thiserror::Error;

/// Main error type for eventfuse pipeline operations.
#[derive(Error, Debug)]
pub enum FuseError {
    #[error("Merge input error: {0}")]
    MergeInput(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for eventfuse pipeline operations.
pub type FuseResult<T> = Result<T, FuseError>;

impl FuseError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a merge input error.
    pub fn merge_input(msg: impl Into<String>) -> Self {
        Self::MergeInput(msg.into())
    }
}
