//! Error types for the test helpers

use thiserror::Error;

/// Errors that can occur while writing regression output
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to write an image
    #[error("failed to write image '{path}': {message}")]
    ImageWrite { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test helpers
pub type TestResult<T> = Result<T, TestError>;
