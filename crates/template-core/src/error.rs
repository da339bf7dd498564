//! Error types for histogram template construction
//!
//! Provides a unified error type for all template crates.

use thiserror::Error;

/// Core error type for template operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Lengths of paired inputs disagree
    #[error("Invalid argument: size mismatch in {context}: expected {expected}, got {actual}")]
    SizeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Normalizing content whose reference sum is zero
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// NaN or infinite values where finite ones are required
    #[error("Non-finite value: {0}")]
    NonFinite(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for paired inputs of different lengths
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::SizeMismatch {
            context: context.to_string(),
            expected,
            actual,
        }
    }

    /// Create an error for scaling a histogram without content
    pub fn empty_histogram(context: &str) -> Self {
        Self::DivisionByZero(format!("{context} has no content to normalize"))
    }

    /// Create an error for a malformed `(low, high)` range
    pub fn invalid_range(low: f64, high: f64, context: &str) -> Self {
        Self::InvalidArgument(format!(
            "{context} range ({low}, {high}) must be finite with low < high"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::NonFinite(format!("{context} contains NaN or infinite values"))
    }

    /// Whether this error belongs to the invalid-argument family
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::SizeMismatch { .. })
    }
}
