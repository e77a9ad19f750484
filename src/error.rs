//! Error types for the modeling layer.

use thiserror::Error;

/// Error type for problem construction and solving.
#[derive(Debug, Error)]
pub enum CvxError {
    /// Problem is not DCP-compliant.
    #[error("Problem is not DCP: {0}")]
    NotDcp(String),

    /// Solver could not be configured or run.
    #[error("Solver error: {0}")]
    SolverError(String),

    /// Two expressions that must agree in length do not.
    #[error("Length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Invalid problem specification.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
}

/// Result type for modeling operations.
pub type Result<T> = std::result::Result<T, CvxError>;
