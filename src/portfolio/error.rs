//! Allocation failure taxonomy.

use serde::Serialize;
use thiserror::Error;

use crate::error::CvxError;

/// Why an allocation could not be produced.
///
/// Every variant is terminal for one invocation; nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocError {
    /// Rejected before any solver call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No allocation satisfies every constraint.
    #[error("infeasible: {0}")]
    Infeasible(String),

    /// The objective is unbounded below.
    #[error("unbounded: {0}")]
    Unbounded(String),

    /// Any other terminal solver status, or a failure to submit the problem.
    #[error("solver error: {0}")]
    SolverError(String),
}

/// The reason tag of an [`AllocError`], without its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    Infeasible,
    Unbounded,
    SolverError,
}

impl AllocError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AllocError::InvalidInput(_) => FailureKind::InvalidInput,
            AllocError::Infeasible(_) => FailureKind::Infeasible,
            AllocError::Unbounded(_) => FailureKind::Unbounded,
            AllocError::SolverError(_) => FailureKind::SolverError,
        }
    }
}

impl From<CvxError> for AllocError {
    fn from(err: CvxError) -> Self {
        AllocError::SolverError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(
            AllocError::InvalidInput("x".into()).kind(),
            FailureKind::InvalidInput
        );
        assert_eq!(AllocError::Unbounded("x".into()).kind(), FailureKind::Unbounded);
    }

    #[test]
    fn test_modeling_errors_become_solver_errors() {
        let err: AllocError = CvxError::NotDcp("objective".into()).into();
        assert_eq!(err.kind(), FailureKind::SolverError);
        assert!(err.to_string().contains("objective"));
    }
}
