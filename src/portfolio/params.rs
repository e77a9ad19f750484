//! Tuning parameters for the allocation problem.

use serde::{Deserialize, Serialize};

use super::error::AllocError;

/// Scalar parameters of the allocation problem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllocationParams {
    /// Lower bound on every weight.
    pub min_weight: f64,
    /// Upper bound on portfolio risk.
    pub risk_cap: f64,
    /// Weight of the squared distance to the target allocation.
    pub regularization_scale: f64,
}

impl Default for AllocationParams {
    fn default() -> Self {
        AllocationParams {
            min_weight: 0.01,
            risk_cap: 0.20,
            regularization_scale: 0.05,
        }
    }
}

impl AllocationParams {
    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }

    pub fn with_risk_cap(mut self, risk_cap: f64) -> Self {
        self.risk_cap = risk_cap;
        self
    }

    pub fn with_regularization_scale(mut self, scale: f64) -> Self {
        self.regularization_scale = scale;
        self
    }

    /// Reject values that cannot form a convex problem.
    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.min_weight.is_finite() {
            return Err(AllocError::InvalidInput(format!(
                "min weight must be finite, got {}",
                self.min_weight
            )));
        }
        if !self.risk_cap.is_finite() || self.risk_cap < 0.0 {
            return Err(AllocError::InvalidInput(format!(
                "risk cap must be finite and non-negative, got {}",
                self.risk_cap
            )));
        }
        // A negative scale would make the objective non-convex
        if !self.regularization_scale.is_finite() || self.regularization_scale < 0.0 {
            return Err(AllocError::InvalidInput(format!(
                "regularization scale must be finite and non-negative, got {}",
                self.regularization_scale
            )));
        }
        Ok(())
    }
}
