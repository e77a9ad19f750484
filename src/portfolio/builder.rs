//! Construction of the risk-capped, target-regularized allocation problem.
//!
//! ```text
//! minimize    ||vol ∘ w||_2 + scale * ||w - target||_2^2
//! subject to  sum(w) == 1
//!             w >= min_weight
//!             ||vol ∘ w||_2 <= risk_cap
//! ```
//!
//! The risk term treats assets as uncorrelated: each asset contributes
//! `vol[i] * w[i]` and the contributions combine in the L2 norm. No
//! covariance matrix is involved.

use std::collections::HashSet;

use nalgebra::DVector;
use tracing::{debug, warn};

use super::asset::AssetRecord;
use super::error::AllocError;
use super::params::AllocationParams;
use crate::constraints::ConstraintExt;
use crate::expr::{norm2, sum_squares, Affine, Expr, Variable};
use crate::problem::Problem;

/// Slack allowed when checking `min_weight * n` against the unit budget.
const BUDGET_EPS: f64 = 1e-12;

/// A fully assembled allocation problem, ready to submit to the solver.
///
/// Building never evaluates feasibility beyond the structural budget check.
#[derive(Debug, Clone)]
pub struct AllocationProblem {
    names: Vec<String>,
    params: AllocationParams,
    weights: Variable,
    risk: Expr,
    regularization: Expr,
    problem: Problem,
}

impl AllocationProblem {
    /// Build the problem for `assets` in the given order.
    pub fn build(assets: &[AssetRecord], params: &AllocationParams) -> Result<Self, AllocError> {
        validate_assets(assets)?;
        params.validate()?;

        let n = assets.len();
        if params.min_weight * n as f64 > 1.0 + BUDGET_EPS {
            warn!(
                n,
                min_weight = params.min_weight,
                "minimum weights exceed the full budget"
            );
            return Err(AllocError::Infeasible(format!(
                "{} assets at minimum weight {} need {:.4} of a unit budget",
                n,
                params.min_weight,
                params.min_weight * n as f64
            )));
        }

        let vol = DVector::from_iterator(n, assets.iter().map(|a| a.volatility));
        let target = DVector::from_iterator(n, assets.iter().map(|a| a.target_weight));

        let weights = Variable::named("w", n);
        let w = Affine::var(&weights);

        let risk = norm2(&w.mul_elementwise(&vol)?);
        let regularization = sum_squares(&w.sub(&Affine::constant(target))?);
        let objective = risk.clone() + params.regularization_scale * regularization.clone();

        let problem = Problem::minimize(objective)
            .subject_to([
                w.sum().equals(1.0)?,
                w.geq(params.min_weight)?,
                risk.leq(params.risk_cap)?,
            ])
            .build();

        debug!(
            n,
            min_weight = params.min_weight,
            risk_cap = params.risk_cap,
            scale = params.regularization_scale,
            "allocation problem built"
        );

        Ok(AllocationProblem {
            names: assets.iter().map(|a| a.name.clone()).collect(),
            params: *params,
            weights,
            risk,
            regularization,
            problem,
        })
    }

    /// Asset names in variable order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn params(&self) -> &AllocationParams {
        &self.params
    }

    /// The weight vector decision variable.
    pub fn weights(&self) -> &Variable {
        &self.weights
    }

    /// `||vol ∘ w||_2`.
    pub fn risk_term(&self) -> &Expr {
        &self.risk
    }

    /// `||w - target||_2^2`, before scaling.
    pub fn regularization_term(&self) -> &Expr {
        &self.regularization
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }
}

fn validate_assets(assets: &[AssetRecord]) -> Result<(), AllocError> {
    if assets.is_empty() {
        return Err(AllocError::InvalidInput("asset list is empty".into()));
    }

    let mut seen = HashSet::new();
    for asset in assets {
        if !seen.insert(asset.name.as_str()) {
            return Err(AllocError::InvalidInput(format!(
                "duplicate asset name '{}'",
                asset.name
            )));
        }
        if !asset.volatility.is_finite() || asset.volatility < 0.0 {
            return Err(AllocError::InvalidInput(format!(
                "asset '{}' has invalid volatility {}",
                asset.name, asset.volatility
            )));
        }
        if !asset.target_weight.is_finite() || !(0.0..=1.0).contains(&asset.target_weight) {
            return Err(AllocError::InvalidInput(format!(
                "asset '{}' has target weight {} outside [0, 1]",
                asset.name, asset.target_weight
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Constraint;
    use crate::expr::Assignment;

    fn assets() -> Vec<AssetRecord> {
        vec![
            AssetRecord::new("A", 0.20, 0.25),
            AssetRecord::new("B", 0.245, 0.25),
            AssetRecord::new("C", 0.224, 0.25),
            AssetRecord::new("D", 0.265, 0.25),
        ]
    }

    #[test]
    fn test_build_shapes() {
        let built = AllocationProblem::build(&assets(), &AllocationParams::default()).unwrap();
        assert_eq!(built.weights().len(), 4);
        assert_eq!(built.names(), &["A", "B", "C", "D"]);
        assert!(built.problem().is_dcp());

        let constraints = &built.problem().constraints;
        assert_eq!(constraints.len(), 3);
        assert!(matches!(constraints[0], Constraint::Zero(_)));
        assert!(matches!(constraints[1], Constraint::NonNeg(_)));
        assert!(matches!(constraints[2], Constraint::SOC { .. }));
    }

    #[test]
    fn test_terms_evaluate() {
        let built = AllocationProblem::build(&assets(), &AllocationParams::default()).unwrap();
        let mut values = Assignment::new();
        values.insert(
            built.weights().id(),
            DVector::from_vec(vec![1.0, 0.0, 0.0, 0.0]),
        );

        let risk = built.risk_term().value(&values).unwrap();
        assert!((risk - 0.20).abs() < 1e-12);

        // (0.75)^2 + 3 * (0.25)^2
        let reg = built.regularization_term().value(&values).unwrap();
        assert!((reg - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_empty() {
        let err = AllocationProblem::build(&[], &AllocationParams::default()).unwrap_err();
        assert!(matches!(err, AllocError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_negative_volatility() {
        let mut a = assets();
        a[2].volatility = -0.1;
        let err = AllocationProblem::build(&a, &AllocationParams::default()).unwrap_err();
        assert!(matches!(err, AllocError::InvalidInput(ref m) if m.contains("'C'")));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let mut a = assets();
        a[3].name = "A".into();
        let err = AllocationProblem::build(&a, &AllocationParams::default()).unwrap_err();
        assert!(matches!(err, AllocError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_target_out_of_range() {
        let mut a = assets();
        a[0].target_weight = 1.5;
        assert!(AllocationProblem::build(&a, &AllocationParams::default()).is_err());
    }

    #[test]
    fn test_budget_check_reports_infeasible() {
        let params = AllocationParams::default().with_min_weight(0.30);
        let err = AllocationProblem::build(&assets(), &params).unwrap_err();
        assert!(matches!(err, AllocError::Infeasible(_)));
    }

    #[test]
    fn test_budget_check_allows_exact_fit() {
        let params = AllocationParams::default().with_min_weight(0.25);
        assert!(AllocationProblem::build(&assets(), &params).is_ok());
    }
}
