//! Constraint types for optimization problems.
//!
//! Constraints map to cone constraints in the solver:
//! - Zero: Ax + b = 0 (zero cone / equality)
//! - NonNeg: Ax + b >= 0 (nonnegative orthant)
//! - SOC: ||x|| <= t (second-order cone)

use crate::error::{CvxError, Result};
use crate::expr::{Affine, Expr, ExprId};

/// A constraint in an optimization problem.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Equality constraint: expr == 0, componentwise.
    Zero(Affine),

    /// Inequality constraint: expr >= 0, componentwise.
    NonNeg(Affine),

    /// Second-order cone constraint: ||x||_2 <= t.
    SOC {
        /// The scalar upper bound (length 1).
        t: Affine,
        /// The vector argument.
        x: Affine,
    },
}

impl Constraint {
    /// Create a SOC constraint: ||x||_2 <= t.
    pub fn soc(t: Affine, x: Affine) -> Result<Self> {
        if t.len() != 1 {
            return Err(CvxError::LengthMismatch {
                expected: 1,
                got: t.len(),
            });
        }
        Ok(Constraint::SOC { t, x })
    }

    /// Number of cone rows this constraint occupies.
    pub fn rows(&self) -> usize {
        match self {
            Constraint::Zero(a) | Constraint::NonNeg(a) => a.len(),
            Constraint::SOC { t, x } => t.len() + x.len(),
        }
    }

    /// Get all variable IDs in this constraint.
    pub fn variables(&self) -> Vec<ExprId> {
        let mut vars = match self {
            Constraint::Zero(a) | Constraint::NonNeg(a) => a.variables(),
            Constraint::SOC { t, x } => {
                let mut v = t.variables();
                v.extend(x.variables());
                v
            }
        };
        vars.sort();
        vars.dedup();
        vars
    }
}

/// Extension trait for bounding expressions by scalars.
///
/// Vector expressions are constrained componentwise.
pub trait ConstraintExt {
    /// self == rhs.
    fn equals(&self, rhs: f64) -> Result<Constraint>;

    /// self <= rhs.
    fn leq(&self, rhs: f64) -> Result<Constraint>;

    /// self >= rhs.
    fn geq(&self, rhs: f64) -> Result<Constraint>;
}

impl ConstraintExt for Affine {
    fn equals(&self, rhs: f64) -> Result<Constraint> {
        Ok(Constraint::Zero(self.offset(-rhs)))
    }

    fn leq(&self, rhs: f64) -> Result<Constraint> {
        // rhs - self >= 0
        Ok(Constraint::NonNeg(self.neg().offset(rhs)))
    }

    fn geq(&self, rhs: f64) -> Result<Constraint> {
        Ok(Constraint::NonNeg(self.offset(-rhs)))
    }
}

impl ConstraintExt for Expr {
    fn equals(&self, rhs: f64) -> Result<Constraint> {
        match self {
            Expr::Affine(a) => a.equals(rhs),
            _ => Err(CvxError::NotDcp(
                "equality constraints require an affine expression".into(),
            )),
        }
    }

    /// Convex <= constant. Norms become second-order cones.
    fn leq(&self, rhs: f64) -> Result<Constraint> {
        match self {
            Expr::Affine(a) => a.leq(rhs),
            Expr::Norm2(x) => Constraint::soc(Affine::scalar(rhs), x.as_ref().clone()),
            Expr::SumSquares(x) => {
                if rhs < 0.0 {
                    return Err(CvxError::InvalidProblem(format!(
                        "sum of squares bounded by negative value {rhs}"
                    )));
                }
                Constraint::soc(Affine::scalar(rhs.sqrt()), x.as_ref().clone())
            }
            Expr::Scale(k, e) if *k > 0.0 => e.leq(rhs / k),
            Expr::Scale(k, e) if *k < 0.0 => e.geq(rhs / k),
            _ => Err(CvxError::NotDcp(format!(
                "cannot bound expression with curvature {:?} from above",
                self.curvature()
            ))),
        }
    }

    /// Concave >= constant. Only affine expressions qualify here.
    fn geq(&self, rhs: f64) -> Result<Constraint> {
        match self {
            Expr::Affine(a) => a.geq(rhs),
            Expr::Scale(k, e) if *k > 0.0 => e.geq(rhs / k),
            Expr::Scale(k, e) if *k < 0.0 => e.leq(rhs / k),
            _ => Err(CvxError::NotDcp(format!(
                "cannot bound expression with curvature {:?} from below",
                self.curvature()
            ))),
        }
    }
}
