//! Scalar expressions built from affine pieces and convex atoms.
//!
//! Expressions form an immutable tree using `Arc` for sharing, so a term such
//! as a portfolio's risk can appear in both the objective and a constraint.

use std::ops::{Add, Mul};
use std::sync::Arc;

use super::affine::{Affine, Assignment};
use super::variable::ExprId;
use crate::dcp::{add_curvature, scale_curvature, Curvature};
use crate::error::{CvxError, Result};

/// A scalar-valued expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A length-1 affine expression.
    Affine(Affine),
    /// Euclidean norm of an affine vector.
    Norm2(Arc<Affine>),
    /// Sum of squared components of an affine vector.
    SumSquares(Arc<Affine>),
    /// Scalar multiple of an expression.
    Scale(f64, Arc<Expr>),
    /// Sum of two expressions.
    Add(Arc<Expr>, Arc<Expr>),
}

impl Expr {
    /// Wrap a length-1 affine expression.
    pub fn affine(a: Affine) -> Result<Expr> {
        if a.len() != 1 {
            return Err(CvxError::LengthMismatch {
                expected: 1,
                got: a.len(),
            });
        }
        Ok(Expr::Affine(a))
    }

    /// A constant scalar.
    pub fn constant(value: f64) -> Expr {
        Expr::Affine(Affine::scalar(value))
    }

    pub fn curvature(&self) -> Curvature {
        match self {
            Expr::Affine(a) if a.is_constant() => Curvature::Constant,
            Expr::Affine(_) => Curvature::Affine,
            Expr::Norm2(x) | Expr::SumSquares(x) if x.is_constant() => Curvature::Constant,
            Expr::Norm2(_) | Expr::SumSquares(_) => Curvature::Convex,
            Expr::Scale(k, e) => scale_curvature(*k, e.curvature()),
            Expr::Add(a, b) => add_curvature(a.curvature(), b.curvature()),
        }
    }

    pub fn is_convex(&self) -> bool {
        self.curvature().is_convex()
    }

    pub fn is_concave(&self) -> bool {
        self.curvature().is_concave()
    }

    /// All variable IDs in this expression, sorted and deduplicated.
    pub fn variables(&self) -> Vec<ExprId> {
        self.variable_sizes().into_iter().map(|(id, _)| id).collect()
    }

    /// All variables with their lengths, sorted by ID and deduplicated.
    pub fn variable_sizes(&self) -> Vec<(ExprId, usize)> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, out: &mut Vec<(ExprId, usize)>) {
        match self {
            Expr::Affine(a) => out.extend(a.variable_sizes()),
            Expr::Norm2(x) | Expr::SumSquares(x) => out.extend(x.variable_sizes()),
            Expr::Scale(_, e) => e.collect_variables(out),
            Expr::Add(a, b) => {
                a.collect_variables(out);
                b.collect_variables(out);
            }
        }
    }

    /// Evaluate at the given assignment; `None` if a variable is missing.
    pub fn value(&self, values: &Assignment) -> Option<f64> {
        match self {
            Expr::Affine(a) => a.eval(values).map(|v| v[0]),
            Expr::Norm2(x) => x.eval(values).map(|v| v.norm()),
            Expr::SumSquares(x) => x.eval(values).map(|v| v.norm_squared()),
            Expr::Scale(k, e) => e.value(values).map(|v| k * v),
            Expr::Add(a, b) => Some(a.value(values)? + b.value(values)?),
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Arc::new(self), Arc::new(rhs))
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Scale(self, Arc::new(rhs))
    }
}

/// Euclidean norm: ||x||_2.
pub fn norm2(x: &Affine) -> Expr {
    Expr::Norm2(Arc::new(x.clone()))
}

/// Sum of squares: ||x||_2^2.
pub fn sum_squares(x: &Affine) -> Expr {
    Expr::SumSquares(Arc::new(x.clone()))
}
