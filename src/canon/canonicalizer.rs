//! Canonicalization: reduces a convex objective to a quadratic plus cone constraints.
//!
//! - Affine terms go straight into the linear cost.
//! - `sum_squares(Ax + c)` becomes native QP data: `x'A'Ax + 2c'Ax + c'c`.
//! - `norm2(x)` introduces an epigraph variable `t` with `||x||_2 <= t` and
//!   contributes `t` to the linear cost.

use crate::constraints::Constraint;
use crate::error::{CvxError, Result};
use crate::expr::{Affine, Expr, Variable};
use crate::sparse::{csc_transpose_mul, csc_transpose_vec};

use super::QuadExpr;

/// Result of canonicalizing an objective.
#[derive(Debug)]
pub struct CanonResult {
    /// The objective in quadratic standard form.
    pub objective: QuadExpr,
    /// Cone constraints introduced for epigraph variables.
    pub constraints: Vec<Constraint>,
    /// Auxiliary variables introduced during canonicalization.
    pub aux_vars: Vec<Variable>,
}

/// Canonicalize a convex objective for minimization.
pub fn canonicalize_objective(expr: &Expr) -> Result<CanonResult> {
    let mut ctx = CanonContext::default();
    ctx.canonicalize(expr, 1.0)?;
    Ok(CanonResult {
        objective: ctx.objective,
        constraints: ctx.constraints,
        aux_vars: ctx.aux_vars,
    })
}

#[derive(Default)]
struct CanonContext {
    objective: QuadExpr,
    constraints: Vec<Constraint>,
    aux_vars: Vec<Variable>,
}

impl CanonContext {
    /// Accumulate `factor * expr` into the objective.
    fn canonicalize(&mut self, expr: &Expr, factor: f64) -> Result<()> {
        if factor == 0.0 {
            return Ok(());
        }

        match expr {
            Expr::Affine(a) => {
                self.add_affine(a, factor);
                Ok(())
            }
            Expr::Norm2(x) => self.canonicalize_norm2(x, factor),
            Expr::SumSquares(x) => self.canonicalize_sum_squares(x, factor),
            Expr::Scale(k, e) => self.canonicalize(e, factor * k),
            Expr::Add(a, b) => {
                self.canonicalize(a, factor)?;
                self.canonicalize(b, factor)
            }
        }
    }

    fn add_affine(&mut self, a: &Affine, factor: f64) {
        let ones = vec![1.0; a.len()];
        for (var_id, coeff) in &a.coeffs {
            let row = csc_transpose_vec(coeff, &ones);
            self.objective.add_linear(*var_id, &row, factor);
        }
        self.objective.constant += factor * a.constant.sum();
    }

    fn canonicalize_norm2(&mut self, x: &Affine, factor: f64) -> Result<()> {
        if x.is_constant() {
            self.objective.constant += factor * x.constant.norm();
            return Ok(());
        }
        if factor < 0.0 {
            return Err(CvxError::NotDcp(
                "negative multiple of norm2 in a minimization".into(),
            ));
        }

        // ||x||_2 <= t, minimize factor * t
        let t = Variable::named("t", 1);
        self.constraints
            .push(Constraint::soc(Affine::var(&t), x.clone())?);
        self.objective.add_linear(t.id(), &[1.0], factor);
        self.aux_vars.push(t);
        Ok(())
    }

    fn canonicalize_sum_squares(&mut self, x: &Affine, factor: f64) -> Result<()> {
        let c = x.constant.as_slice();
        if !x.is_constant() && factor < 0.0 {
            return Err(CvxError::NotDcp(
                "negative multiple of sum_squares in a minimization".into(),
            ));
        }

        // ||Ax + c||^2 = x'A'Ax + 2c'Ax + c'c
        for (vi, ai) in &x.coeffs {
            for (vj, aj) in &x.coeffs {
                let block = csc_transpose_mul(ai, aj);
                self.objective.add_quad(*vi, *vj, &block, factor);
            }
            let lin = csc_transpose_vec(ai, c);
            self.objective.add_linear(*vi, &lin, 2.0 * factor);
        }
        self.objective.constant += factor * x.constant.norm_squared();
        Ok(())
    }
}
