//! Quadratic objective in standard form: x' P x + q' x + r.

use std::collections::HashMap;

use nalgebra_sparse::CscMatrix;

use crate::expr::ExprId;
use crate::sparse::{csc_add, csc_scale};

/// A quadratic expression `x' P x + q' x + r`, split into per-variable blocks.
///
/// `quad` holds every block `P_ij` of the full symmetric matrix, so both
/// `(i, j)` and `(j, i)` are present for distinct variables.
#[derive(Debug, Clone, Default)]
pub struct QuadExpr {
    /// Quadratic blocks: (var_i, var_j) -> P_ij.
    pub quad: HashMap<(ExprId, ExprId), CscMatrix<f64>>,
    /// Linear coefficients per variable.
    pub linear: HashMap<ExprId, Vec<f64>>,
    /// Constant term.
    pub constant: f64,
}

impl QuadExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `factor * block` into `P_ij`.
    pub fn add_quad(&mut self, vi: ExprId, vj: ExprId, block: &CscMatrix<f64>, factor: f64) {
        let scaled = csc_scale(block, factor);
        self.quad
            .entry((vi, vj))
            .and_modify(|c| *c = csc_add(c, &scaled))
            .or_insert(scaled);
    }

    /// Accumulate `factor * coeffs` into the linear term of `var`.
    pub fn add_linear(&mut self, var: ExprId, coeffs: &[f64], factor: f64) {
        let entry = self
            .linear
            .entry(var)
            .or_insert_with(|| vec![0.0; coeffs.len()]);
        for (e, c) in entry.iter_mut().zip(coeffs) {
            *e += factor * c;
        }
    }

    /// True when there is no quadratic term.
    pub fn is_linear(&self) -> bool {
        self.quad.values().all(|m| m.nnz() == 0)
    }
}
