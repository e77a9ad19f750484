//! Matrix stuffing: converts the canonicalized problem to solver format.
//!
//! This module builds the matrices (P, q, A, b) and cone specifications
//! required by Clarabel from the canonical objective and cone constraints.

use std::collections::HashMap;

use nalgebra_sparse::CscMatrix;

use crate::canon::QuadExpr;
use crate::constraints::Constraint;
use crate::error::{CvxError, Result};
use crate::expr::{Affine, ExprId};
use crate::sparse::{csc_from_triplets, csc_scale};

/// Cone dimensions for Clarabel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConeDims {
    /// Number of zero cone (equality) rows.
    pub zero: usize,
    /// Number of nonnegative cone rows.
    pub nonneg: usize,
    /// Second-order cone dimensions (each entry is the cone dimension).
    pub soc: Vec<usize>,
}

impl ConeDims {
    /// Total number of constraint rows.
    pub fn total(&self) -> usize {
        self.zero + self.nonneg + self.soc.iter().sum::<usize>()
    }
}

/// Mapping from variable IDs to column ranges in the stacked solver variable.
#[derive(Debug, Clone)]
pub struct VariableMap {
    /// Map from variable ID to (start_col, size).
    pub id_to_col: HashMap<ExprId, (usize, usize)>,
    /// Total number of optimization variables.
    pub total_vars: usize,
}

impl VariableMap {
    /// Lay variables out in the given order.
    pub fn from_vars(vars: &[(ExprId, usize)]) -> Self {
        let mut id_to_col = HashMap::new();
        let mut offset = 0;

        for &(var_id, size) in vars {
            id_to_col.insert(var_id, (offset, size));
            offset += size;
        }

        VariableMap {
            id_to_col,
            total_vars: offset,
        }
    }

    /// Get the column range for a variable.
    pub fn get(&self, var_id: ExprId) -> Option<(usize, usize)> {
        self.id_to_col.get(&var_id).copied()
    }

    fn require(&self, var_id: ExprId) -> Result<(usize, usize)> {
        self.get(var_id).ok_or_else(|| {
            CvxError::InvalidProblem(format!("variable {} not registered", var_id.raw()))
        })
    }
}

/// Stuffed problem ready for Clarabel.
#[derive(Debug)]
pub struct StuffedProblem {
    /// Quadratic cost matrix P (n x n, upper triangle).
    pub p: CscMatrix<f64>,
    /// Linear cost vector q (n).
    pub q: Vec<f64>,
    /// Constraint matrix A (m x n).
    pub a: CscMatrix<f64>,
    /// Constraint vector b (m).
    pub b: Vec<f64>,
    /// Cone dimensions.
    pub cone_dims: ConeDims,
    /// Variable mapping for solution recovery.
    pub var_map: VariableMap,
    /// Constant offset in objective.
    pub objective_offset: f64,
}

/// Build the stuffed problem from canonicalized components.
pub fn stuff_problem(
    objective: &QuadExpr,
    constraints: &[Constraint],
    variables: &[(ExprId, usize)],
) -> Result<StuffedProblem> {
    let var_map = VariableMap::from_vars(variables);
    let (p, q) = stuff_objective(objective, &var_map)?;
    let (a, b, cone_dims) = stuff_constraints(constraints, &var_map)?;

    Ok(StuffedProblem {
        p,
        q,
        a,
        b,
        cone_dims,
        var_map,
        objective_offset: objective.constant,
    })
}

/// Stuff the objective into P and q.
fn stuff_objective(
    objective: &QuadExpr,
    var_map: &VariableMap,
) -> Result<(CscMatrix<f64>, Vec<f64>)> {
    let n = var_map.total_vars;

    let mut q = vec![0.0; n];
    for (var_id, coeffs) in &objective.linear {
        let (start, size) = var_map.require(*var_id)?;
        for (i, c) in coeffs.iter().take(size).enumerate() {
            q[start + i] += c;
        }
    }

    let mut p_rows = Vec::new();
    let mut p_cols = Vec::new();
    let mut p_vals = Vec::new();

    for ((var_i, var_j), block) in &objective.quad {
        let (start_i, _) = var_map.require(*var_i)?;
        let (start_j, _) = var_map.require(*var_j)?;
        for (row, col, val) in block.triplet_iter() {
            let global_row = start_i + row;
            let global_col = start_j + col;
            // The blocks cover the full symmetric matrix; Clarabel takes the upper triangle.
            if global_row <= global_col {
                p_rows.push(global_row);
                p_cols.push(global_col);
                p_vals.push(*val);
            }
        }
    }

    let p = csc_from_triplets(n, n, p_rows, p_cols, p_vals);

    // Clarabel minimizes (1/2) x' P x + q' x
    Ok((csc_scale(&p, 2.0), q))
}

/// Stuff constraints into A, b, and cone dims.
///
/// Rows are ordered zero cone, nonnegative cone, then one block per SOC.
fn stuff_constraints(
    constraints: &[Constraint],
    var_map: &VariableMap,
) -> Result<(CscMatrix<f64>, Vec<f64>, ConeDims)> {
    let n = var_map.total_vars;

    let mut zeros: Vec<&Affine> = Vec::new();
    let mut nonnegs: Vec<&Affine> = Vec::new();
    let mut socs: Vec<(&Affine, &Affine)> = Vec::new();

    for c in constraints {
        match c {
            Constraint::Zero(a) => zeros.push(a),
            Constraint::NonNeg(a) => nonnegs.push(a),
            Constraint::SOC { t, x } => socs.push((t, x)),
        }
    }

    let cone_dims = ConeDims {
        zero: zeros.iter().map(|e| e.len()).sum(),
        nonneg: nonnegs.iter().map(|e| e.len()).sum(),
        soc: socs.iter().map(|(t, x)| t.len() + x.len()).collect(),
    };

    let mut rows = RowWriter::new(cone_dims.total());

    // Zero cone: expr = 0, so A = coeffs, b = -constant
    for expr in zeros {
        rows.push(expr, var_map, false)?;
    }

    // Nonnegative cone: s = b - Ax = expr >= 0, so A = -coeffs, b = constant
    for expr in nonnegs {
        rows.push(expr, var_map, true)?;
    }

    // SOC: s = [t; x] in K_soc, same sign convention as the nonnegative cone
    for (t, x) in socs {
        rows.push(t, var_map, true)?;
        rows.push(x, var_map, true)?;
    }

    let m = cone_dims.total();
    let a = csc_from_triplets(m, n, rows.a_rows, rows.a_cols, rows.a_vals);

    Ok((a, rows.b, cone_dims))
}

/// Accumulates constraint rows in triplet form.
struct RowWriter {
    a_rows: Vec<usize>,
    a_cols: Vec<usize>,
    a_vals: Vec<f64>,
    b: Vec<f64>,
    offset: usize,
}

impl RowWriter {
    fn new(total_rows: usize) -> Self {
        RowWriter {
            a_rows: Vec::new(),
            a_cols: Vec::new(),
            a_vals: Vec::new(),
            b: vec![0.0; total_rows],
            offset: 0,
        }
    }

    /// Write `expr` as the next `expr.len()` rows.
    ///
    /// With `negate`, the slack equals the expression (A = -coeffs, b = constant);
    /// without, the expression is pinned to zero (A = coeffs, b = -constant).
    fn push(&mut self, expr: &Affine, var_map: &VariableMap, negate: bool) -> Result<()> {
        let sign = if negate { -1.0 } else { 1.0 };

        for (var_id, coeff) in &expr.coeffs {
            let (col_start, _) = var_map.require(*var_id)?;
            for (row, col, val) in coeff.triplet_iter() {
                self.a_rows.push(self.offset + row);
                self.a_cols.push(col_start + col);
                self.a_vals.push(*val * sign);
            }
        }

        for (i, c) in expr.constant.iter().enumerate() {
            self.b[self.offset + i] = -sign * c;
        }

        self.offset += expr.len();
        Ok(())
    }
}
