//! Sparse matrix utilities.
//!
//! Helper functions for working with nalgebra-sparse matrices.

use std::collections::HashMap;

use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Create a CSC matrix from triplets (row, col, value).
///
/// Duplicates are summed together.
pub fn csc_from_triplets(
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
) -> CscMatrix<f64> {
    if rows.is_empty() {
        return CscMatrix::zeros(nrows, ncols);
    }

    let mut coo = CooMatrix::new(nrows, ncols);
    for ((row, col), val) in rows.into_iter().zip(cols).zip(vals) {
        if row < nrows && col < ncols {
            coo.push(row, col, val);
        }
    }

    CscMatrix::from(&coo)
}

/// Build a square diagonal matrix.
pub fn csc_diag(values: &[f64]) -> CscMatrix<f64> {
    let n = values.len();
    let idx: Vec<usize> = (0..n).collect();
    csc_from_triplets(n, n, idx.clone(), idx, values.to_vec())
}

/// Add two CSC matrices of the same dimensions.
pub fn csc_add(a: &CscMatrix<f64>, b: &CscMatrix<f64>) -> CscMatrix<f64> {
    let mut rows = Vec::with_capacity(a.nnz() + b.nnz());
    let mut cols = Vec::with_capacity(a.nnz() + b.nnz());
    let mut vals = Vec::with_capacity(a.nnz() + b.nnz());

    for (r, c, v) in a.triplet_iter().chain(b.triplet_iter()) {
        rows.push(r);
        cols.push(c);
        vals.push(*v);
    }

    csc_from_triplets(a.nrows(), a.ncols(), rows, cols, vals)
}

/// Scale a CSC matrix.
pub fn csc_scale(a: &CscMatrix<f64>, scalar: f64) -> CscMatrix<f64> {
    let values: Vec<f64> = a.values().iter().map(|v| v * scalar).collect();
    let col_offsets: Vec<usize> = a.col_offsets().to_vec();
    let row_indices: Vec<usize> = a.row_indices().to_vec();
    CscMatrix::try_from_csc_data(a.nrows(), a.ncols(), col_offsets, row_indices, values)
        .unwrap_or_else(|_| CscMatrix::zeros(a.nrows(), a.ncols()))
}

/// Scale row `i` of a CSC matrix by `factors[i]`, i.e. `diag(factors) * a`.
pub fn csc_scale_rows(a: &CscMatrix<f64>, factors: &[f64]) -> CscMatrix<f64> {
    let values: Vec<f64> = a
        .triplet_iter()
        .map(|(r, _, v)| v * factors.get(r).copied().unwrap_or(0.0))
        .collect();
    let col_offsets: Vec<usize> = a.col_offsets().to_vec();
    let row_indices: Vec<usize> = a.row_indices().to_vec();
    CscMatrix::try_from_csc_data(a.nrows(), a.ncols(), col_offsets, row_indices, values)
        .unwrap_or_else(|_| CscMatrix::zeros(a.nrows(), a.ncols()))
}

/// Collapse all rows into one: `1' * a`.
pub fn csc_column_sums(a: &CscMatrix<f64>) -> CscMatrix<f64> {
    let mut rows = Vec::with_capacity(a.nnz());
    let mut cols = Vec::with_capacity(a.nnz());
    let mut vals = Vec::with_capacity(a.nnz());

    for (_, c, v) in a.triplet_iter() {
        rows.push(0);
        cols.push(c);
        vals.push(*v);
    }

    csc_from_triplets(1, a.ncols(), rows, cols, vals)
}

/// Compute `a' * b` for two matrices sharing a row count.
pub fn csc_transpose_mul(a: &CscMatrix<f64>, b: &CscMatrix<f64>) -> CscMatrix<f64> {
    let mut b_by_row: HashMap<usize, Vec<(usize, f64)>> = HashMap::new();
    for (r, c, v) in b.triplet_iter() {
        b_by_row.entry(r).or_default().push((c, *v));
    }

    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();

    for (r, i, va) in a.triplet_iter() {
        if let Some(entries) = b_by_row.get(&r) {
            for &(j, vb) in entries {
                rows.push(i);
                cols.push(j);
                vals.push(va * vb);
            }
        }
    }

    csc_from_triplets(a.ncols(), b.ncols(), rows, cols, vals)
}

/// Compute `a' * v` as a dense vector.
pub fn csc_transpose_vec(a: &CscMatrix<f64>, v: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.ncols()];
    for (r, c, val) in a.triplet_iter() {
        out[c] += val * v.get(r).copied().unwrap_or(0.0);
    }
    out
}

/// Compute `a * v` as a dense vector.
pub fn csc_mul_vec(a: &CscMatrix<f64>, v: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.nrows()];
    for (r, c, val) in a.triplet_iter() {
        out[r] += val * v.get(c).copied().unwrap_or(0.0);
    }
    out
}
