//! Vector-valued affine expressions in standard form: sum_i(A_i * x_i) + b.

use std::collections::HashMap;

use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;

use super::variable::{ExprId, Variable};
use crate::error::{CvxError, Result};
use crate::sparse::{csc_add, csc_column_sums, csc_mul_vec, csc_scale, csc_scale_rows};

/// Values assigned to variables, keyed by variable ID.
pub type Assignment = HashMap<ExprId, DVector<f64>>;

/// An affine expression `sum_i(A_i * x_i) + b` of fixed output length.
///
/// Each coefficient matrix `A_i` has shape `(len, var_len)`.
#[derive(Debug, Clone)]
pub struct Affine {
    /// Coefficient matrix per variable.
    pub coeffs: HashMap<ExprId, CscMatrix<f64>>,
    /// Constant offset, one entry per output component.
    pub constant: DVector<f64>,
}

impl Affine {
    /// The zero expression of length `len`.
    pub fn zeros(len: usize) -> Self {
        Affine {
            coeffs: HashMap::new(),
            constant: DVector::zeros(len),
        }
    }

    /// A constant vector.
    pub fn constant(value: DVector<f64>) -> Self {
        Affine {
            coeffs: HashMap::new(),
            constant: value,
        }
    }

    /// A constant scalar.
    pub fn scalar(value: f64) -> Self {
        Affine::constant(DVector::from_element(1, value))
    }

    /// The variable itself (identity coefficient).
    pub fn var(v: &Variable) -> Self {
        let mut coeffs = HashMap::new();
        coeffs.insert(v.id(), CscMatrix::identity(v.len()));
        Affine {
            coeffs,
            constant: DVector::zeros(v.len()),
        }
    }

    /// Output length.
    pub fn len(&self) -> usize {
        self.constant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no variable appears.
    pub fn is_constant(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Variable IDs appearing in this expression, in creation order.
    pub fn variables(&self) -> Vec<ExprId> {
        let mut vars: Vec<_> = self.coeffs.keys().copied().collect();
        vars.sort();
        vars
    }

    /// Variables with their lengths, in creation order.
    pub fn variable_sizes(&self) -> Vec<(ExprId, usize)> {
        let mut vars: Vec<_> = self.coeffs.iter().map(|(k, c)| (*k, c.ncols())).collect();
        vars.sort();
        vars
    }

    /// Add two expressions of the same length.
    pub fn add(&self, other: &Affine) -> Result<Affine> {
        if self.len() != other.len() {
            return Err(CvxError::LengthMismatch {
                expected: self.len(),
                got: other.len(),
            });
        }

        let mut coeffs = self.coeffs.clone();
        for (var_id, coeff) in &other.coeffs {
            coeffs
                .entry(*var_id)
                .and_modify(|c| *c = csc_add(c, coeff))
                .or_insert_with(|| coeff.clone());
        }

        Ok(Affine {
            coeffs,
            constant: &self.constant + &other.constant,
        })
    }

    /// Subtract `other` from `self`.
    pub fn sub(&self, other: &Affine) -> Result<Affine> {
        self.add(&other.neg())
    }

    /// Negate.
    pub fn neg(&self) -> Affine {
        self.scale(-1.0)
    }

    /// Multiply every component by a scalar.
    pub fn scale(&self, scalar: f64) -> Affine {
        Affine {
            coeffs: self
                .coeffs
                .iter()
                .map(|(k, v)| (*k, csc_scale(v, scalar)))
                .collect(),
            constant: &self.constant * scalar,
        }
    }

    /// Add a scalar to every component.
    pub fn offset(&self, value: f64) -> Affine {
        Affine {
            coeffs: self.coeffs.clone(),
            constant: self.constant.add_scalar(value),
        }
    }

    /// Elementwise product with a constant vector: `diag(v) * self`.
    pub fn mul_elementwise(&self, v: &DVector<f64>) -> Result<Affine> {
        if v.len() != self.len() {
            return Err(CvxError::LengthMismatch {
                expected: self.len(),
                got: v.len(),
            });
        }

        let factors = v.as_slice();
        Ok(Affine {
            coeffs: self
                .coeffs
                .iter()
                .map(|(k, c)| (*k, csc_scale_rows(c, factors)))
                .collect(),
            constant: self.constant.component_mul(v),
        })
    }

    /// Sum of all components, as a length-1 expression.
    pub fn sum(&self) -> Affine {
        Affine {
            coeffs: self
                .coeffs
                .iter()
                .map(|(k, c)| (*k, csc_column_sums(c)))
                .collect(),
            constant: DVector::from_element(1, self.constant.sum()),
        }
    }

    /// Evaluate at the given assignment; `None` if a variable is missing.
    pub fn eval(&self, values: &Assignment) -> Option<DVector<f64>> {
        let mut out = self.constant.clone();
        for (var_id, coeff) in &self.coeffs {
            let x = values.get(var_id)?;
            if x.len() != coeff.ncols() {
                return None;
            }
            let contribution = csc_mul_vec(coeff, x.as_slice());
            for (o, c) in out.iter_mut().zip(contribution) {
                *o += c;
            }
        }
        Some(out)
    }
}

impl From<&Variable> for Affine {
    fn from(v: &Variable) -> Self {
        Affine::var(v)
    }
}
