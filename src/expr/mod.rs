//! Expression system.
//!
//! Vector-valued affine maps of decision variables, and scalar expressions
//! composed from them with convex atoms.

mod affine;
mod expression;
mod variable;

pub use affine::{Affine, Assignment};
pub use expression::{norm2, sum_squares, Expr};
pub use variable::{variable, ExprId, Variable};
