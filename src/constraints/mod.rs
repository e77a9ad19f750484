//! Constraints.

mod constraint;

pub use constraint::{Constraint, ConstraintExt};
