//! Canonicalization of objectives into solver standard form.

mod canonicalizer;
mod quad_expr;

pub use canonicalizer::{canonicalize_objective, CanonResult};
pub use quad_expr::QuadExpr;
