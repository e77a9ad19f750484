//! # cvxalloc
//!
//! Risk-aware capital allocation as a disciplined convex program.
//!
//! Given per-asset volatility and a target weight, cvxalloc finds the weight
//! vector minimizing
//!
//! ```text
//! ||vol ∘ w||_2 + scale * ||w - target||_2^2
//! ```
//!
//! subject to full investment, a per-asset minimum weight, and a hard cap on
//! the risk term. The problem is a second-order cone program and is handed to
//! the Clarabel interior-point solver.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cvxalloc::prelude::*;
//!
//! let assets = sample_universe();
//! match allocate(&assets, &AllocationParams::default()) {
//!     Ok(allocation) => println!("{:?}", allocation.to_map()),
//!     Err(err) => eprintln!("{}", report::render_failure(&err)),
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Expressions**: vector affine maps of variables plus `norm2` and
//!   `sum_squares` atoms, with curvature tracking
//! - **Canonicalization**: norms become epigraph variables with SOC
//!   constraints; squared norms stay native QP terms
//! - **Stuffing**: builds Clarabel's `P, q, A, b` and cone list
//! - **Portfolio**: assembles the allocation problem and interprets the
//!   solver's terminal status

pub mod canon;
pub mod config;
pub mod constraints;
pub mod dcp;
pub mod error;
pub mod expr;
pub mod portfolio;
pub mod problem;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use cvxalloc::prelude::*;
/// ```
pub mod prelude {
    pub use crate::constraints::{Constraint, ConstraintExt};
    pub use crate::dcp::Curvature;
    pub use crate::error::{CvxError, Result};
    pub use crate::expr::{norm2, sum_squares, variable, Affine, Assignment, Expr, ExprId, Variable};
    pub use crate::portfolio::{
        allocate, allocate_with, report, sample_universe, AllocError, Allocation,
        AllocationParams, AllocationProblem, AssetRecord, AssetWeight, FailureKind,
    };
    pub use crate::problem::{Problem, ProblemBuilder};
    pub use crate::solver::{Settings, Solution, SolveStatus};
}

pub use error::{CvxError, Result};
pub use portfolio::{allocate, AllocError, Allocation, AllocationParams, AssetRecord};
pub use problem::Problem;
pub use solver::{Solution, SolveStatus};
