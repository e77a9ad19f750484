//! Risk-capped allocation across a fixed set of assets.
//!
//! [`AllocationProblem::build`] assembles the convex program from asset data
//! and [`AllocationProblem::solve`] runs it, returning either an
//! [`Allocation`] or an [`AllocError`] naming why none exists.

mod asset;
mod builder;
mod error;
mod frontier;
mod orchestrator;
mod params;
pub mod report;

pub use asset::{sample_universe, AssetRecord};
pub use builder::AllocationProblem;
pub use error::{AllocError, FailureKind};
pub use frontier::{linspace, sweep_risk_caps, tightest_feasible, FrontierPoint};
pub use orchestrator::{allocate, allocate_with, Allocation, AssetWeight};
pub use params::AllocationParams;
