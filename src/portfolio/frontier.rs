//! Re-solving the allocation across a range of risk caps.
//!
//! Each cap is an independent problem; a failure at one cap does not affect
//! the others.

use tracing::debug;

use super::asset::AssetRecord;
use super::error::AllocError;
use super::orchestrator::{allocate_with, Allocation};
use super::params::AllocationParams;
use crate::solver::Settings;

/// Outcome for one risk cap.
#[derive(Debug)]
pub struct FrontierPoint {
    pub risk_cap: f64,
    pub outcome: Result<Allocation, AllocError>,
}

/// `steps` evenly spaced caps from `from` to `to`, inclusive.
pub fn linspace(from: f64, to: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![from],
        _ => {
            let step = (to - from) / (steps - 1) as f64;
            (0..steps).map(|i| from + step * i as f64).collect()
        }
    }
}

/// Solve once per cap, holding every other parameter fixed.
pub fn sweep_risk_caps(
    assets: &[AssetRecord],
    params: &AllocationParams,
    caps: &[f64],
    settings: &Settings,
) -> Vec<FrontierPoint> {
    caps.iter()
        .map(|&risk_cap| {
            debug!(risk_cap, "solving frontier point");
            let params = params.with_risk_cap(risk_cap);
            FrontierPoint {
                risk_cap,
                outcome: allocate_with(assets, &params, settings),
            }
        })
        .collect()
}

/// The smallest cap in the sweep that produced an allocation.
pub fn tightest_feasible(points: &[FrontierPoint]) -> Option<&FrontierPoint> {
    points
        .iter()
        .filter(|p| p.outcome.is_ok())
        .min_by(|a, b| a.risk_cap.total_cmp(&b.risk_cap))
}
