//! Plain-text rendering of allocation outcomes.

use std::fmt::Write;

use super::asset::AssetRecord;
use super::error::AllocError;
use super::frontier::FrontierPoint;
use super::orchestrator::Allocation;
use super::params::AllocationParams;

/// Render solved weights next to the inputs they came from.
pub fn render_allocation(
    allocation: &Allocation,
    assets: &[AssetRecord],
    params: &AllocationParams,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>8} {:>8}",
        "Asset", "Price", "Volatility", "Target", "Weight"
    );

    for w in &allocation.weights {
        let asset = assets.iter().find(|a| a.name == w.name);
        let (price, vol, target) = asset
            .map(|a| (a.price, a.volatility, a.target_weight))
            .unwrap_or((0.0, 0.0, 0.0));
        let _ = writeln!(
            out,
            "{:<8} {:>10.2} {:>10.4} {:>8.4} {:>8.4}",
            w.name, price, vol, target, w.weight
        );
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "Portfolio risk:  {:.4} (cap {:.4})",
        allocation.risk, params.risk_cap
    );
    let _ = writeln!(
        out,
        "Expected return: {:.4}",
        allocation.expected_return(assets)
    );
    let _ = writeln!(out, "Objective:       {:.6}", allocation.objective_value);
    let _ = write!(out, "Status:          {}", allocation.status);
    if allocation.is_inaccurate() {
        out.push_str(" (reduced accuracy)");
    }
    out.push('\n');
    out
}

/// Render a failure as a single diagnostic line.
pub fn render_failure(err: &AllocError) -> String {
    format!("Optimization failed: {err}")
}

/// Render one line per risk cap.
pub fn render_frontier(points: &[FrontierPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>8} {:>8}  Weights", "Cap", "Risk");

    for point in points {
        match &point.outcome {
            Ok(alloc) => {
                let weights: Vec<String> = alloc
                    .weights
                    .iter()
                    .map(|w| format!("{}={:.4}", w.name, w.weight))
                    .collect();
                let _ = writeln!(
                    out,
                    "{:>8.4} {:>8.4}  {}",
                    point.risk_cap,
                    alloc.risk,
                    weights.join(" ")
                );
            }
            Err(err) => {
                let _ = writeln!(out, "{:>8.4} {:>8}  {}", point.risk_cap, "-", err);
            }
        }
    }

    out
}
