//! End-to-end allocation tests against the Clarabel backend.

use cvxalloc::prelude::*;
use cvxalloc::portfolio::{linspace, sweep_risk_caps, tightest_feasible};

/// Slack for constraint checks on solver output
const TOL: f64 = 1e-5;

fn four_assets(targets: [f64; 4]) -> Vec<AssetRecord> {
    let vols = [0.20, 0.245, 0.224, 0.265];
    ["A", "B", "C", "D"]
        .iter()
        .zip(vols)
        .zip(targets)
        .map(|((name, vol), target)| AssetRecord::new(*name, vol, target))
        .collect()
}

fn assert_feasible(alloc: &Allocation, params: &AllocationParams) {
    assert!((alloc.total() - 1.0).abs() < TOL, "sum = {}", alloc.total());
    for w in &alloc.weights {
        assert!(
            w.weight >= params.min_weight - TOL,
            "{} = {} below {}",
            w.name,
            w.weight,
            params.min_weight
        );
    }
    assert!(
        alloc.risk <= params.risk_cap + TOL,
        "risk {} over cap {}",
        alloc.risk,
        params.risk_cap
    );
}

#[test]
fn test_equal_targets_favor_low_volatility() {
    let assets = four_assets([0.25; 4]);
    let params = AllocationParams::default();
    let alloc = allocate(&assets, &params).expect("allocation failed");

    assert_feasible(&alloc, &params);
    assert_eq!(alloc.weights.len(), 4);
    let a = alloc.weight("A").unwrap();
    let d = alloc.weight("D").unwrap();
    assert!(a >= d, "A = {a}, D = {d}");
    assert!(a > 0.25 && d < 0.25);
}

#[test]
fn test_sample_universe_solves() {
    let assets = sample_universe();
    let params = AllocationParams::default();
    let alloc = allocate(&assets, &params).expect("allocation failed");

    assert_feasible(&alloc, &params);
    let names: Vec<&str> = alloc.weights.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["AAPL", "GOOGL", "MSFT", "AMZN"]);
    assert!(alloc.expected_return(&assets) > 0.10);
}

#[test]
fn test_min_weight_over_budget_is_infeasible_for_any_cap() {
    let assets = four_assets([0.25; 4]);
    for cap in [0.05, 0.2, 1.0, 10.0] {
        let params = AllocationParams::default()
            .with_min_weight(0.30)
            .with_risk_cap(cap);
        let err = allocate(&assets, &params).unwrap_err();
        assert!(matches!(err, AllocError::Infeasible(_)), "cap {cap}: {err}");
    }
}

#[test]
fn test_cap_below_minimum_risk_is_infeasible() {
    // Minimum achievable risk for these volatilities is about 0.115
    let assets = four_assets([0.25; 4]);
    let params = AllocationParams::default().with_risk_cap(0.01);
    let err = allocate(&assets, &params).unwrap_err();
    assert!(matches!(err, AllocError::Infeasible(_)), "{err}");
    assert!(report::render_failure(&err).starts_with("Optimization failed: infeasible"));
}

#[test]
fn test_binding_risk_cap() {
    // Targets pull everything into the riskiest asset, so the cap binds
    let assets = four_assets([0.0, 0.0, 0.0, 1.0]);
    let params = AllocationParams::default()
        .with_regularization_scale(5.0)
        .with_risk_cap(0.15);
    let alloc = allocate(&assets, &params).expect("allocation failed");

    assert_feasible(&alloc, &params);
    assert!((alloc.risk - 0.15).abs() < 1e-4, "risk = {}", alloc.risk);

    let loose = allocate(&assets, &params.with_risk_cap(1.0)).expect("allocation failed");
    assert!(loose.risk > 0.2);
    assert!(loose.target_distance < alloc.target_distance);
}

#[test]
fn test_target_distance_shrinks_with_scale() {
    let assets = four_assets([0.35, 0.25, 0.20, 0.20]);
    let mut previous = f64::INFINITY;

    for scale in [0.01, 0.05, 0.5, 5.0] {
        let params = AllocationParams::default().with_regularization_scale(scale);
        let alloc = allocate(&assets, &params).expect("allocation failed");
        assert_feasible(&alloc, &params);
        assert!(
            alloc.target_distance <= previous + 1e-6,
            "scale {scale}: distance {} > {}",
            alloc.target_distance,
            previous
        );
        previous = alloc.target_distance;
    }

    assert!(previous < 1e-4);
}

#[test]
fn test_volatility_scaling() {
    let k = 2.0;
    let base_assets = four_assets([0.35, 0.25, 0.20, 0.20]);
    let base_params = AllocationParams::default();

    // Scaling the whole objective by k leaves its minimizer unchanged
    let scaled_assets: Vec<AssetRecord> = base_assets
        .iter()
        .map(|a| AssetRecord::new(a.name.clone(), a.volatility * k, a.target_weight))
        .collect();
    let scaled_params = base_params
        .with_risk_cap(base_params.risk_cap * k)
        .with_regularization_scale(base_params.regularization_scale * k);

    let base = allocate(&base_assets, &base_params).expect("allocation failed");
    let scaled = allocate(&scaled_assets, &scaled_params).expect("allocation failed");

    for (b, s) in base.values().iter().zip(scaled.values()) {
        assert!((b - s).abs() < 1e-4, "{b} vs {s}");
    }
    assert!((scaled.risk - k * base.risk).abs() < 1e-4);
}

#[test]
fn test_repeat_solves_agree() {
    let assets = sample_universe();
    let params = AllocationParams::default();
    let first = allocate(&assets, &params).expect("allocation failed");
    let second = allocate(&assets, &params).expect("allocation failed");

    for (a, b) in first.values().iter().zip(second.values()) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn test_single_asset_takes_everything() {
    let assets = vec![AssetRecord::new("ONLY", 0.2, 1.0)];
    let params = AllocationParams::default().with_risk_cap(0.25);
    let alloc = allocate(&assets, &params).expect("allocation failed");

    assert!((alloc.weights[0].weight - 1.0).abs() < TOL);
    assert!((alloc.risk - 0.2).abs() < 1e-4);
}

#[test]
fn test_single_asset_over_cap() {
    let assets = vec![AssetRecord::new("ONLY", 0.3, 1.0)];
    let params = AllocationParams::default().with_risk_cap(0.25);
    assert!(matches!(
        allocate(&assets, &params),
        Err(AllocError::Infeasible(_))
    ));
}

#[test]
fn test_invalid_inputs_are_rejected_before_solving() {
    let params = AllocationParams::default();
    assert!(matches!(
        allocate(&[], &params),
        Err(AllocError::InvalidInput(_))
    ));

    let mut assets = four_assets([0.25; 4]);
    assets[1].volatility = f64::NAN;
    assert!(matches!(
        allocate(&assets, &params),
        Err(AllocError::InvalidInput(_))
    ));

    let assets = four_assets([0.25; 4]);
    let params = params.with_regularization_scale(-1.0);
    assert!(matches!(
        allocate(&assets, &params),
        Err(AllocError::InvalidInput(_))
    ));
}

#[test]
fn test_iteration_limit_is_solver_error() {
    let assets = sample_universe();
    let settings = Settings {
        max_iter: 1,
        ..Settings::default()
    };
    let err = allocate_with(&assets, &AllocationParams::default(), &settings).unwrap_err();
    assert!(matches!(err, AllocError::SolverError(_)), "{err}");
}

#[test]
fn test_risk_cap_sweep() {
    let assets = four_assets([0.25; 4]);
    let caps = linspace(0.05, 0.25, 5);
    let points = sweep_risk_caps(&assets, &AllocationParams::default(), &caps, &Settings::default());

    assert_eq!(points.len(), 5);
    // Minimum achievable risk sits between the second and third caps
    assert!(points[..2]
        .iter()
        .all(|p| matches!(p.outcome, Err(AllocError::Infeasible(_)))));
    assert!(points[2..].iter().all(|p| p.outcome.is_ok()));

    let tightest = tightest_feasible(&points).expect("no feasible cap");
    assert!((tightest.risk_cap - 0.15).abs() < 1e-12);
}
