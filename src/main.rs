//! # cvxalloc CLI
//!
//! Solves the risk-capped allocation for a configured asset universe.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cvxalloc::config::RunConfig;
use cvxalloc::portfolio::{
    linspace, report, sweep_risk_caps, tightest_feasible, AllocationProblem, FailureKind,
};

/// Risk-capped portfolio allocation
#[derive(Parser)]
#[command(name = "cvxalloc")]
#[command(version)]
#[command(about = "Minimum-risk allocation regularized toward target weights")]
struct Cli {
    /// JSON run configuration (defaults to the built-in four-asset sample)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log solver progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Overrides {
    /// Lower bound on every weight
    #[arg(long)]
    min_weight: Option<f64>,

    /// Upper bound on portfolio risk
    #[arg(long)]
    risk_cap: Option<f64>,

    /// Strength of the pull toward target weights
    #[arg(long)]
    scale: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one allocation
    Optimize {
        #[command(flatten)]
        overrides: Overrides,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Re-solve across a range of risk caps
    Sweep {
        #[command(flatten)]
        overrides: Overrides,

        /// Smallest risk cap
        #[arg(long, default_value = "0.10")]
        from: f64,

        /// Largest risk cap
        #[arg(long, default_value = "0.25")]
        to: f64,

        /// Number of caps
        #[arg(long, default_value = "7")]
        steps: usize,
    },

    /// Print the built-in sample configuration
    Sample,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum JsonOutcome<'a> {
    Solved {
        allocation: &'a cvxalloc::Allocation,
    },
    Failed {
        reason: FailureKind,
        message: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => RunConfig::default(),
    };

    match cli.command {
        Commands::Optimize { overrides, json } => optimize(config, &overrides, json),
        Commands::Sweep {
            overrides,
            from,
            to,
            steps,
        } => sweep(config, &overrides, from, to, steps),
        Commands::Sample => {
            println!("{}", RunConfig::default().to_json()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply(config: &mut RunConfig, overrides: &Overrides) {
    if let Some(v) = overrides.min_weight {
        config.params.min_weight = v;
    }
    if let Some(v) = overrides.risk_cap {
        config.params.risk_cap = v;
    }
    if let Some(v) = overrides.scale {
        config.params.regularization_scale = v;
    }
}

fn optimize(mut config: RunConfig, overrides: &Overrides, json: bool) -> Result<ExitCode> {
    apply(&mut config, overrides);
    info!(assets = config.assets.len(), "optimizing allocation");

    let settings = config.solver.to_settings();
    let outcome = AllocationProblem::build(&config.assets, &config.params)
        .and_then(|problem| problem.solve_with(&settings));

    if json {
        let body = match &outcome {
            Ok(allocation) => JsonOutcome::Solved { allocation },
            Err(err) => JsonOutcome::Failed {
                reason: err.kind(),
                message: err.to_string(),
            },
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        match &outcome {
            Ok(allocation) => print!(
                "{}",
                report::render_allocation(allocation, &config.assets, &config.params)
            ),
            Err(err) => eprintln!("{}", report::render_failure(err)),
        }
    }

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn sweep(
    mut config: RunConfig,
    overrides: &Overrides,
    from: f64,
    to: f64,
    steps: usize,
) -> Result<ExitCode> {
    apply(&mut config, overrides);
    let caps = linspace(from, to, steps);
    info!(points = caps.len(), from, to, "sweeping risk caps");

    let points = sweep_risk_caps(
        &config.assets,
        &config.params,
        &caps,
        &config.solver.to_settings(),
    );
    print!("{}", report::render_frontier(&points));

    match tightest_feasible(&points) {
        Some(point) => {
            println!("\nTightest feasible cap: {:.4}", point.risk_cap);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("\nNo cap in the sweep admits an allocation");
            Ok(ExitCode::FAILURE)
        }
    }
}
