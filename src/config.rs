//! Run configuration loaded from JSON.
//!
//! ```json
//! {
//!   "assets": [{ "name": "AAPL", "volatility": 0.2, "targetWeight": 0.35 }],
//!   "params": { "minWeight": 0.01, "riskCap": 0.2, "regularizationScale": 0.05 },
//!   "solver": { "maxIter": 200 }
//! }
//! ```
//! Omitted `params` and `solver` fields fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::portfolio::{sample_universe, AllocationParams, AssetRecord};
use crate::solver::Settings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Solver knobs exposed to configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverConfig {
    pub verbose: bool,
    pub max_iter: u32,
    /// Seconds; absent means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<f64>,
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let settings = Settings::default();
        SolverConfig {
            verbose: settings.verbose,
            max_iter: settings.max_iter,
            time_limit: None,
            tolerance: settings.tol_gap_abs,
        }
    }
}

impl SolverConfig {
    pub fn to_settings(&self) -> Settings {
        Settings {
            verbose: self.verbose,
            max_iter: self.max_iter,
            time_limit: self.time_limit.unwrap_or(f64::INFINITY),
            tol_gap_abs: self.tolerance,
            tol_gap_rel: self.tolerance,
            tol_feas: self.tolerance,
        }
    }
}

/// Everything needed for one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub params: AllocationParams,
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            assets: sample_universe(),
            params: AllocationParams::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
