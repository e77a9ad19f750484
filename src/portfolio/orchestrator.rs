//! Submits an allocation problem and interprets the solver's terminal status.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use super::asset::AssetRecord;
use super::builder::AllocationProblem;
use super::error::AllocError;
use super::params::AllocationParams;
use crate::solver::{Settings, Solution, SolveStatus};

/// One solved weight, paired with its asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetWeight {
    pub name: String,
    pub weight: f64,
}

/// A successfully solved allocation.
#[derive(Debug, Clone, Serialize)]
pub struct Allocation {
    /// Weights in input asset order.
    pub weights: Vec<AssetWeight>,
    /// Objective value at the solution.
    pub objective_value: f64,
    /// Risk term at the solution.
    pub risk: f64,
    /// Unscaled squared distance to the target weights.
    pub target_distance: f64,
    pub status: SolveStatus,
    pub iterations: u32,
    pub solve_time: f64,
}

impl Allocation {
    /// True when the solver only reached reduced accuracy.
    pub fn is_inaccurate(&self) -> bool {
        self.status == SolveStatus::OptimalInaccurate
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|w| w.name == name)
            .map(|w| w.weight)
    }

    /// Weight values in asset order.
    pub fn values(&self) -> Vec<f64> {
        self.weights.iter().map(|w| w.weight).collect()
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().map(|w| w.weight).sum()
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.weights
            .iter()
            .map(|w| (w.name.clone(), w.weight))
            .collect()
    }

    /// Weighted historical return, matching assets by name.
    pub fn expected_return(&self, assets: &[AssetRecord]) -> f64 {
        assets
            .iter()
            .filter_map(|a| self.weight(&a.name).map(|w| w * a.expected_return))
            .sum()
    }
}

impl AllocationProblem {
    /// Solve with default solver settings.
    pub fn solve(&self) -> Result<Allocation, AllocError> {
        self.solve_with(&Settings::default())
    }

    /// Make a single blocking solve attempt.
    pub fn solve_with(&self, settings: &Settings) -> Result<Allocation, AllocError> {
        let solution = self.problem().solve_with(settings)?;
        self.interpret(solution)
    }

    /// Map a terminal solver status to an allocation or a failure.
    pub fn interpret(&self, solution: Solution) -> Result<Allocation, AllocError> {
        let status = solution.status;
        match status {
            SolveStatus::Optimal | SolveStatus::OptimalInaccurate => {
                let allocation = self.extract(&solution)?;
                if allocation.is_inaccurate() {
                    warn!(
                        iterations = allocation.iterations,
                        "solver reached reduced accuracy"
                    );
                }
                info!(
                    status = %status,
                    risk = allocation.risk,
                    objective = allocation.objective_value,
                    iterations = allocation.iterations,
                    "allocation solved"
                );
                Ok(allocation)
            }
            SolveStatus::Infeasible | SolveStatus::InfeasibleInaccurate => {
                warn!(status = %status, "allocation infeasible");
                Err(AllocError::Infeasible(format!(
                    "solver reported {status}: no weights satisfy the budget, minimum weight and risk cap together"
                )))
            }
            SolveStatus::Unbounded | SolveStatus::UnboundedInaccurate => {
                warn!(status = %status, "allocation unbounded");
                Err(AllocError::Unbounded(format!("solver reported {status}")))
            }
            SolveStatus::MaxIterations | SolveStatus::NumericalError | SolveStatus::Unknown => {
                warn!(status = %status, "solver did not converge");
                Err(AllocError::SolverError(format!(
                    "solver stopped with status {status}"
                )))
            }
        }
    }

    fn extract(&self, solution: &Solution) -> Result<Allocation, AllocError> {
        let primal = solution
            .primal
            .as_ref()
            .ok_or_else(|| AllocError::SolverError("solver returned no primal values".into()))?;
        let values = primal
            .get(&self.weights().id())
            .ok_or_else(|| AllocError::SolverError("solver returned no weights".into()))?;
        if values.len() != self.names().len() {
            return Err(AllocError::SolverError(format!(
                "expected {} weights, solver returned {}",
                self.names().len(),
                values.len()
            )));
        }

        let risk = self
            .risk_term()
            .value(primal)
            .ok_or_else(|| AllocError::SolverError("cannot evaluate risk term".into()))?;
        let target_distance = self
            .regularization_term()
            .value(primal)
            .ok_or_else(|| AllocError::SolverError("cannot evaluate regularization".into()))?;
        let objective_value = solution
            .value
            .unwrap_or(risk + self.params().regularization_scale * target_distance);

        let weights = self
            .names()
            .iter()
            .zip(values.iter())
            .map(|(name, &weight)| AssetWeight {
                name: name.clone(),
                weight,
            })
            .collect();

        Ok(Allocation {
            weights,
            objective_value,
            risk,
            target_distance,
            status: solution.status,
            iterations: solution.iterations,
            solve_time: solution.solve_time,
        })
    }
}

/// Build and solve in one step.
pub fn allocate(assets: &[AssetRecord], params: &AllocationParams) -> Result<Allocation, AllocError> {
    allocate_with(assets, params, &Settings::default())
}

/// Build and solve in one step with custom solver settings.
pub fn allocate_with(
    assets: &[AssetRecord],
    params: &AllocationParams,
    settings: &Settings,
) -> Result<Allocation, AllocError> {
    AllocationProblem::build(assets, params)?.solve_with(settings)
}
