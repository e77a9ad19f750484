//! Problem definition and solving API.
//!
//! A `Problem` is a convex objective to minimize plus a set of cone
//! constraints. Use the builder to construct one:
//! ```ignore
//! let solution = Problem::minimize(objective)
//!     .subject_to([constraint1, constraint2])
//!     .solve()?;
//! ```
//!
//! Solving returns whatever terminal status the solver reached; an `Err` is
//! reserved for problems that could not be submitted at all.

use tracing::debug;

use crate::canon::canonicalize_objective;
use crate::constraints::Constraint;
use crate::error::{CvxError, Result};
use crate::expr::{Expr, ExprId};
use crate::solver::{solve, stuff_problem, Settings, Solution};

/// A convex minimization problem.
#[derive(Debug, Clone)]
pub struct Problem {
    /// The objective to minimize.
    pub objective: Expr,
    /// The constraints.
    pub constraints: Vec<Constraint>,
}

impl Problem {
    /// Start building a minimization problem.
    pub fn minimize(expr: Expr) -> ProblemBuilder {
        ProblemBuilder {
            objective: expr,
            constraints: Vec::new(),
        }
    }

    /// A minimization problem is DCP when its objective is convex.
    ///
    /// Constraints are cone constraints on affine expressions and are DCP by construction.
    pub fn is_dcp(&self) -> bool {
        self.objective.is_convex()
    }

    /// All user variables with their lengths, sorted by ID.
    pub fn variable_sizes(&self) -> Vec<(ExprId, usize)> {
        let mut vars = self.objective.variable_sizes();
        for c in &self.constraints {
            match c {
                Constraint::Zero(a) | Constraint::NonNeg(a) => vars.extend(a.variable_sizes()),
                Constraint::SOC { t, x } => {
                    vars.extend(t.variable_sizes());
                    vars.extend(x.variable_sizes());
                }
            }
        }
        vars.sort();
        vars.dedup();
        vars
    }

    /// Solve the problem with default settings.
    pub fn solve(&self) -> Result<Solution> {
        self.solve_with(&Settings::default())
    }

    /// Solve the problem with custom settings.
    pub fn solve_with(&self, settings: &Settings) -> Result<Solution> {
        if !self.is_dcp() {
            return Err(CvxError::NotDcp(format!(
                "objective has curvature {:?} but must be convex for minimization",
                self.objective.curvature()
            )));
        }

        let canon = canonicalize_objective(&self.objective)?;

        let mut all_vars = self.variable_sizes();
        all_vars.extend(canon.aux_vars.iter().map(|v| (v.id(), v.len())));

        let mut all_constraints = self.constraints.clone();
        all_constraints.extend(canon.constraints);

        let stuffed = stuff_problem(&canon.objective, &all_constraints, &all_vars)?;
        debug!(
            variables = all_vars.len(),
            constraints = all_constraints.len(),
            "problem stuffed"
        );

        solve(&stuffed, settings)
    }
}

/// Builder for constructing problems.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    objective: Expr,
    constraints: Vec<Constraint>,
}

impl ProblemBuilder {
    /// Add constraints to the problem.
    pub fn subject_to(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Add a single constraint.
    pub fn constraint(mut self, c: Constraint) -> Self {
        self.constraints.push(c);
        self
    }

    /// Build the problem.
    pub fn build(self) -> Problem {
        Problem {
            objective: self.objective,
            constraints: self.constraints,
        }
    }

    /// Build and solve the problem with default settings.
    pub fn solve(self) -> Result<Solution> {
        self.build().solve()
    }
}
