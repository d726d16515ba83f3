//! Model solvers.
//!
//! A [`ModelSolver`] turns a [`BalanceModel`] into an [`Assignment`] within a
//! time budget. The exact partitioner only depends on this trait, so the
//! built-in [`BranchAndBoundSolver`] can be swapped for any other
//! mixed-integer backend.

mod branch_and_bound;
mod bounder;

use std::fmt::{self, Debug};
use std::time::Duration;

use crate::model::{Assignment, BalanceModel, ObjectiveBreakdown};

pub use branch_and_bound::{BranchAndBoundSolver, Parallelism};
pub use bounder::SpreadBounder;

/// Result status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// The search completed; the assignment is provably optimal.
    Optimal,
    /// The budget ran out after an assignment was found.
    Feasible,
    /// The search completed without finding any assignment.
    Infeasible,
    /// The budget ran out before any assignment was found.
    TimedOut,
}

impl SolveStatus {
    /// Optimal and feasible results carry a usable assignment.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::TimedOut => write!(f, "TimedOut"),
        }
    }
}

/// Search counters of one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub nodes_explored: u64,
    pub elapsed: Duration,
}

/// What a solver returns.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub assignment: Option<Assignment>,
    pub objective: Option<ObjectiveBreakdown>,
    pub stats: SolveStats,
}

impl SolveOutcome {
    /// An outcome without an assignment.
    pub fn failed(status: SolveStatus, stats: SolveStats) -> Self {
        Self {
            status,
            assignment: None,
            objective: None,
            stats,
        }
    }

    /// Takes the assignment if the status says it can be used.
    pub fn into_usable(self) -> Option<Assignment> {
        if self.status.has_solution() {
            self.assignment
        } else {
            None
        }
    }
}

/// Solves a balance model within a time budget.
///
/// Implementations must never block past the budget by more than a small
/// constant; on timeout they report [`SolveStatus::Feasible`] or
/// [`SolveStatus::TimedOut`].
pub trait ModelSolver: Send + Sync + Debug {
    fn solve(&self, model: &BalanceModel, time_budget: Duration) -> SolveOutcome;

    /// Name used in logs.
    fn solver_name(&self) -> &'static str;
}
