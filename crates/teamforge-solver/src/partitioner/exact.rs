//! Exact partitioner: model, solve, fall back on failure.

use std::time::Duration;

use rand::Rng;
use teamforge_config::ExactConfig;
use teamforge_core::{Group, LevelCounts, Participant, Partition, Result};
use tracing::{debug, warn};

use super::greedy::assign_greedy;
use super::{finish, prepare, Partitioner};
use crate::model::{Assignment, BalanceModelBuilder, LevelWeightPolicy, ObjectiveWeights};
use crate::solve::{BranchAndBoundSolver, ModelSolver, SolveStatus};

/// Builds the balance model for each roster and hands it to a [`ModelSolver`].
///
/// When the solver returns no usable assignment (infeasible, or out of time
/// before finding one), the greedy fill runs on the same shuffled inputs.
/// That recovery is logged as a warning and never surfaces as an error.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use teamforge_core::{Participant, SkillLevel};
/// use teamforge_solver::partitioner::{ExactPartitioner, Partitioner};
///
/// let roster: Vec<Participant> = [1, 1, 2, 2, 3, 3, 4, 4, 4]
///     .iter()
///     .enumerate()
///     .map(|(i, &v)| Participant::new(format!("p{i}"), SkillLevel::new(v).unwrap(), ""))
///     .collect();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let partition = ExactPartitioner::default().partition(&roster, 3, &mut rng).unwrap();
/// assert_eq!(partition.sizes(), vec![3, 3, 3]);
/// // One level-4 player per group and at most one of each other level: 7, 8, 9.
/// assert_eq!(partition.spread(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ExactPartitioner<S = BranchAndBoundSolver> {
    solver: S,
    config: ExactConfig,
    policy: LevelWeightPolicy,
}

impl ExactPartitioner<BranchAndBoundSolver> {
    pub fn from_config(config: &ExactConfig) -> Self {
        Self::with_solver(BranchAndBoundSolver::from_config(config), config.clone())
    }
}

impl Default for ExactPartitioner<BranchAndBoundSolver> {
    fn default() -> Self {
        Self::from_config(&ExactConfig::default())
    }
}

impl<S: ModelSolver> ExactPartitioner<S> {
    /// Uses `solver` in place of the built-in branch and bound.
    pub fn with_solver(solver: S, config: ExactConfig) -> Self {
        let policy = LevelWeightPolicy::new(config.level_weight.clone());
        Self {
            solver,
            config,
            policy,
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn config(&self) -> &ExactConfig {
        &self.config
    }

    pub fn time_budget(&self) -> Duration {
        self.config.time_limit()
    }

    fn weights_for(&self, roster: &[Participant]) -> ObjectiveWeights {
        let level_weight = self.policy.weight_for(&LevelCounts::of(roster));
        ObjectiveWeights::new(
            self.config.spread_weight,
            self.config.deviation_weight,
            level_weight,
        )
    }
}

impl<S: ModelSolver> Partitioner for ExactPartitioner<S> {
    fn partition<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        group_count: usize,
        rng: &mut R,
    ) -> Result<Partition> {
        let prepared = prepare(participants, group_count, rng)?;
        let weights = self.weights_for(&prepared.roster);
        debug!(
            event = "engine_start",
            engine = self.name(),
            participants = prepared.roster.len(),
            groups = group_count,
            level_weight = weights.level_weight(),
        );

        let model = BalanceModelBuilder::new(prepared.capacities.clone())
            .participants(prepared.roster.iter().map(Participant::level))
            .weights(weights)
            .level_balance(self.config.level_balance)
            .build()?;

        let outcome = self.solver.solve(&model, self.time_budget());
        let status = outcome.status;
        if status == SolveStatus::Feasible {
            debug!(
                event = "solve_incomplete",
                solver = self.solver.solver_name(),
                "time budget exhausted; using best assignment found"
            );
        }

        let groups = match outcome.into_usable() {
            Some(assignment) if model.is_feasible(&assignment) => {
                groups_from_assignment(&prepared.roster, &assignment, &prepared.capacities)
            }
            _ => {
                warn!(
                    event = "fallback",
                    solver = self.solver.solver_name(),
                    status = %status,
                    "exact solve produced no usable assignment; using greedy fill"
                );
                assign_greedy(&prepared.roster, &prepared.capacities)
            }
        };
        finish(groups, &prepared.capacities, self.name(), rng)
    }

    fn name(&self) -> &'static str {
        "Exact"
    }
}

fn groups_from_assignment(
    roster: &[Participant],
    assignment: &Assignment,
    capacities: &[usize],
) -> Vec<Group> {
    let mut groups: Vec<Group> = capacities.iter().map(|&c| Group::with_capacity(c)).collect();
    for (i, participant) in roster.iter().enumerate() {
        groups[assignment.group_of(i)].push(participant.clone());
    }
    groups
}
