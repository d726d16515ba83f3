//! Partitioning engines.
//!
//! Every engine implements [`Partitioner`]. [`Engine`] selects one of them
//! from an [`EngineConfig`], so callers hold a single value regardless of the
//! configured strategy.

mod exact;
mod greedy;
mod local_swap;
mod refiner;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::Rng;
use teamforge_config::{EngineConfig, EngineKind};
use teamforge_core::{checked_capacities, Group, Participant, Partition, Result};
use tracing::error;

use crate::solve::BranchAndBoundSolver;

pub use exact::ExactPartitioner;
pub use greedy::{assign_greedy, GreedyPartitioner};
pub use local_swap::LocalSwapPartitioner;
pub use refiner::{RefineStats, SwapRefiner};

/// Splits a roster into `group_count` groups of planned capacity.
///
/// Implementations must return exactly `group_count` groups whose sizes are
/// a permutation of [`teamforge_core::plan_capacities`], with every
/// participant in exactly one group. All randomness is drawn from `rng`.
pub trait Partitioner: Send + Sync + Debug {
    /// Partitions `participants` into `group_count` groups.
    ///
    /// # Errors
    ///
    /// - [`teamforge_core::PartitionError::NoGroups`] if `group_count` is 0.
    /// - [`teamforge_core::PartitionError::InsufficientParticipants`] if the
    ///   roster is empty or smaller than `group_count`.
    fn partition<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        group_count: usize,
        rng: &mut R,
    ) -> Result<Partition>;

    /// Name used in logs.
    fn name(&self) -> &'static str;
}

/// The configured engine.
#[derive(Debug)]
pub enum Engine {
    Exact(ExactPartitioner<BranchAndBoundSolver>),
    LocalSwap(LocalSwapPartitioner),
    Greedy(GreedyPartitioner),
}

impl Engine {
    pub fn from_config(config: &EngineConfig) -> Self {
        match config.engine {
            EngineKind::Exact => Engine::Exact(ExactPartitioner::from_config(&config.exact)),
            EngineKind::LocalSwap => {
                Engine::LocalSwap(LocalSwapPartitioner::from_config(&config.local_swap))
            }
            EngineKind::Greedy => Engine::Greedy(GreedyPartitioner::new()),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Partitioner for Engine {
    fn partition<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        group_count: usize,
        rng: &mut R,
    ) -> Result<Partition> {
        match self {
            Engine::Exact(p) => p.partition(participants, group_count, rng),
            Engine::LocalSwap(p) => p.partition(participants, group_count, rng),
            Engine::Greedy(p) => p.partition(participants, group_count, rng),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Engine::Exact(p) => p.name(),
            Engine::LocalSwap(p) => p.name(),
            Engine::Greedy(p) => p.name(),
        }
    }
}

/// Validated, shuffled inputs of one partitioning call.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub roster: Vec<Participant>,
    pub capacities: Vec<usize>,
}

/// Plans capacities and shuffles both the roster and the capacity slots.
pub(crate) fn prepare<R: Rng + ?Sized>(
    participants: &[Participant],
    group_count: usize,
    rng: &mut R,
) -> Result<Prepared> {
    let mut capacities = checked_capacities(participants.len(), group_count)?;
    capacities.shuffle(rng);
    let mut roster = participants.to_vec();
    roster.shuffle(rng);
    Ok(Prepared { roster, capacities })
}

/// Shuffles member order inside each group and checks the size invariant.
pub(crate) fn finish<R: Rng + ?Sized>(
    mut groups: Vec<Group>,
    capacities: &[usize],
    engine: &'static str,
    rng: &mut R,
) -> Result<Partition> {
    for group in &mut groups {
        group.members_mut().shuffle(rng);
    }
    let partition = Partition::new(groups);
    if let Err(err) = partition.verify_capacities(capacities) {
        error!(event = "capacity_violation", engine, error = %err);
        return Err(err);
    }
    Ok(partition)
}
