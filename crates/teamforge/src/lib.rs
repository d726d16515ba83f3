//! TeamForge - Balanced team partitioning in Rust
//!
//! Hand over a roster and a group count, get back equally sized groups with
//! balanced skill sums and an even spread of every skill level.
//!
//! # Example
//!
//! ```rust
//! use teamforge::prelude::*;
//!
//! let roster: Vec<Participant> = [1, 2, 3, 4, 1, 2, 3, 4, 2]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &level)| Participant::try_new(format!("player {i}"), level, "member").unwrap())
//!     .collect();
//!
//! let forge = TeamForge::new(EngineConfig::default().with_random_seed(7));
//! let partition = forge.partition(&roster, 3).unwrap();
//! assert_eq!(partition.sizes(), vec![3, 3, 3]);
//! ```

// Data model
pub use teamforge_core::{
    plan_capacities, Group, LevelBounds, LevelCounts, Participant, Partition, PartitionError,
    Result, SkillLevel,
};

// Configuration
pub use teamforge_config::{
    ConfigError, EngineConfig, EngineKind, ExactConfig, LevelBalance, LevelWeightConfig,
    LocalSwapConfig, SolverThreads, MAX_OBJECTIVE_WEIGHT,
};

// Engines
pub use teamforge_solver::{
    BranchAndBoundSolver, Engine, ExactPartitioner, GreedyPartitioner, LocalSwapPartitioner,
    ModelSolver, Partitioner, SolveOutcome, SolveStatus, SwapRefiner,
};

/// The model layer, for plugging in another [`ModelSolver`].
pub use teamforge_solver::model;

mod forge;
pub use forge::{partition, TeamForge};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{partition, TeamForge};
    pub use super::{EngineConfig, EngineKind, LevelBalance};
    pub use super::{Group, Participant, Partition, PartitionError, SkillLevel};
    pub use super::Partitioner;
}
