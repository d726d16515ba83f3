//! TeamForge Solver - Partitioning engines
//!
//! This crate provides:
//! - The exact balance model and its builder
//! - A branch-and-bound [`solve::ModelSolver`] with time and node limits
//! - The exact, greedy and local swap [`partitioner::Partitioner`]s
//! - Logging of finished partitions

pub mod model;
pub mod partitioner;
pub mod report;
pub mod solve;
pub mod termination;

pub use model::{
    Assignment, BalanceModel, BalanceModelBuilder, LevelWeightPolicy, ObjectiveBreakdown,
    ObjectiveWeights,
};
pub use partitioner::{
    assign_greedy, Engine, ExactPartitioner, GreedyPartitioner, LocalSwapPartitioner,
    Partitioner, RefineStats, SwapRefiner,
};
pub use report::log_partition;
pub use solve::{
    BranchAndBoundSolver, ModelSolver, Parallelism, SolveOutcome, SolveStats, SolveStatus,
};
pub use termination::{
    NodeCountTermination, OrTermination, SearchProgress, Termination, TimeTermination,
};
