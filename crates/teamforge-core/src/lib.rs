//! TeamForge Core - Core types for balanced group partitioning
//!
//! This crate provides the fundamental data model for TeamForge:
//! - Participants and validated skill levels
//! - Groups and partition results
//! - Capacity planning
//! - Level buckets and their even-share bounds

pub mod capacity;
pub mod error;
pub mod level;
pub mod participant;
pub mod partition;

pub use capacity::{checked_capacities, matches_capacities, plan_capacities};
pub use error::{PartitionError, Result};
pub use level::{LevelBounds, LevelCounts};
pub use participant::{Participant, SkillLevel};
pub use partition::{spread_of, Group, Partition};
