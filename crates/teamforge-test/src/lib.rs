//! Shared test fixtures for TeamForge crates.
//!
//! This crate provides roster builders and balance assertions for testing.
//! It does NOT depend on `teamforge-solver`, so the solver can use it as a
//! dev-dependency.
//!
//! - [`roster`] - Participants and generated rosters
//! - [`assertions`] - Checks of the partition invariants
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! teamforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use teamforge_test::roster::make_roster;
//! use teamforge_test::assertions::assert_partition_valid;
//! ```

pub mod assertions;
pub mod roster;

pub use assertions::{assert_level_balanced, assert_partition_valid};
pub use roster::{make_roster, participant};
