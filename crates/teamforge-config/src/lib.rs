//! Configuration system for TeamForge.
//!
//! Load engine configuration from TOML or YAML to choose the partitioning
//! engine, the exact solver's time budget and objective weights, and the
//! local swap pass cap without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use teamforge_config::{EngineConfig, EngineKind};
//! use std::time::Duration;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     engine = "exact"
//!     random_seed = 7
//!     min_participants = 15
//!
//!     [exact]
//!     time_limit_ms = 2000
//!     level_balance = "soft"
//!
//!     [local_swap]
//!     max_passes = 50
//! "#).unwrap();
//!
//! assert_eq!(config.engine, EngineKind::Exact);
//! assert_eq!(config.time_limit(), Duration::from_millis(2000));
//! assert_eq!(config.local_swap.max_passes, 50);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use teamforge_config::EngineConfig;
//!
//! let config = EngineConfig::load("teamforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Largest accepted `spread_weight` or `deviation_weight`.
pub const MAX_OBJECTIVE_WEIGHT: i64 = 1_000_000;

/// Main engine configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Which partitioning engine to run.
    #[serde(default)]
    pub engine: EngineKind,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Caller policy: reject rosters smaller than this.
    #[serde(default)]
    pub min_participants: Option<usize>,

    /// Exact partitioner configuration.
    #[serde(default)]
    pub exact: ExactConfig,

    /// Local swap engine configuration.
    #[serde(default)]
    pub local_swap: LocalSwapConfig,
}

impl EngineConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the engine.
    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the minimum roster size.
    pub fn with_min_participants(mut self, min: usize) -> Self {
        self.min_participants = Some(min);
        self
    }

    /// Sets the exact solver time budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.exact.time_limit_ms = limit.as_millis().min(u128::from(u64::MAX)) as u64;
        self
    }

    /// Sets the exact model's level balance mode.
    pub fn with_level_balance(mut self, mode: LevelBalance) -> Self {
        self.exact.level_balance = mode;
        self
    }

    /// Returns the exact solver's time budget.
    pub fn time_limit(&self) -> Duration {
        self.exact.time_limit()
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exact.time_limit_ms == 0 {
            return Err(ConfigError::Invalid(
                "exact.time_limit_ms must be positive".to_string(),
            ));
        }
        if let SolverThreads::Count(0) = self.exact.solver_threads {
            return Err(ConfigError::Invalid(
                "exact.solver_threads count must be positive".to_string(),
            ));
        }
        if self.exact.spread_weight <= 0 || self.exact.deviation_weight < 0 {
            return Err(ConfigError::Invalid(
                "exact objective weights must be non-negative, spread_weight positive"
                    .to_string(),
            ));
        }
        if self.exact.spread_weight > MAX_OBJECTIVE_WEIGHT
            || self.exact.deviation_weight > MAX_OBJECTIVE_WEIGHT
        {
            return Err(ConfigError::Invalid(format!(
                "exact objective weights must not exceed {MAX_OBJECTIVE_WEIGHT}"
            )));
        }
        self.exact.level_weight.validate()?;
        if self.local_swap.max_passes == 0 {
            return Err(ConfigError::Invalid(
                "local_swap.max_passes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partitioning engine selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Exact optimization with greedy fallback.
    #[default]
    Exact,

    /// Bucket-by-level greedy placement refined by pairwise swaps.
    LocalSwap,

    /// Greedy capacity fill only.
    Greedy,
}

/// How the exact model treats per-level counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelBalance {
    /// Per-level counts constrained to their floor/ceil share, plus the soft term.
    #[default]
    Bounded,

    /// Per-level deviation penalized by the weighted soft term only.
    Soft,
}

/// Thread count for the exact solver's search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverThreads {
    /// Let the thread pool decide.
    #[default]
    Auto,

    /// Search on the calling thread.
    None,

    /// Specific number of threads.
    Count(usize),
}

/// Exact partitioner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ExactConfig {
    /// Solver time budget in milliseconds.
    pub time_limit_ms: u64,

    /// Maximum number of search nodes (None = unlimited).
    pub node_limit: Option<u64>,

    /// Worker threads for the search.
    pub solver_threads: SolverThreads,

    /// Per-level count handling.
    pub level_balance: LevelBalance,

    /// Weight of the max-min skill sum spread.
    pub spread_weight: i64,

    /// Weight of the summed deviation from the floor-rounded average sum.
    pub deviation_weight: i64,

    /// Adaptive weight of the per-level deviation term.
    pub level_weight: LevelWeightConfig,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 5_000,
            node_limit: None,
            solver_threads: SolverThreads::Auto,
            level_balance: LevelBalance::Bounded,
            spread_weight: 1_000,
            deviation_weight: 1,
            level_weight: LevelWeightConfig::default(),
        }
    }
}

impl ExactConfig {
    /// Returns the time budget as a Duration.
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

/// Policy for choosing the per-level deviation weight from the roster.
///
/// Well-spread full rosters get the largest weight, small or skewed rosters
/// the smallest, everything else the standard weight.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct LevelWeightConfig {
    /// Always use this weight, bypassing the policy.
    pub fixed: Option<f64>,

    pub well_spread: f64,
    pub standard: f64,
    pub skewed: f64,

    /// Roster size at which the well-spread weight may apply.
    pub full_roster_size: usize,

    /// Per-level count range that counts as well spread.
    pub well_spread_min: usize,
    pub well_spread_max: usize,

    /// A level count below `skew_min` or above `skew_max` is skewed.
    pub skew_min: usize,
    pub skew_max: usize,
}

impl Default for LevelWeightConfig {
    fn default() -> Self {
        Self {
            fixed: None,
            well_spread: 0.20,
            standard: 0.10,
            skewed: 0.07,
            full_roster_size: 18,
            well_spread_min: 3,
            well_spread_max: 6,
            skew_min: 2,
            skew_max: 8,
        }
    }
}

impl LevelWeightConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let weights = [self.well_spread, self.standard, self.skewed]
            .into_iter()
            .chain(self.fixed);
        for w in weights {
            if !(0.0..1.0).contains(&w) {
                return Err(ConfigError::Invalid(format!(
                    "level weight {w} must lie in [0, 1)"
                )));
            }
        }
        if self.well_spread_min > self.well_spread_max || self.skew_min > self.skew_max {
            return Err(ConfigError::Invalid(
                "level weight count ranges are inverted".to_string(),
            ));
        }
        Ok(())
    }
}

/// Local swap engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct LocalSwapConfig {
    /// Cap on improvement passes.
    pub max_passes: usize,
}

impl Default for LocalSwapConfig {
    fn default() -> Self {
        Self { max_passes: 100 }
    }
}
