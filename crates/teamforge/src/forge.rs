//! Entry point that hides engine selection and randomness.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use teamforge_config::{ConfigError, EngineConfig};
use teamforge_core::{Participant, Partition, PartitionError, Result};
use teamforge_solver::{log_partition, Engine, Partitioner};
use tracing::{debug, info};

/// A configured partitioning engine.
///
/// Each call is independent: the engine holds no state between calls
/// besides its configuration.
#[derive(Debug)]
pub struct TeamForge {
    config: EngineConfig,
    engine: Engine,
}

impl TeamForge {
    pub fn new(config: EngineConfig) -> Self {
        let engine = Engine::from_config(&config);
        Self { config, engine }
    }

    /// Loads the configuration from a TOML or YAML file.
    pub fn from_config_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let config = if is_yaml {
            EngineConfig::from_yaml_file(path)?
        } else {
            EngineConfig::load(path)?
        };
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Partitions with a generator seeded from `random_seed`, or from the OS
    /// when no seed is configured.
    pub fn partition(&self, participants: &[Participant], group_count: usize) -> Result<Partition> {
        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.partition_with_rng(participants, group_count, &mut rng)
    }

    /// Partitions drawing every random decision from `rng`.
    ///
    /// # Errors
    ///
    /// [`PartitionError::InsufficientParticipants`] when the roster is
    /// smaller than the group count or the configured `min_participants`;
    /// [`PartitionError::NoGroups`] for a zero group count.
    pub fn partition_with_rng<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        group_count: usize,
        rng: &mut R,
    ) -> Result<Partition> {
        if let Some(required) = self.config.min_participants {
            if participants.len() < required {
                debug!(
                    event = "partition_rejected",
                    participants = participants.len(),
                    required,
                );
                return Err(PartitionError::InsufficientParticipants {
                    found: participants.len(),
                    required,
                });
            }
        }

        info!(
            event = "partition_start",
            engine = self.engine.name(),
            participants = participants.len(),
            groups = group_count,
        );
        let partition = self.engine.partition(participants, group_count, rng)?;
        log_partition(&partition);
        Ok(partition)
    }
}

impl Default for TeamForge {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Partitions with the default configuration.
///
/// Use [`TeamForge::from_config_file`] to partition with settings from a file.
pub fn partition(participants: &[Participant], group_count: usize) -> Result<Partition> {
    TeamForge::default().partition(participants, group_count)
}
