//! Builder for [`BalanceModel`].

use teamforge_config::LevelBalance;
use teamforge_core::{LevelBounds, LevelCounts, PartitionError, Result, SkillLevel};

use super::{BalanceModel, ObjectiveWeights};

/// Accumulates participants and settings, then freezes them into a [`BalanceModel`].
///
/// # Example
///
/// ```
/// use teamforge_core::SkillLevel;
/// use teamforge_solver::model::{BalanceModelBuilder, ObjectiveWeights};
///
/// let levels = [1, 2, 3, 4, 1, 2].map(|v| SkillLevel::new(v).unwrap());
/// let model = BalanceModelBuilder::new(vec![3, 3])
///     .participants(levels)
///     .weights(ObjectiveWeights::new(1000, 1, 0.2))
///     .build()
///     .unwrap();
///
/// assert_eq!(model.group_count(), 2);
/// assert_eq!(model.target_sum(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct BalanceModelBuilder {
    capacities: Vec<usize>,
    levels: Vec<SkillLevel>,
    weights: ObjectiveWeights,
    level_balance: LevelBalance,
}

impl BalanceModelBuilder {
    pub fn new(capacities: Vec<usize>) -> Self {
        Self {
            capacities,
            levels: Vec::new(),
            weights: ObjectiveWeights::default(),
            level_balance: LevelBalance::default(),
        }
    }

    /// Appends one participant level.
    pub fn participant(mut self, level: SkillLevel) -> Self {
        self.levels.push(level);
        self
    }

    /// Appends participant levels in model order.
    pub fn participants(mut self, levels: impl IntoIterator<Item = SkillLevel>) -> Self {
        self.levels.extend(levels);
        self
    }

    pub fn weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn level_balance(mut self, mode: LevelBalance) -> Self {
        self.level_balance = mode;
        self
    }

    /// Validates the capacity vector and freezes the model.
    ///
    /// # Errors
    ///
    /// - [`PartitionError::NoGroups`] for an empty capacity vector.
    /// - [`PartitionError::InsufficientParticipants`] for an empty roster.
    /// - [`PartitionError::Internal`] if capacities do not sum to the roster size.
    pub fn build(self) -> Result<BalanceModel> {
        let groups = self.capacities.len();
        if groups == 0 {
            return Err(PartitionError::NoGroups);
        }
        if self.levels.is_empty() {
            return Err(PartitionError::InsufficientParticipants {
                found: 0,
                required: groups,
            });
        }
        let seats: usize = self.capacities.iter().sum();
        if seats != self.levels.len() {
            return Err(PartitionError::Internal(format!(
                "capacities sum to {seats} for {} participants",
                self.levels.len()
            )));
        }

        let level_totals = LevelCounts::of_levels(self.levels.iter().copied());
        let bounds = LevelBounds::new(&level_totals, groups);
        let target_sum = level_totals.skill_sum() / groups as i64;

        Ok(BalanceModel {
            levels: self.levels,
            capacities: self.capacities,
            level_totals,
            bounds,
            level_balance: self.level_balance,
            weights: self.weights,
            target_sum,
        })
    }
}
