//! The exact balancing model.
//!
//! A [`BalanceModel`] is an immutable description of the integer program
//! solved by the exact partitioner:
//!
//! - one binary decision `x[i][g]` per participant and group,
//! - every participant in exactly one group,
//! - every group filled to exactly its capacity,
//! - objective: `spread_weight * (max s_g - min s_g)`
//!   `+ deviation_weight * sum_g |s_g - floor(total / groups)|`
//!   `+ level_weight * sum_{L,g} |count_{L,g} - n_L / groups|`,
//!   where `s_g` is the group skill sum.
//!
//! With [`LevelBalance::Bounded`] the per-level counts are additionally
//! constrained to their floor/ceil share.
//!
//! All objective arithmetic is done on integers scaled by
//! `LEVEL_WEIGHT_SCALE * groups`, so the fractional per-level term and the
//! fractional level weight compare exactly.

mod builder;
mod weight;


use teamforge_config::LevelBalance;
use teamforge_core::{spread_of, LevelBounds, LevelCounts, SkillLevel};

pub use builder::BalanceModelBuilder;
pub use weight::LevelWeightPolicy;

/// Fixed-point denominator of the level weight.
pub const LEVEL_WEIGHT_SCALE: i64 = 1_000;

/// `scale * (spread_term + deviation_term) + level_penalty`, saturating at
/// `i64::MAX` so oversized weights order objectives instead of overflowing.
pub fn scaled_objective(
    scale: i64,
    spread_term: i64,
    deviation_term: i64,
    level_penalty: i64,
) -> i64 {
    scale
        .saturating_mul(spread_term.saturating_add(deviation_term))
        .saturating_add(level_penalty)
}

/// Objective weights of the exact model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveWeights {
    /// Weight of the skill sum spread; dominates the other terms.
    pub spread: i64,
    /// Weight of the summed deviation from the floor-rounded average sum.
    pub deviation: i64,
    /// Per-level deviation weight in thousandths.
    pub level_permille: i64,
}

impl ObjectiveWeights {
    pub fn new(spread: i64, deviation: i64, level_weight: f64) -> Self {
        Self {
            spread,
            deviation,
            level_permille: (level_weight * LEVEL_WEIGHT_SCALE as f64).round() as i64,
        }
    }

    /// The level weight as a fraction.
    pub fn level_weight(&self) -> f64 {
        self.level_permille as f64 / LEVEL_WEIGHT_SCALE as f64
    }
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self::new(1_000, 1, 0.10)
    }
}

/// A participant-to-group assignment: `group_of[i]` is the group of participant `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    group_of: Vec<usize>,
}

impl Assignment {
    pub fn new(group_of: Vec<usize>) -> Self {
        Self { group_of }
    }

    /// Value of the binary decision `x[participant][group]`.
    #[inline]
    pub fn is_assigned(&self, participant: usize, group: usize) -> bool {
        self.group_of.get(participant) == Some(&group)
    }

    #[inline]
    pub fn group_of(&self, participant: usize) -> usize {
        self.group_of[participant]
    }

    pub fn len(&self) -> usize {
        self.group_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group_of.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.group_of
    }
}

/// Objective value of an assignment, term by term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveBreakdown {
    /// `max(s_g) - min(s_g)`.
    pub spread: i64,
    /// `sum_g |s_g - target_sum|`.
    pub deviation: i64,
    /// `sum_{L,g} |count_{L,g} - n_L / groups|`, unweighted.
    pub level_deviation: f64,
    /// Total objective in fixed-point units.
    pub scaled: i64,
    scale: i64,
}

impl ObjectiveBreakdown {
    /// Total objective as a real number.
    pub fn value(&self) -> f64 {
        self.scaled as f64 / self.scale as f64
    }
}

/// Immutable exact balancing model.
#[derive(Debug, Clone)]
pub struct BalanceModel {
    levels: Vec<SkillLevel>,
    capacities: Vec<usize>,
    level_totals: LevelCounts,
    bounds: LevelBounds,
    level_balance: LevelBalance,
    weights: ObjectiveWeights,
    target_sum: i64,
}

impl BalanceModel {
    pub fn builder(capacities: Vec<usize>) -> BalanceModelBuilder {
        BalanceModelBuilder::new(capacities)
    }

    pub fn participant_count(&self) -> usize {
        self.levels.len()
    }

    pub fn group_count(&self) -> usize {
        self.capacities.len()
    }

    /// Participant levels in model order.
    pub fn levels(&self) -> &[SkillLevel] {
        &self.levels
    }

    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    pub fn level_totals(&self) -> &LevelCounts {
        &self.level_totals
    }

    pub fn bounds(&self) -> &LevelBounds {
        &self.bounds
    }

    pub fn level_balance(&self) -> LevelBalance {
        self.level_balance
    }

    pub fn weights(&self) -> ObjectiveWeights {
        self.weights
    }

    /// `floor(sum of all levels / groups)`.
    pub fn target_sum(&self) -> i64 {
        self.target_sum
    }

    /// Fixed-point multiplier applied to spread and deviation terms.
    pub fn scale(&self) -> i64 {
        LEVEL_WEIGHT_SCALE * self.group_count() as i64
    }

    /// Scaled level penalty of one `(level, group)` cell: `permille * |groups * count - n_L|`.
    #[inline]
    pub fn level_cell_penalty(&self, level: SkillLevel, count: usize) -> i64 {
        let groups = self.group_count() as i64;
        let total = self.level_totals[level] as i64;
        self.weights.level_permille * (groups * count as i64 - total).abs()
    }

    /// Allowed per-group count range of `level` under this model.
    pub fn cell_range(&self, level: SkillLevel) -> (usize, usize) {
        match self.level_balance {
            LevelBalance::Bounded => self.bounds.range(level),
            LevelBalance::Soft => (0, self.level_totals[level]),
        }
    }

    /// Evaluates the objective from per-group level counts.
    pub fn evaluate_counts(&self, counts: &[LevelCounts]) -> ObjectiveBreakdown {
        let groups = self.group_count() as f64;
        let sums: Vec<i64> = counts.iter().map(LevelCounts::skill_sum).collect();
        let spread = spread_of(&sums);
        let deviation: i64 = sums.iter().map(|s| (s - self.target_sum).abs()).sum();

        let mut level_deviation = 0.0;
        let mut level_scaled = 0;
        for group in counts {
            for (level, count) in group.iter() {
                let share = self.level_totals[level] as f64 / groups;
                level_deviation += (count as f64 - share).abs();
                level_scaled += self.level_cell_penalty(level, count);
            }
        }

        let scale = self.scale();
        ObjectiveBreakdown {
            spread,
            deviation,
            level_deviation,
            scaled: scaled_objective(
                scale,
                self.weights.spread.saturating_mul(spread),
                self.weights.deviation.saturating_mul(deviation),
                level_scaled,
            ),
            scale,
        }
    }

    /// Per-group level counts of an assignment.
    pub fn group_counts(&self, assignment: &Assignment) -> Vec<LevelCounts> {
        let mut counts = vec![LevelCounts::default(); self.group_count()];
        for (i, &level) in self.levels.iter().enumerate() {
            counts[assignment.group_of(i)][level] += 1;
        }
        counts
    }

    /// Evaluates the objective of a feasible assignment.
    ///
    /// Returns `None` if the assignment violates a hard constraint.
    pub fn evaluate(&self, assignment: &Assignment) -> Option<ObjectiveBreakdown> {
        if !self.is_feasible(assignment) {
            return None;
        }
        Some(self.evaluate_counts(&self.group_counts(assignment)))
    }

    /// Checks every hard constraint of the model.
    pub fn is_feasible(&self, assignment: &Assignment) -> bool {
        if assignment.len() != self.participant_count() {
            return false;
        }
        if assignment.as_slice().iter().any(|&g| g >= self.group_count()) {
            return false;
        }
        let counts = self.group_counts(assignment);
        let sizes_match = counts
            .iter()
            .zip(&self.capacities)
            .all(|(c, &cap)| c.total() == cap);
        if !sizes_match {
            return false;
        }
        match self.level_balance {
            LevelBalance::Bounded => counts
                .iter()
                .all(|c| self.bounds.group_violation(c) == 0),
            LevelBalance::Soft => true,
        }
    }

    /// Builds an assignment from per-group level counts.
    ///
    /// Participants of each level are handed out in model order: the first
    /// `counts[0][L]` go to group 0, the next `counts[1][L]` to group 1, and
    /// so on.
    pub fn assignment_from_counts(&self, counts: &[LevelCounts]) -> Assignment {
        let mut remaining: Vec<LevelCounts> = counts.to_vec();
        let mut next_group = [0usize; SkillLevel::COUNT];
        let mut group_of = Vec::with_capacity(self.participant_count());
        for &level in &self.levels {
            let cursor = &mut next_group[level.index()];
            while *cursor < remaining.len() && remaining[*cursor][level] == 0 {
                *cursor += 1;
            }
            let group = (*cursor).min(remaining.len().saturating_sub(1));
            if let Some(slot) = remaining.get_mut(group) {
                slot[level] = slot[level].saturating_sub(1);
            }
            group_of.push(group);
        }
        Assignment::new(group_of)
    }
}
