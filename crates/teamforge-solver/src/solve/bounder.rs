//! Objective bounder for branch-and-bound pruning.
//!
//! The bounder computes an optimistic (lowest possible) objective for any
//! completion of a partial assignment. If this bound cannot beat the best
//! complete assignment found so far, the branch is pruned.

use crate::model::{scaled_objective, BalanceModel};

/// Lower bound from the range of final skill sums each group can still reach.
///
/// For a group `g` whose final sum lies in `[low_g, high_g]`:
/// - spread is at least `max(low) - min(high)` (clamped at 0),
/// - deviation is at least the distance of each interval from the target sum.
///
/// The level penalty is supplied by the caller, since it depends on which
/// cells are already decided.
#[derive(Debug, Clone, Copy)]
pub struct SpreadBounder {
    scale: i64,
    spread_weight: i64,
    deviation_weight: i64,
    target: i64,
}

impl SpreadBounder {
    pub fn new(model: &BalanceModel) -> Self {
        let weights = model.weights();
        Self {
            scale: model.scale(),
            spread_weight: weights.spread,
            deviation_weight: weights.deviation,
            target: model.target_sum(),
        }
    }

    /// Objective of a complete assignment with the given group sums.
    pub fn exact(&self, sums: &[i64], level_penalty: i64) -> i64 {
        let ranges = sums.iter().map(|&s| (s, s));
        self.bound(ranges, level_penalty)
    }

    /// Optimistic objective given reachable `(low, high)` sums per group.
    pub fn lower_bound(&self, ranges: &[(i64, i64)], level_penalty_floor: i64) -> i64 {
        self.bound(ranges.iter().copied(), level_penalty_floor)
    }

    fn bound(&self, ranges: impl Iterator<Item = (i64, i64)>, level_penalty: i64) -> i64 {
        let mut max_low = i64::MIN;
        let mut min_high = i64::MAX;
        let mut deviation = 0;
        for (low, high) in ranges {
            max_low = max_low.max(low);
            min_high = min_high.min(high);
            deviation += if self.target < low {
                low - self.target
            } else if self.target > high {
                self.target - high
            } else {
                0
            };
        }
        let spread = if max_low > min_high {
            max_low - min_high
        } else {
            0
        };
        scaled_objective(
            self.scale,
            self.spread_weight.saturating_mul(spread),
            self.deviation_weight.saturating_mul(deviation),
            level_penalty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BalanceModelBuilder, ObjectiveWeights};
    use teamforge_core::SkillLevel;

    fn bounder() -> SpreadBounder {
        // 6 participants, sum 15, two groups: target 7, scale 2000
        let levels = [1, 2, 3, 4, 3, 2].map(|v| SkillLevel::new(v).unwrap());
        let model = BalanceModelBuilder::new(vec![3, 3])
            .participants(levels)
            .weights(ObjectiveWeights::new(1_000, 1, 0.1))
            .build()
            .unwrap();
        SpreadBounder::new(&model)
    }

    #[test]
    fn test_exact_matches_formula() {
        let b = bounder();
        // spread 1, deviation |7-7| + |8-7| = 1
        assert_eq!(b.exact(&[7, 8], 300), 2_000 * (1_000 + 1) + 300);
    }

    #[test]
    fn test_overlapping_ranges_bound_to_zero_spread() {
        let b = bounder();
        assert_eq!(b.lower_bound(&[(5, 9), (6, 12)], 0), 0);
    }

    #[test]
    fn test_disjoint_ranges() {
        let b = bounder();
        // max_low 10 - min_high 8 = 2; deviation: 7 in [3,8] -> 0, 7 < 10 -> 3
        assert_eq!(b.lower_bound(&[(3, 8), (10, 14)], 50), 2_000 * (2_000 + 3) + 50);
    }
}
