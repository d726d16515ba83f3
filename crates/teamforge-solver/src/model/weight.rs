//! Adaptive per-level weight.

use teamforge_config::LevelWeightConfig;
use teamforge_core::LevelCounts;

/// Chooses the per-level deviation weight from the day's level distribution.
///
/// The weight only breaks ties among equally balanced solutions, so it is
/// raised when the roster is full and every level is well spread, and
/// lowered when the roster is short or a level bucket is extremely skewed.
///
/// # Example
///
/// ```
/// use teamforge_config::LevelWeightConfig;
/// use teamforge_core::LevelCounts;
/// use teamforge_solver::model::LevelWeightPolicy;
///
/// let policy = LevelWeightPolicy::new(LevelWeightConfig::default());
/// assert_eq!(policy.weight_for(&LevelCounts::new([5, 4, 5, 4])), 0.20);
/// assert_eq!(policy.weight_for(&LevelCounts::new([5, 0, 0, 10])), 0.07);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LevelWeightPolicy {
    config: LevelWeightConfig,
}

impl LevelWeightPolicy {
    pub fn new(config: LevelWeightConfig) -> Self {
        Self { config }
    }

    /// Returns the weight for a roster with the given level totals.
    ///
    /// Counts of all four levels take part, so an absent level counts as skewed.
    pub fn weight_for(&self, totals: &LevelCounts) -> f64 {
        let c = &self.config;
        if let Some(fixed) = c.fixed {
            return fixed;
        }
        let total = totals.total();
        let counts = totals.as_array();

        let well_spread = counts
            .iter()
            .all(|&n| n >= c.well_spread_min && n <= c.well_spread_max);
        if total == c.full_roster_size && well_spread {
            return c.well_spread;
        }

        let skewed = counts.iter().any(|&n| n < c.skew_min || n > c.skew_max);
        if total < c.full_roster_size || skewed {
            return c.skewed;
        }
        c.standard
    }
}

impl Default for LevelWeightPolicy {
    fn default() -> Self {
        Self::new(LevelWeightConfig::default())
    }
}
