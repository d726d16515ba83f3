//! Pairwise swap refinement under per-level bounds.
//!
//! A swap exchanges one participant of group `a` with one of group `b`.
//! Swaps preserve group sizes, so the capacity invariant survives any
//! number of them. Only participants of different levels are swapped; an
//! equal-level swap changes no sum and no count.

use teamforge_config::LocalSwapConfig;
use teamforge_core::{spread_of, Group, LevelBounds, LevelCounts, SkillLevel};
use tracing::{debug, trace};

/// Counters of one refinement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineStats {
    /// Scans performed by the improvement loop.
    pub passes: usize,
    /// Swaps applied by the improvement loop.
    pub swaps: usize,
    /// Swaps applied while repairing bound violations.
    pub repair_swaps: usize,
    pub initial_spread: i64,
    pub final_spread: i64,
    /// Whether every level count ended inside its bounds.
    pub balanced: bool,
}

/// Hill-climbing refiner over cross-group swaps.
///
/// # Example
///
/// ```
/// use teamforge_core::{Group, Participant, SkillLevel};
/// use teamforge_solver::partitioner::SwapRefiner;
///
/// let p = |name: &str, v: u8| Participant::new(name, SkillLevel::new(v).unwrap(), "");
/// let mut groups = vec![
///     Group::new(vec![p("a", 1), p("b", 2)]),
///     Group::new(vec![p("c", 3), p("d", 4)]),
/// ];
///
/// let stats = SwapRefiner::new(100).refine(&mut groups);
/// assert_eq!(stats.final_spread, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRefiner {
    max_passes: usize,
}

impl Default for SwapRefiner {
    fn default() -> Self {
        Self::from_config(&LocalSwapConfig::default())
    }
}

/// A candidate exchange of `groups[a][i]` and `groups[b][j]`.
#[derive(Debug, Clone, Copy)]
struct Swap {
    a: usize,
    i: usize,
    b: usize,
    j: usize,
}

/// Per-group running totals kept in sync with the members.
struct Tally {
    counts: Vec<LevelCounts>,
    sums: Vec<i64>,
}

impl Tally {
    fn of(groups: &[Group]) -> Self {
        Self {
            counts: groups.iter().map(Group::level_counts).collect(),
            sums: groups.iter().map(Group::skill_sum).collect(),
        }
    }

    fn spread(&self) -> i64 {
        spread_of(&self.sums)
    }

    fn violation(&self, bounds: &LevelBounds) -> usize {
        self.counts.iter().map(|c| bounds.group_violation(c)).sum()
    }

    /// Spread after moving `from` out of `a` and `to` out of `b`.
    fn spread_after(&self, a: usize, b: usize, from: SkillLevel, to: SkillLevel) -> i64 {
        let delta = i64::from(to.value()) - i64::from(from.value());
        let mut max = i64::MIN;
        let mut min = i64::MAX;
        for (g, &sum) in self.sums.iter().enumerate() {
            let sum = if g == a {
                sum + delta
            } else if g == b {
                sum - delta
            } else {
                sum
            };
            max = max.max(sum);
            min = min.min(sum);
        }
        max - min
    }

    /// Change in total bound violation if `x` (level of `a`) and `y` (level of `b`) trade places.
    fn violation_delta(
        &self,
        bounds: &LevelBounds,
        a: usize,
        b: usize,
        x: SkillLevel,
        y: SkillLevel,
    ) -> i64 {
        let cell = |g: usize, level: SkillLevel, diff: isize| {
            let before = self.counts[g][level];
            let after = before.saturating_add_signed(diff);
            bounds.violation(level, after) as i64 - bounds.violation(level, before) as i64
        };
        cell(a, x, -1) + cell(a, y, 1) + cell(b, y, -1) + cell(b, x, 1)
    }

    /// True if the four affected counts stay within bounds.
    fn keeps_bounds(
        &self,
        bounds: &LevelBounds,
        a: usize,
        b: usize,
        x: SkillLevel,
        y: SkillLevel,
    ) -> bool {
        bounds.contains(x, self.counts[a][x] - 1)
            && bounds.contains(y, self.counts[a][y] + 1)
            && bounds.contains(y, self.counts[b][y] - 1)
            && bounds.contains(x, self.counts[b][x] + 1)
    }

    fn apply(&mut self, groups: &mut [Group], swap: Swap) {
        let x = groups[swap.a].members()[swap.i].level();
        let y = groups[swap.b].members()[swap.j].level();
        let delta = i64::from(y.value()) - i64::from(x.value());

        self.counts[swap.a][x] -= 1;
        self.counts[swap.a][y] += 1;
        self.counts[swap.b][y] -= 1;
        self.counts[swap.b][x] += 1;
        self.sums[swap.a] += delta;
        self.sums[swap.b] -= delta;

        let (low, high) = groups.split_at_mut(swap.b);
        std::mem::swap(
            &mut low[swap.a].members_mut()[swap.i],
            &mut high[0].members_mut()[swap.j],
        );
    }
}

impl SwapRefiner {
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    pub fn from_config(config: &LocalSwapConfig) -> Self {
        Self::new(config.max_passes)
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Repairs level bounds, then lowers the spread.
    pub fn refine(&self, groups: &mut [Group]) -> RefineStats {
        if groups.is_empty() {
            return RefineStats {
                balanced: true,
                ..RefineStats::default()
            };
        }
        let totals = LevelCounts::of(groups.iter().flat_map(Group::iter));
        let bounds = LevelBounds::new(&totals, groups.len());
        let mut tally = Tally::of(groups);

        let initial_spread = tally.spread();
        let repair_swaps = self.repair(groups, &bounds, &mut tally);
        let balanced = tally.violation(&bounds) == 0;
        let (passes, swaps) = if balanced {
            self.improve(groups, &bounds, &mut tally)
        } else {
            (0, 0)
        };

        let stats = RefineStats {
            passes,
            swaps,
            repair_swaps,
            initial_spread,
            final_spread: tally.spread(),
            balanced,
        };
        debug!(
            event = "refine_end",
            passes = stats.passes,
            swaps = stats.swaps,
            repair_swaps = stats.repair_swaps,
            initial_spread = stats.initial_spread,
            final_spread = stats.final_spread,
            balanced = stats.balanced,
        );
        stats
    }

    /// Applies violation-reducing swaps until none is left; returns the swap count.
    fn repair(&self, groups: &mut [Group], bounds: &LevelBounds, tally: &mut Tally) -> usize {
        let mut applied = 0;
        while tally.violation(bounds) > 0 {
            let found = find_swap(groups, |a, b, x, y| {
                tally.violation_delta(bounds, a, b, x, y) < 0
            });
            match found {
                Some(swap) => {
                    tally.apply(groups, swap);
                    applied += 1;
                }
                None => break,
            }
        }
        applied
    }

    /// First-improvement hill climbing on the spread; returns `(passes, swaps)`.
    fn improve(
        &self,
        groups: &mut [Group],
        bounds: &LevelBounds,
        tally: &mut Tally,
    ) -> (usize, usize) {
        let mut passes = 0;
        let mut swaps = 0;
        while passes < self.max_passes {
            passes += 1;
            let spread = tally.spread();
            if spread == 0 {
                break;
            }
            let found = find_swap(groups, |a, b, x, y| {
                tally.keeps_bounds(bounds, a, b, x, y) && tally.spread_after(a, b, x, y) < spread
            });
            match found {
                Some(swap) => {
                    tally.apply(groups, swap);
                    swaps += 1;
                    trace!(event = "swap", spread = tally.spread());
                }
                None => break,
            }
        }
        (passes, swaps)
    }
}

/// Scans group pairs `a < b`, then member pairs of different levels, and
/// returns the first swap accepted by `accept(a, b, level_in_a, level_in_b)`.
fn find_swap(
    groups: &[Group],
    mut accept: impl FnMut(usize, usize, SkillLevel, SkillLevel) -> bool,
) -> Option<Swap> {
    for a in 0..groups.len() {
        for b in (a + 1)..groups.len() {
            for (i, p) in groups[a].iter().enumerate() {
                for (j, q) in groups[b].iter().enumerate() {
                    let (x, y) = (p.level(), q.level());
                    if x != y && accept(a, b, x, y) {
                        return Some(Swap { a, i, b, j });
                    }
                }
            }
        }
    }
    None
}
