//! Level buckets: per-level counts and the even-share bounds derived from them.

use std::ops::{Index, IndexMut};

use crate::participant::{Participant, SkillLevel};

/// Number of participants at each skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LevelCounts([usize; SkillLevel::COUNT]);

impl LevelCounts {
    pub const fn new(counts: [usize; SkillLevel::COUNT]) -> Self {
        LevelCounts(counts)
    }

    /// Counts the levels of the given participants.
    pub fn of<'a>(participants: impl IntoIterator<Item = &'a Participant>) -> Self {
        let mut counts = LevelCounts::default();
        for p in participants {
            counts[p.level()] += 1;
        }
        counts
    }

    /// Counts a plain sequence of levels.
    pub fn of_levels(levels: impl IntoIterator<Item = SkillLevel>) -> Self {
        let mut counts = LevelCounts::default();
        for level in levels {
            counts[level] += 1;
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Sum of level values, i.e. the skill sum of the counted participants.
    pub fn skill_sum(&self) -> i64 {
        SkillLevel::ALL
            .iter()
            .map(|&level| i64::from(level.value()) * self[level] as i64)
            .sum()
    }

    /// Iterates `(level, count)` pairs, strongest first, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (SkillLevel, usize)> + '_ {
        SkillLevel::ALL.iter().map(move |&level| (level, self[level]))
    }

    /// Levels with at least one participant, strongest first.
    pub fn present_levels(&self) -> impl Iterator<Item = SkillLevel> + '_ {
        self.iter().filter(|&(_, n)| n > 0).map(|(level, _)| level)
    }

    pub fn as_array(&self) -> [usize; SkillLevel::COUNT] {
        self.0
    }
}

impl Index<SkillLevel> for LevelCounts {
    type Output = usize;

    #[inline]
    fn index(&self, level: SkillLevel) -> &usize {
        &self.0[level.index()]
    }
}

impl IndexMut<SkillLevel> for LevelCounts {
    #[inline]
    fn index_mut(&mut self, level: SkillLevel) -> &mut usize {
        &mut self.0[level.index()]
    }
}

/// Per-group count range for each level: `floor(n / groups) ..= ceil(n / groups)`.
///
/// # Examples
///
/// ```
/// use teamforge_core::{LevelBounds, LevelCounts, SkillLevel};
///
/// let totals = LevelCounts::new([5, 0, 0, 10]);
/// let bounds = LevelBounds::new(&totals, 3);
/// assert_eq!(bounds.range(SkillLevel::STRONGEST), (1, 2));
/// assert_eq!(bounds.range(SkillLevel::WEAKEST), (3, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBounds {
    min: [usize; SkillLevel::COUNT],
    max: [usize; SkillLevel::COUNT],
}

impl LevelBounds {
    pub fn new(totals: &LevelCounts, groups: usize) -> Self {
        debug_assert!(groups > 0);
        let mut min = [0; SkillLevel::COUNT];
        let mut max = [0; SkillLevel::COUNT];
        for (level, n) in totals.iter() {
            min[level.index()] = n / groups;
            max[level.index()] = n.div_ceil(groups);
        }
        LevelBounds { min, max }
    }

    #[inline]
    pub fn range(&self, level: SkillLevel) -> (usize, usize) {
        (self.min[level.index()], self.max[level.index()])
    }

    #[inline]
    pub fn contains(&self, level: SkillLevel, count: usize) -> bool {
        let (lo, hi) = self.range(level);
        count >= lo && count <= hi
    }

    /// Distance of `count` from the allowed range (0 when inside).
    #[inline]
    pub fn violation(&self, level: SkillLevel, count: usize) -> usize {
        let (lo, hi) = self.range(level);
        lo.saturating_sub(count) + count.saturating_sub(hi)
    }

    /// Total violation of one group's counts across all levels.
    pub fn group_violation(&self, counts: &LevelCounts) -> usize {
        counts
            .iter()
            .map(|(level, n)| self.violation(level, n))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(v: u8) -> SkillLevel {
        SkillLevel::new(v).unwrap()
    }

    #[test]
    fn test_counts_of_participants() {
        let roster = [
            Participant::new("a", level(1), ""),
            Participant::new("b", level(1), ""),
            Participant::new("c", level(4), ""),
        ];
        let counts = LevelCounts::of(&roster);
        assert_eq!(counts.as_array(), [2, 0, 0, 1]);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.skill_sum(), 6);
        assert_eq!(
            counts.present_levels().collect::<Vec<_>>(),
            vec![level(1), level(4)]
        );
    }

    #[test]
    fn test_bounds_exact_division() {
        let bounds = LevelBounds::new(&LevelCounts::new([3, 6, 0, 9]), 3);
        assert_eq!(bounds.range(level(1)), (1, 1));
        assert_eq!(bounds.range(level(2)), (2, 2));
        assert_eq!(bounds.range(level(3)), (0, 0));
        assert_eq!(bounds.range(level(4)), (3, 3));
    }

    #[test]
    fn test_violation() {
        let bounds = LevelBounds::new(&LevelCounts::new([4, 4, 4, 4]), 3);
        assert!(bounds.contains(level(2), 1));
        assert!(bounds.contains(level(2), 2));
        assert_eq!(bounds.violation(level(2), 0), 1);
        assert_eq!(bounds.violation(level(2), 4), 2);
        assert_eq!(
            bounds.group_violation(&LevelCounts::new([0, 3, 1, 1])),
            2
        );
    }
}
