//! Partition results.

use crate::capacity::matches_capacities;
use crate::error::{PartitionError, Result};
use crate::level::{LevelBounds, LevelCounts};
use crate::participant::{Participant, SkillLevel};

/// One group of a partition. Identified only by its index in the result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    members: Vec<Participant>,
}

impl Group {
    pub fn new(members: Vec<Participant>) -> Self {
        Group { members }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Group {
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, participant: Participant) {
        self.members.push(participant);
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut Vec<Participant> {
        &mut self.members
    }

    pub fn into_members(self) -> Vec<Participant> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.members.iter()
    }

    /// Sum of member levels. Higher means weaker.
    pub fn skill_sum(&self) -> i64 {
        self.members
            .iter()
            .map(|p| i64::from(p.level().value()))
            .sum()
    }

    /// Mean member level, or `None` for an empty group.
    pub fn average_level(&self) -> Option<f64> {
        if self.members.is_empty() {
            None
        } else {
            Some(self.skill_sum() as f64 / self.members.len() as f64)
        }
    }

    pub fn level_counts(&self) -> LevelCounts {
        LevelCounts::of(&self.members)
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// The groups produced by one partitioning call.
///
/// # Examples
///
/// ```
/// use teamforge_core::{Group, Partition, Participant, SkillLevel};
///
/// let p = |name: &str, level: u8| Participant::new(name, SkillLevel::new(level).unwrap(), "");
/// let partition = Partition::new(vec![
///     Group::new(vec![p("a", 1), p("b", 4)]),
///     Group::new(vec![p("c", 2), p("d", 2)]),
/// ]);
///
/// assert_eq!(partition.skill_sums(), vec![5, 4]);
/// assert_eq!(partition.spread(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    groups: Vec<Group>,
}

impl Partition {
    pub fn new(groups: Vec<Group>) -> Self {
        Partition { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [Group] {
        &mut self.groups
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn participant_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Group::len).collect()
    }

    pub fn skill_sums(&self) -> Vec<i64> {
        self.groups.iter().map(Group::skill_sum).collect()
    }

    /// `max(skill_sum) - min(skill_sum)` across groups.
    pub fn spread(&self) -> i64 {
        spread_of(&self.skill_sums())
    }

    /// Largest difference in the count of `level` between two groups.
    pub fn level_spread(&self, level: SkillLevel) -> usize {
        let counts: Vec<usize> = self.groups.iter().map(|g| g.level_counts()[level]).collect();
        let max = counts.iter().max().copied().unwrap_or(0);
        let min = counts.iter().min().copied().unwrap_or(0);
        max - min
    }

    /// Level counts of the whole roster.
    pub fn level_totals(&self) -> LevelCounts {
        LevelCounts::of(self.groups.iter().flat_map(Group::iter))
    }

    /// Returns true if every group's level counts lie within their even-share bounds.
    pub fn is_level_balanced(&self) -> bool {
        if self.groups.is_empty() {
            return true;
        }
        let bounds = LevelBounds::new(&self.level_totals(), self.groups.len());
        self.groups
            .iter()
            .all(|g| bounds.group_violation(&g.level_counts()) == 0)
    }

    /// Checks the size invariant against the planned capacities.
    ///
    /// # Errors
    ///
    /// Returns [`PartitionError::Internal`]: an undersized or oversized group
    /// is an accounting bug, never a normal outcome.
    pub fn verify_capacities(&self, capacities: &[usize]) -> Result<()> {
        let sizes = self.sizes();
        if matches_capacities(&sizes, capacities) {
            Ok(())
        } else {
            Err(PartitionError::Internal(format!(
                "group sizes {sizes:?} do not match capacities {capacities:?}"
            )))
        }
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// `max - min` of a slice of sums, 0 for an empty slice.
pub fn spread_of(sums: &[i64]) -> i64 {
    let max = sums.iter().max().copied().unwrap_or(0);
    let min = sums.iter().min().copied().unwrap_or(0);
    max - min
}
