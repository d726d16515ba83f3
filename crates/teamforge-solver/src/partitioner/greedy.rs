//! Greedy fill used as the always-valid fallback.

use std::cmp::Reverse;

use rand::Rng;
use teamforge_core::{Group, Participant, Partition, Result};
use tracing::debug;

use super::{finish, prepare, Partitioner};

/// Assigns participants strongest first, each to the emptiest open group.
///
/// Among groups below capacity the one with the fewest members wins; ties
/// prefer the larger capacity, then the lower index. Groups are therefore
/// visited in a fixed cyclic order, so every group ends exactly at its
/// capacity and every level lands within its floor/ceil share.
///
/// The sort is stable: participants of one level keep their input order.
///
/// # Example
///
/// ```
/// use teamforge_core::{Participant, SkillLevel};
/// use teamforge_solver::partitioner::assign_greedy;
///
/// let roster: Vec<Participant> = [4, 1, 3, 2, 1]
///     .iter()
///     .enumerate()
///     .map(|(i, &v)| Participant::new(format!("p{i}"), SkillLevel::new(v).unwrap(), ""))
///     .collect();
///
/// let groups = assign_greedy(&roster, &[3, 2]);
/// assert_eq!(groups[0].len(), 3);
/// assert_eq!(groups[1].len(), 2);
/// ```
pub fn assign_greedy(roster: &[Participant], capacities: &[usize]) -> Vec<Group> {
    let mut order: Vec<&Participant> = roster.iter().collect();
    order.sort_by_key(|p| p.level());

    let mut groups: Vec<Group> = capacities.iter().map(|&c| Group::with_capacity(c)).collect();
    for participant in order {
        let target = groups
            .iter()
            .enumerate()
            .filter(|(g, group)| group.len() < capacities[*g])
            .min_by_key(|(g, group)| (group.len(), Reverse(capacities[*g]), *g))
            .map(|(g, _)| g);
        match target {
            Some(g) => groups[g].push(participant.clone()),
            // Capacities sum to the roster size, so an open group always
            // exists; the size check in `finish` reports the bug otherwise.
            None => break,
        }
    }
    groups
}

/// The fallback engine on its own: greedy fill without optimization.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPartitioner;

impl GreedyPartitioner {
    pub fn new() -> Self {
        Self
    }
}

impl Partitioner for GreedyPartitioner {
    fn partition<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        group_count: usize,
        rng: &mut R,
    ) -> Result<Partition> {
        let prepared = prepare(participants, group_count, rng)?;
        debug!(
            event = "engine_start",
            engine = self.name(),
            participants = prepared.roster.len(),
            groups = group_count,
        );
        let groups = assign_greedy(&prepared.roster, &prepared.capacities);
        finish(groups, &prepared.capacities, self.name(), rng)
    }

    fn name(&self) -> &'static str {
        "Greedy"
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use teamforge_core::{PartitionError, SkillLevel};
    use teamforge_test::roster::{make_roster, participant};

    use super::*;

    #[test]
    fn test_fills_every_capacity() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let roster = make_roster([3, 4, 4, 6], &mut rng);
        let groups = assign_greedy(&roster, &[6, 6, 5]);
        let sizes: Vec<usize> = groups.iter().map(Group::len).collect();
        assert_eq!(sizes, vec![6, 6, 5]);
    }

    #[test]
    fn test_strongest_spread_first() {
        let roster = vec![
            participant("a", 4),
            participant("b", 1),
            participant("c", 1),
            participant("d", 1),
            participant("e", 4),
            participant("f", 4),
        ];
        let groups = assign_greedy(&roster, &[2, 2, 2]);
        for group in &groups {
            let levels: Vec<u8> = group.iter().map(|p| p.level().value()).collect();
            assert_eq!(levels, vec![1, 4]);
        }
    }

    #[test]
    fn test_larger_capacity_wins_ties() {
        let roster = vec![participant("a", 1), participant("b", 2), participant("c", 3)];
        let groups = assign_greedy(&roster, &[1, 2]);
        assert_eq!(groups[1].members()[0].name(), "a");
        assert_eq!(groups[0].members()[0].name(), "b");
        assert_eq!(groups[1].members()[1].name(), "c");
    }

    #[test]
    fn test_levels_within_share() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for counts in [[5, 0, 0, 10], [2, 5, 5, 6], [1, 1, 7, 8], [4, 5, 4, 4]] {
            let roster = make_roster(counts, &mut rng);
            let partition = GreedyPartitioner::new()
                .partition(&roster, 3, &mut rng)
                .unwrap();
            assert!(partition.is_level_balanced(), "counts {counts:?}");
            for level in SkillLevel::ALL {
                assert!(partition.level_spread(level) <= 1);
            }
        }
    }

    #[test]
    fn test_rejects_short_roster() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let roster = vec![participant("a", 1), participant("b", 2)];
        let err = GreedyPartitioner::new()
            .partition(&roster, 3, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            PartitionError::InsufficientParticipants {
                found: 2,
                required: 3
            }
        );
    }
}
