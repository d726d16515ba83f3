//! Assertions on the partition invariants.

use teamforge_core::{plan_capacities, Participant, Partition, SkillLevel};

/// Asserts that `partition` is a valid split of `roster` into `groups` groups:
/// every participant exactly once and group sizes matching the capacity plan.
pub fn assert_partition_valid(partition: &Partition, roster: &[Participant], groups: usize) {
    assert_eq!(partition.group_count(), groups, "wrong number of groups");

    let mut placed: Vec<&Participant> = partition.groups().iter().flat_map(|g| g.iter()).collect();
    let mut expected: Vec<&Participant> = roster.iter().collect();
    placed.sort_by(|a, b| a.name().cmp(b.name()));
    expected.sort_by(|a, b| a.name().cmp(b.name()));
    assert_eq!(placed, expected, "participants lost or duplicated");

    let mut sizes = partition.sizes();
    let mut planned = plan_capacities(roster.len(), groups);
    sizes.sort_unstable();
    planned.sort_unstable();
    assert_eq!(sizes, planned, "group sizes differ from the capacity plan");
}

/// Asserts that no level count differs by more than one between groups.
pub fn assert_level_balanced(partition: &Partition) {
    for level in SkillLevel::ALL {
        let spread = partition.level_spread(level);
        assert!(spread <= 1, "level {level} spread {spread} in {:?}", partition.sizes());
    }
}
