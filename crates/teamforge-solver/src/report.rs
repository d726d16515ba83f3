//! Log summary of a finished partition.

use teamforge_core::Partition;
use tracing::{debug, info};

/// Logs one line per group with its average, total and size, and one debug
/// line per member.
pub fn log_partition(partition: &Partition) {
    info!(
        event = "partition_end",
        groups = partition.group_count(),
        participants = partition.participant_count(),
        spread = partition.spread(),
    );
    for (index, group) in partition.groups().iter().enumerate() {
        let number = index + 1;
        match group.average_level() {
            Some(average) => info!(
                event = "group_summary",
                group = number,
                average = (average * 100.0).round() / 100.0,
                total = group.skill_sum(),
                players = group.len(),
            ),
            None => info!(event = "group_summary", group = number, players = 0),
        }
        for member in group {
            debug!(
                event = "group_member",
                group = number,
                name = member.name(),
                level = member.level().value(),
                membership = member.membership(),
            );
        }
    }
}
