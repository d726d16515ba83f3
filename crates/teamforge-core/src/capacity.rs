//! Capacity planning: the most even group sizes for a roster.

use crate::error::{PartitionError, Result};

/// Computes the capacity vector for `total` participants in `groups` groups.
///
/// The first `total % groups` entries receive one extra seat. The result is
/// deterministic; callers that want to avoid a bias toward low indices
/// shuffle it.
///
/// # Examples
///
/// ```
/// use teamforge_core::plan_capacities;
///
/// assert_eq!(plan_capacities(17, 3), vec![6, 6, 5]);
/// assert_eq!(plan_capacities(15, 3), vec![5, 5, 5]);
/// ```
///
/// # Panics
///
/// Panics if `groups` is zero. Use [`checked_capacities`] for untrusted input.
pub fn plan_capacities(total: usize, groups: usize) -> Vec<usize> {
    assert!(groups > 0, "capacity planning requires at least one group");
    let base = total / groups;
    let extras = total % groups;
    (0..groups)
        .map(|i| if i < extras { base + 1 } else { base })
        .collect()
}

/// Validating variant of [`plan_capacities`].
///
/// Rejects zero groups, an empty roster, and rosters smaller than the group
/// count (which would leave a group empty).
pub fn checked_capacities(total: usize, groups: usize) -> Result<Vec<usize>> {
    if groups == 0 {
        return Err(PartitionError::NoGroups);
    }
    if total == 0 || total < groups {
        return Err(PartitionError::InsufficientParticipants {
            found: total,
            required: groups.max(1),
        });
    }
    Ok(plan_capacities(total, groups))
}

/// Returns true if `sizes` is a permutation of `capacities`.
pub fn matches_capacities(sizes: &[usize], capacities: &[usize]) -> bool {
    if sizes.len() != capacities.len() {
        return false;
    }
    let mut a = sizes.to_vec();
    let mut b = capacities.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        assert_eq!(plan_capacities(18, 3), vec![6, 6, 6]);
    }

    #[test]
    fn test_extras_go_first() {
        assert_eq!(plan_capacities(16, 3), vec![6, 5, 5]);
        assert_eq!(plan_capacities(10, 4), vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_sum_and_spread() {
        for total in 1..40 {
            for groups in 1..=total.min(7) {
                let caps = plan_capacities(total, groups);
                assert_eq!(caps.len(), groups);
                assert_eq!(caps.iter().sum::<usize>(), total);
                let max = caps.iter().max().copied().unwrap_or(0);
                let min = caps.iter().min().copied().unwrap_or(0);
                assert!(max - min <= 1, "total={total} groups={groups}");
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(plan_capacities(17, 3), plan_capacities(17, 3));
    }

    #[test]
    fn test_checked_rejects_degenerate() {
        assert_eq!(checked_capacities(5, 0), Err(PartitionError::NoGroups));
        assert_eq!(
            checked_capacities(0, 3),
            Err(PartitionError::InsufficientParticipants {
                found: 0,
                required: 3
            })
        );
        assert_eq!(
            checked_capacities(2, 3),
            Err(PartitionError::InsufficientParticipants {
                found: 2,
                required: 3
            })
        );
        assert_eq!(checked_capacities(3, 3), Ok(vec![1, 1, 1]));
    }

    #[test]
    fn test_matches_capacities_ignores_order() {
        assert!(matches_capacities(&[5, 6, 6], &[6, 6, 5]));
        assert!(!matches_capacities(&[5, 5, 7], &[6, 6, 5]));
        assert!(!matches_capacities(&[6, 6], &[6, 6, 5]));
    }
}
