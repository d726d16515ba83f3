//! Participant and roster fixtures.

use rand::seq::SliceRandom;
use rand::Rng;
use teamforge_core::{Participant, SkillLevel};

/// Creates a participant with a fixed membership.
///
/// # Panics
///
/// Panics if `level` is outside `1..=4`.
pub fn participant(name: &str, level: u8) -> Participant {
    let level = SkillLevel::new(level).expect("fixture level must be 1..=4");
    Participant::new(name, level, "member")
}

/// Creates a shuffled roster with `counts[k]` participants at level `k + 1`.
///
/// Names are unique: `L{level}-{n}`. Every third participant is a guest.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use teamforge_test::roster::make_roster;
///
/// let roster = make_roster([3, 4, 4, 4], &mut StdRng::seed_from_u64(0));
/// assert_eq!(roster.len(), 15);
/// ```
pub fn make_roster<R: Rng + ?Sized>(
    counts: [usize; SkillLevel::COUNT],
    rng: &mut R,
) -> Vec<Participant> {
    let mut roster = Vec::with_capacity(counts.iter().sum());
    for (level, &count) in SkillLevel::ALL.iter().zip(&counts) {
        for n in 0..count {
            let membership = if n % 3 == 2 { "guest" } else { "member" };
            roster.push(Participant::new(
                format!("L{}-{}", level.value(), n),
                *level,
                membership,
            ));
        }
    }
    roster.shuffle(rng);
    roster
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use teamforge_core::LevelCounts;

    use super::*;

    #[test]
    fn test_roster_counts() {
        let roster = make_roster([5, 0, 0, 10], &mut StdRng::seed_from_u64(1));
        assert_eq!(LevelCounts::of(&roster).as_array(), [5, 0, 0, 10]);
    }

    #[test]
    fn test_names_unique() {
        let roster = make_roster([4, 4, 4, 4], &mut StdRng::seed_from_u64(2));
        let mut names: Vec<&str> = roster.iter().map(Participant::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 16);
    }
}
