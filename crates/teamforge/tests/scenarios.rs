//! End-to-end behaviour of every engine on the reference rosters.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use teamforge::prelude::*;
use teamforge::{plan_capacities, LevelBounds, LevelCounts};
use teamforge_test::assertions::{assert_level_balanced, assert_partition_valid};
use teamforge_test::roster::make_roster;

const ENGINES: [EngineKind; 3] = [EngineKind::Exact, EngineKind::LocalSwap, EngineKind::Greedy];

fn forge(kind: EngineKind) -> TeamForge {
    TeamForge::new(EngineConfig::default().with_engine(kind).with_min_participants(15))
}

/// Smallest spread over every level-balanced split with planned sizes.
fn best_balanced_spread(counts: [usize; 4], groups: usize) -> i64 {
    let totals = LevelCounts::new(counts);
    let bounds = LevelBounds::new(&totals, groups);
    let mut planned = plan_capacities(totals.total(), groups);
    planned.sort_unstable();

    let mut best = i64::MAX;
    let mut cells = vec![LevelCounts::default(); groups];
    search(&totals, &bounds, 0, 0, totals[SkillLevel::ALL[0]], &mut cells, &planned, &mut best);
    best
}

#[allow(clippy::too_many_arguments)]
fn search(
    totals: &LevelCounts,
    bounds: &LevelBounds,
    k: usize,
    g: usize,
    left: usize,
    cells: &mut Vec<LevelCounts>,
    planned: &[usize],
    best: &mut i64,
) {
    let groups = cells.len();
    if k == SkillLevel::COUNT {
        let mut sizes: Vec<usize> = cells.iter().map(LevelCounts::total).collect();
        sizes.sort_unstable();
        if sizes == planned {
            let sums = cells.iter().map(LevelCounts::skill_sum);
            let spread = sums.clone().max().unwrap_or(0) - sums.min().unwrap_or(0);
            *best = (*best).min(spread);
        }
        return;
    }
    let level = SkillLevel::ALL[k];
    let (lo, hi) = bounds.range(level);
    if g + 1 == groups {
        if left >= lo && left <= hi {
            cells[g][level] = left;
            let next = SkillLevel::ALL.get(k + 1).map_or(0, |&l| totals[l]);
            search(totals, bounds, k + 1, 0, next, cells, planned, best);
            cells[g][level] = 0;
        }
        return;
    }
    for c in lo..=hi.min(left) {
        cells[g][level] = c;
        search(totals, bounds, k, g + 1, left - c, cells, planned, best);
        cells[g][level] = 0;
    }
}

#[test]
fn scenario_one_fifteen_players() {
    for kind in ENGINES {
        let mut rng = ChaCha8Rng::seed_from_u64(101);
        let roster = make_roster([3, 4, 4, 4], &mut rng);
        let partition = forge(kind).partition_with_rng(&roster, 3, &mut rng).unwrap();

        assert_partition_valid(&partition, &roster, 3);
        assert_eq!(partition.sizes(), vec![5, 5, 5]);
        assert_level_balanced(&partition);
    }
}

#[test]
fn scenario_two_eighteen_players() {
    for kind in ENGINES {
        let mut rng = ChaCha8Rng::seed_from_u64(202);
        let roster = make_roster([5, 4, 5, 4], &mut rng);
        let partition = forge(kind).partition_with_rng(&roster, 3, &mut rng).unwrap();

        assert_partition_valid(&partition, &roster, 3);
        assert_eq!(partition.sizes(), vec![6, 6, 6]);
        assert_level_balanced(&partition);
        if kind != EngineKind::Greedy {
            assert!(partition.spread() <= 3, "{kind:?} spread {}", partition.spread());
        }
    }
}

#[test]
fn scenario_three_extreme_skew() {
    for kind in ENGINES {
        let mut rng = ChaCha8Rng::seed_from_u64(303);
        let roster = make_roster([5, 0, 0, 10], &mut rng);
        let partition = forge(kind).partition_with_rng(&roster, 3, &mut rng).unwrap();

        assert_partition_valid(&partition, &roster, 3);
        assert_eq!(partition.sizes(), vec![5, 5, 5]);
        for group in &partition {
            let counts = group.level_counts();
            assert!((1..=2).contains(&counts[SkillLevel::STRONGEST]), "{kind:?}");
            assert!((3..=4).contains(&counts[SkillLevel::WEAKEST]), "{kind:?}");
        }
    }
}

#[test]
fn scenario_four_below_minimum() {
    for kind in ENGINES {
        let mut rng = ChaCha8Rng::seed_from_u64(404);
        let roster = make_roster([3, 4, 4, 3], &mut rng);
        let result = forge(kind).partition_with_rng(&roster, 3, &mut rng);
        assert_eq!(
            result,
            Err(PartitionError::InsufficientParticipants {
                found: 14,
                required: 15
            })
        );
    }
}

#[test]
fn exact_spread_is_minimal_among_balanced_splits() {
    let rosters = [[3, 4, 4, 4], [5, 4, 5, 4], [2, 5, 5, 6], [4, 4, 4, 5], [1, 6, 1, 8]];
    for counts in rosters {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let roster = make_roster(counts, &mut rng);
        let partition = forge(EngineKind::Exact)
            .partition_with_rng(&roster, 3, &mut rng)
            .unwrap();

        assert_level_balanced(&partition);
        assert_eq!(
            partition.spread(),
            best_balanced_spread(counts, 3),
            "levels {counts:?}"
        );
    }
}

#[test]
fn soft_mode_spread_never_worse_than_bounded() {
    for counts in [[5, 0, 0, 10], [2, 5, 5, 6], [1, 1, 7, 8]] {
        let roster = make_roster(counts, &mut ChaCha8Rng::seed_from_u64(3));
        let soft = TeamForge::new(EngineConfig::default().with_level_balance(LevelBalance::Soft))
            .partition_with_rng(&roster, 3, &mut ChaCha8Rng::seed_from_u64(4))
            .unwrap();
        let bounded = TeamForge::new(EngineConfig::default())
            .partition_with_rng(&roster, 3, &mut ChaCha8Rng::seed_from_u64(4))
            .unwrap();

        assert_partition_valid(&soft, &roster, 3);
        assert!(soft.spread() <= bounded.spread(), "levels {counts:?}");
    }
}

#[test]
fn malformed_records_are_rejected_before_partitioning() {
    let err = Participant::from_record("ghost", None, Some("member".to_string())).unwrap_err();
    assert!(matches!(
        err,
        PartitionError::MalformedParticipant { ref name, .. } if name == "ghost"
    ));

    let err = Participant::from_record("giant", Some(7), None).unwrap_err();
    assert!(matches!(err, PartitionError::MalformedParticipant { .. }));
}

#[test]
fn capacity_plan_is_deterministic() {
    for total in 1..=30 {
        for groups in 1..=total.min(6) {
            let plan = plan_capacities(total, groups);
            assert_eq!(plan, plan_capacities(total, groups));
            assert_eq!(plan.iter().sum::<usize>(), total);
            let max = plan.iter().max().unwrap();
            let min = plan.iter().min().unwrap();
            assert!(max - min <= 1);
        }
    }
}
