//! Tests shared by all engines.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use teamforge_config::{EngineConfig, EngineKind};
use teamforge_core::{Group, PartitionError, SkillLevel};
use teamforge_test::roster::{make_roster, participant};

use super::*;

fn engines() -> Vec<Engine> {
    [EngineKind::Exact, EngineKind::LocalSwap, EngineKind::Greedy]
        .into_iter()
        .map(|kind| Engine::from_config(&EngineConfig::default().with_engine(kind)))
        .collect()
}

#[test]
fn test_engine_from_config() {
    let names: Vec<&str> = engines().iter().map(Partitioner::name).collect();
    assert_eq!(names, vec!["Exact", "LocalSwap", "Greedy"]);
    assert_eq!(Engine::default().name(), "Exact");
}

#[test]
fn test_every_engine_keeps_invariants() {
    for engine in engines() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for counts in [[3, 4, 4, 4], [5, 4, 5, 4], [4, 4, 4, 5], [1, 6, 1, 8]] {
            let roster = make_roster(counts, &mut rng);
            let partition = engine.partition(&roster, 3, &mut rng).unwrap();

            let mut seen: Vec<&str> = partition
                .groups()
                .iter()
                .flat_map(Group::iter)
                .map(|p| p.name())
                .collect();
            seen.sort_unstable();
            let mut expected: Vec<&str> = roster.iter().map(|p| p.name()).collect();
            expected.sort_unstable();
            assert_eq!(seen, expected, "{} {counts:?}", engine.name());

            let mut sizes = partition.sizes();
            sizes.sort_unstable();
            let mut planned = teamforge_core::plan_capacities(roster.len(), 3);
            planned.sort_unstable();
            assert_eq!(sizes, planned);

            for level in SkillLevel::ALL {
                assert!(partition.level_spread(level) <= 1, "{} {counts:?}", engine.name());
            }
        }
    }
}

#[test]
fn test_every_engine_rejects_bad_group_counts() {
    let roster = vec![participant("a", 1), participant("b", 2)];
    for engine in engines() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            engine.partition(&roster, 0, &mut rng),
            Err(PartitionError::NoGroups)
        );
        assert_eq!(
            engine.partition(&[], 2, &mut rng),
            Err(PartitionError::InsufficientParticipants {
                found: 0,
                required: 2
            })
        );
        assert!(matches!(
            engine.partition(&roster, 3, &mut rng),
            Err(PartitionError::InsufficientParticipants { found: 2, .. })
        ));
    }
}

#[test]
fn test_one_group_takes_everyone() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let roster = make_roster([1, 2, 1, 1], &mut rng);
    for engine in engines() {
        let partition = engine.partition(&roster, 1, &mut rng).unwrap();
        assert_eq!(partition.sizes(), vec![5]);
        assert_eq!(partition.spread(), 0);
    }
}

#[test]
fn test_prepare_keeps_roster_and_capacities() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let roster = make_roster([2, 2, 2, 1], &mut rng);
    let prepared = prepare(&roster, 2, &mut rng).unwrap();

    assert_eq!(prepared.roster.len(), roster.len());
    let mut caps = prepared.capacities.clone();
    caps.sort_unstable();
    assert_eq!(caps, vec![3, 4]);
}

#[test]
fn test_prepare_permutes_by_seed() {
    let roster = make_roster([4, 4, 4, 4], &mut ChaCha8Rng::seed_from_u64(30));
    let prepared: Vec<_> = (0..16)
        .map(|seed| prepare(&roster, 3, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap())
        .collect();

    let mut slots: Vec<Vec<usize>> = prepared.iter().map(|p| p.capacities.clone()).collect();
    slots.sort();
    slots.dedup();
    assert!(slots.len() > 1, "extra seat always lands in the same group");

    let orders: Vec<Vec<&str>> = prepared
        .iter()
        .map(|p| p.roster.iter().map(|x| x.name()).collect())
        .collect();
    assert!(orders.iter().any(|order| order != &orders[0]));

    let again = prepare(&roster, 3, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
    assert_eq!(again.capacities, prepared[0].capacities);
    assert_eq!(again.roster, prepared[0].roster);
}

#[test]
fn test_finish_rejects_wrong_sizes() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let groups = vec![
        Group::new(vec![participant("a", 1)]),
        Group::new(vec![participant("b", 2), participant("c", 3)]),
    ];
    let err = finish(groups, &[2, 2], "test", &mut rng).unwrap_err();
    assert!(matches!(err, PartitionError::Internal(_)));
}
