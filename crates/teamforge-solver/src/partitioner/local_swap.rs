//! Greedy bucket placement followed by swap refinement.

use rand::seq::SliceRandom;
use rand::Rng;
use teamforge_config::LocalSwapConfig;
use teamforge_core::{Group, Participant, Partition, Result, SkillLevel};
use tracing::debug;

use super::greedy::assign_greedy;
use super::refiner::SwapRefiner;
use super::{finish, prepare, Partitioner};

/// The non-exact engine: never runs the model solver.
///
/// Participants are placed level bucket by level bucket, strongest first,
/// then [`SwapRefiner`] repairs any level-bound violation and lowers the
/// spread.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSwapPartitioner {
    refiner: SwapRefiner,
}

impl LocalSwapPartitioner {
    pub fn new(refiner: SwapRefiner) -> Self {
        Self { refiner }
    }

    pub fn from_config(config: &LocalSwapConfig) -> Self {
        Self::new(SwapRefiner::from_config(config))
    }

    pub fn refiner(&self) -> &SwapRefiner {
        &self.refiner
    }
}

/// Bucket-by-level placement.
///
/// Each participant goes to the open group with the fewest members at its
/// level, then the fewest members overall. Strong levels then prefer the
/// group with the highest sum and weak levels the lowest, so strong and weak
/// participants pair up. Remaining ties are broken by a random draw.
pub(crate) fn place_by_level<R: Rng + ?Sized>(
    roster: &[Participant],
    capacities: &[usize],
    rng: &mut R,
) -> Vec<Group> {
    let mut buckets: [Vec<&Participant>; SkillLevel::COUNT] = Default::default();
    for participant in roster {
        buckets[participant.level().index()].push(participant);
    }

    let mut groups: Vec<Group> = capacities.iter().map(|&c| Group::with_capacity(c)).collect();
    let mut sums = vec![0i64; groups.len()];
    for bucket in &mut buckets {
        bucket.shuffle(rng);
        for &participant in bucket.iter() {
            let level = participant.level();
            let target = (0..groups.len())
                .filter(|&g| groups[g].len() < capacities[g])
                .map(|g| {
                    let at_level = groups[g].iter().filter(|p| p.level() == level).count();
                    let preference = if level.is_strong() { -sums[g] } else { sums[g] };
                    (g, (at_level, groups[g].len(), preference, rng.random::<u32>()))
                })
                .min_by_key(|(_, key)| *key)
                .map(|(g, _)| g);
            if let Some(g) = target {
                sums[g] += i64::from(level.value());
                groups[g].push(participant.clone());
            }
        }
    }
    groups
}

impl Partitioner for LocalSwapPartitioner {
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
            max_passes = self.refiner.max_passes(),
        );

        let mut groups = place_by_level(&prepared.roster, &prepared.capacities, rng);
        let stats = self.refiner.refine(&mut groups);
        if !stats.balanced {
            debug!(
                event = "placement_restart",
                "swaps could not restore level bounds; refining the greedy fill instead"
            );
            groups = assign_greedy(&prepared.roster, &prepared.capacities);
            self.refiner.refine(&mut groups);
        }
        finish(groups, &prepared.capacities, self.name(), rng)
    }

    fn name(&self) -> &'static str {
        "LocalSwap"
    }
}
