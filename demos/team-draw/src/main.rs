//! Team Draw Example
//!
//! Draws three balanced teams from a generated pickup-game roster. Levels
//! run from 1 (strongest) to 4 (weakest); the engine balances the level sums
//! of the teams and spreads every level evenly.
//!
//! Usage: `team-draw [players] [teams] [seed]`. A `teamforge.toml` in the
//! working directory overrides the engine configuration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use teamforge::prelude::*;
use teamforge::ConfigError;
use tracing::warn;

const NAMES: [&str; 20] = [
    "Ana", "Bruno", "Caio", "Davi", "Edu", "Fabio", "Gui", "Heitor", "Igor", "Joao", "Kiko",
    "Leo", "Marcos", "Nando", "Otavio", "Paulo", "Rafa", "Samuel", "Tiago", "Vitor",
];

/// Builds a roster with random levels, the way a roster lookup would.
fn generate_roster(players: usize, rng: &mut StdRng) -> Vec<Participant> {
    (0..players)
        .filter_map(|i| {
            let name = match NAMES.get(i) {
                Some(name) => (*name).to_string(),
                None => format!("Player {}", i + 1),
            };
            let level = rng.random_range(1..=4);
            let membership = if rng.random_bool(0.7) { "monthly" } else { "guest" };
            Participant::from_record(name, Some(level), Some(membership.to_string())).ok()
        })
        .collect()
}

fn print_teams(partition: &Partition) {
    for (i, group) in partition.groups().iter().enumerate() {
        println!("Team {} (level sum {})", i + 1, group.skill_sum());
        for (j, member) in group.iter().enumerate() {
            println!("  {}. {} [{}]", j + 1, member.name(), member.membership());
        }
        println!();
    }
}

fn main() {
    teamforge::console::init();

    let mut args = std::env::args().skip(1);
    let players = args.next().and_then(|a| a.parse().ok()).unwrap_or(18);
    let teams = args.next().and_then(|a| a.parse().ok()).unwrap_or(3);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(2024);

    let mut config = match EngineConfig::load("teamforge.toml") {
        Ok(config) => config,
        Err(ConfigError::Io(_)) => EngineConfig::default(),
        Err(err) => {
            warn!(event = "config_ignored", error = %err, "using default configuration");
            EngineConfig::default()
        }
    };
    if config.min_participants.is_none() {
        config = config.with_min_participants(15);
    }
    let forge = TeamForge::new(config.with_random_seed(seed));

    let mut rng = StdRng::seed_from_u64(seed);
    let roster = generate_roster(players, &mut rng);

    match forge.partition(&roster, teams) {
        Ok(partition) => {
            println!("\nSpread between teams: {}\n", partition.spread());
            print_teams(&partition);
        }
        Err(err) => {
            eprintln!("Draw failed: {err}");
            std::process::exit(1);
        }
    }
}
