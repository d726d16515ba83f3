//! The free `partition` function runs on built-in defaults.
//!
//! Kept in its own test binary: it changes the working directory.

use std::fs;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use teamforge_test::roster::make_roster;

#[test]
fn partition_ignores_config_in_working_directory() {
    let dir = std::env::temp_dir().join(format!("teamforge-cwd-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("teamforge.toml"), "min_participants = 100\n").unwrap();
    std::env::set_current_dir(&dir).unwrap();

    let roster = make_roster([3, 4, 4, 4], &mut ChaCha8Rng::seed_from_u64(12));
    let partition = teamforge::partition(&roster, 3).unwrap();
    assert_eq!(partition.sizes(), vec![5, 5, 5]);

    fs::write(dir.join("teamforge.toml"), "engine = \"bogus\"\n").unwrap();
    let partition = teamforge::partition(&roster, 3).unwrap();
    assert_eq!(partition.participant_count(), 15);

    fs::remove_dir_all(&dir).unwrap();
}
