//! Engine configuration scenarios across generation, DOSBox retargeting,
//! and on-disk round trips.

use d3mm_config::{
    GameConfiguration, ATOMIC_EDITION_GAME_NAME, COMM_SETUP_SECTION_NAME, FX_DEVICE_ENTRY_NAME,
    REGULAR_VERSION_GAME_NAME, SETUP_VERSION_ENTRY_NAME,
};
use tempfile::TempDir;

#[test]
fn atomic_default_matches_the_published_layout() {
    let config = GameConfiguration::generate_default(ATOMIC_EDITION_GAME_NAME).unwrap();

    assert_eq!(
        config
            .entry_with_name(SETUP_VERSION_ENTRY_NAME)
            .unwrap()
            .value
            .as_str(),
        Some("1.4")
    );
    assert_eq!(
        config
            .entry_with_name(FX_DEVICE_ENTRY_NAME)
            .unwrap()
            .value
            .as_integer(),
        Some(13)
    );

    let comm = config.section_with_name(COMM_SETUP_SECTION_NAME).unwrap();
    let phone_pairs = comm
        .entries()
        .iter()
        .filter(|entry| entry.name.starts_with("PhoneName#"))
        .count();
    assert_eq!(phone_pairs, 16);

    let regular = GameConfiguration::generate_default(REGULAR_VERSION_GAME_NAME).unwrap();
    let comm = regular.section_with_name(COMM_SETUP_SECTION_NAME).unwrap();
    let phone_pairs = comm
        .entries()
        .iter()
        .filter(|entry| entry.name.starts_with("PhoneName#"))
        .count();
    assert_eq!(phone_pairs, 10);
}

#[test]
fn saved_configuration_reloads_byte_for_byte() {
    let config = GameConfiguration::generate_default(ATOMIC_EDITION_GAME_NAME).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("DUKE3D.CFG");
    config.save_to(&path).unwrap();

    let first = std::fs::read(&path).unwrap();

    let loaded = GameConfiguration::load_from(&path).unwrap();
    loaded.save_to(&path).unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second, "load + save must not perturb a single byte");
}

#[test]
fn dosbox_retarget_survives_a_disk_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("DUKE3D.CFG");

    let mut config = GameConfiguration::generate_default(ATOMIC_EDITION_GAME_NAME).unwrap();
    config.update_for_dosbox().unwrap();
    config.save_to(&path).unwrap();

    let reloaded = GameConfiguration::load_from(&path).unwrap();

    assert_eq!(
        reloaded.entry_with_name("ScreenWidth").unwrap().value.as_integer(),
        Some(800)
    );
    assert_eq!(
        reloaded.entry_with_name("MixRate").unwrap().value.as_integer(),
        Some(44000)
    );
    assert_eq!(
        reloaded.entry_with_name("Shadows").unwrap().value.as_integer(),
        Some(1)
    );
}
