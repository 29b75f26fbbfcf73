//! Catalog round-trip, search, and favourites scenarios.

use crate::fixtures_dir;
use d3mm_core::{
    search_mods, FavouriteModCollection, GameVersionCollection, GroupMode, ModCollection,
    ModIdentifier, OrganizedModCollection,
};

fn load_fixture_json() -> ModCollection {
    let mut catalog = ModCollection::new();
    catalog
        .load_from(&fixtures_dir().join("duke3d_mods_sample.json"))
        .expect("fixture JSON must load");
    catalog
}

fn load_fixture_xml() -> ModCollection {
    let mut catalog = ModCollection::new();
    catalog
        .load_from(&fixtures_dir().join("duke3d_mods_sample.xml"))
        .expect("fixture XML must load");
    catalog
}

// ---------------------------------------------------------------------------
// Round trips and parity
// ---------------------------------------------------------------------------

#[test]
fn fixture_json_parses_and_validates() {
    let catalog = load_fixture_json();

    assert_eq!(catalog.len(), 2);
    assert!(catalog.is_valid());

    let dc = catalog.get_mod_with_name("Duke It Out in D.C.").unwrap();
    assert_eq!(dc.preferred_version.as_deref(), Some("v2"));
    assert_eq!(dc.versions.len(), 2);
    assert_eq!(dc.team.as_ref().unwrap().members.len(), 2);
    assert_eq!(dc.related_mods, vec!["dukecarib"]);
}

#[test]
fn json_round_trip_preserves_the_catalog() {
    let catalog = load_fixture_json();

    let mut round_tripped = ModCollection::new();
    round_tripped.parse_from_json(&catalog.to_json()).unwrap();

    assert_eq!(catalog.mods(), round_tripped.mods());
}

#[test]
fn xml_round_trip_preserves_the_catalog() {
    let catalog = load_fixture_xml();

    let mut round_tripped = ModCollection::new();
    round_tripped.parse_from_xml(&catalog.to_xml()).unwrap();

    assert_eq!(catalog.mods(), round_tripped.mods());
}

#[test]
fn json_and_xml_fixtures_are_semantically_equal() {
    let from_json = load_fixture_json();
    let from_xml = load_fixture_xml();

    assert_eq!(from_json.mods(), from_xml.mods());
}

#[test]
fn format_version_mismatch_refuses_the_whole_file() {
    let raw = std::fs::read_to_string(fixtures_dir().join("duke3d_mods_sample.json")).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["fileFormatVersion"] = serde_json::Value::String("2.0.0".to_string());

    let mut catalog = load_fixture_json();
    assert!(catalog.parse_from_json(&value).is_err());
    assert_eq!(catalog.len(), 2, "the previous contents survive a refused load");
}

#[test]
fn every_engine_reference_resolves_in_the_default_registry() {
    let catalog = load_fixture_json();
    let registry = GameVersionCollection::with_defaults();

    assert_eq!(catalog.check_game_versions(&registry), 0);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn exact_name_search_selects_the_preferred_version() {
    let catalog = load_fixture_json();

    let matches = search_mods(&catalog, "Duke It Out in D.C.");

    assert_eq!(matches.len(), 1);
    let hit = &matches[0];
    assert_eq!(hit.mod_index, 0);
    assert_eq!(hit.version_index, 1, "preferred version is v2");
    assert_eq!(hit.version_type_index, 0);
    assert_eq!(hit.full_name(), "Duke It Out in D.C. v2");
}

#[test]
fn version_qualified_search_is_exact() {
    let catalog = load_fixture_json();

    let matches = search_mods(&catalog, "duke it out in d.c. v1");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].version_index, 0);
}

#[test]
fn ambiguous_prefix_search_returns_both_mods() {
    let catalog = load_fixture_json();

    let matches = search_mods(&catalog, "Duke");
    assert_eq!(matches.len(), 2);
}

// ---------------------------------------------------------------------------
// Organized view
// ---------------------------------------------------------------------------

#[test]
fn game_version_grouping_collects_the_fixture_mods() {
    let catalog = load_fixture_json();
    let registry = GameVersionCollection::with_defaults();

    let mut view = OrganizedModCollection::new(GroupMode::GameVersion);
    view.rebuild(&catalog, &registry);

    let atomic = view
        .group_with_name("Duke Nukem 3D: Atomic Edition 1.5")
        .unwrap();
    assert_eq!(atomic.mod_indices, vec![0, 1]);
}

// ---------------------------------------------------------------------------
// Favourites pruning
// ---------------------------------------------------------------------------

#[test]
fn dropping_a_mod_orphans_its_favourite_without_pruning() {
    let mut catalog = load_fixture_json();

    let mut favourites = FavouriteModCollection::new();
    assert!(favourites.add_favourite(ModIdentifier::new("Duke It Out in D.C.")));
    assert!(favourites.add_favourite(ModIdentifier::new("Duke Caribbean")));

    assert_eq!(favourites.check_for_missing_favourites(&catalog), 0);

    catalog.remove_mod_with_id("dukecarib");

    assert_eq!(favourites.check_for_missing_favourites(&catalog), 1);
    assert_eq!(favourites.len(), 2, "the collection itself is not modified");
}
