use std::fs;
use std::path::PathBuf;

use playoff_pool_terminal::leaderboard_fetch::{parse_leaderboard_json, read_leaderboard_file};
use playoff_pool_terminal::model::EntryId;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

#[test]
fn parses_leaderboard_fixture() {
    let raw = read_fixture("leaderboard.json");
    let entries = parse_leaderboard_json(&raw).expect("fixture should parse");
    assert_eq!(entries.len(), 4);

    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);

    let gurus = &entries[0];
    assert_eq!(gurus.name, "Gridiron Gurus");
    assert_eq!(gurus.total_points, 142.5);
    assert_eq!(gurus.players_remaining, 5);
    assert_eq!(gurus.roster().len(), 5);

    let allen = &gurus.roster()[0];
    assert_eq!(allen.position, "QB");
    assert_eq!(allen.points, Some(38.4));
    assert_eq!(allen.bonus_points, Some(5.0));
    assert_eq!(allen.pass_yds, Some(312.5));
    assert!(allen.is_active);

    let henry = &gurus.roster()[1];
    assert_eq!(henry.bonus_points, None);
    assert!(henry.is_eliminated());
    assert_eq!(henry.score_sack_points, None);
}

#[test]
fn null_roster_decodes_as_missing() {
    let raw = read_fixture("leaderboard.json");
    let entries = parse_leaderboard_json(&raw).expect("fixture should parse");
    let fourth = entries
        .iter()
        .find(|e| e.id == EntryId::from("3"))
        .expect("entry 3 present");
    assert!(fourth.roster.is_none());
    assert!(fourth.roster().is_empty());
    // "n/a" is not a number.
    assert_eq!(fourth.players_remaining, 0);
}

#[test]
fn junk_roster_items_and_fields_are_tolerated() {
    let raw = read_fixture("leaderboard.json");
    let entries = parse_leaderboard_json(&raw).expect("fixture should parse");
    let grinders = &entries[3];
    assert_eq!(grinders.roster().len(), 1);
    let kicker = &grinders.roster()[0];
    assert_eq!(kicker.name, "H. Butker");
    assert_eq!(kicker.points, None);
    assert_eq!(kicker.bonus_points, Some(3.0));
    assert!(!kicker.is_active);
}

#[test]
fn non_array_roster_is_treated_as_missing() {
    let raw = r#"{"entries":[{"id":1,"name":"A","totalPoints":3,"roster":{"name":"x"}}]}"#;
    let entries = parse_leaderboard_json(raw).expect("should parse");
    assert!(entries[0].roster.is_none());
}

#[test]
fn empty_entries_list_is_valid() {
    let entries = parse_leaderboard_json(r#"{ "entries": [] }"#).expect("should parse");
    assert!(entries.is_empty());
}

#[test]
fn reads_fixture_from_disk() {
    let entries =
        read_leaderboard_file(&fixture_path("leaderboard.json")).expect("file should load");
    assert_eq!(entries.len(), 4);
    assert!(read_leaderboard_file(&fixture_path("missing.json")).is_err());
}

#[test]
fn junk_entries_are_dropped_without_failing_the_load() {
    let raw = r#"{"entries":[null,"not an entry",42,{"id":1,"name":"A","totalPoints":3,"roster":[]},[]]}"#;
    let entries = parse_leaderboard_json(raw).expect("junk entries are tolerated");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "A");
    assert_eq!(entries[0].id, EntryId::from("1"));
    assert_eq!(entries[0].total_points, 3.0);
}

#[test]
fn positional_ids_count_only_kept_entries() {
    let raw = r#"{"entries":[null,{"name":"A"},{"id":"entry-1","name":"B"},{"name":"C"}]}"#;
    let entries = parse_leaderboard_json(raw).expect("should parse");
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["entry-0", "entry-1", "entry-2"]);
}
