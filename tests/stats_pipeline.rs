use std::fs;
use std::path::PathBuf;

use playoff_pool_terminal::leaderboard_fetch::parse_leaderboard_json;
use playoff_pool_terminal::model::{Entry, EntryId, Player};
use playoff_pool_terminal::stats::{
    ColumnSet, NO_PLAYER_DATA, NO_POSITION_MATCHES, POSITION_FILTERS, PositionFilter,
    SortDirection, SortKey, StatsTable, StatsViewState, aggregate_players, build_table,
    dedupe_players, normalize_position,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_entries() -> Vec<Entry> {
    parse_leaderboard_json(&read_fixture("leaderboard.json")).expect("fixture should parse")
}

fn player(name: &str, position: &str, points: f64, active: bool) -> Player {
    Player {
        name: name.to_string(),
        position: position.to_string(),
        points: Some(points),
        is_active: active,
        ..Player::default()
    }
}

fn entry(id: &str, name: &str, total: f64, roster: Option<Vec<Player>>) -> Entry {
    Entry {
        id: EntryId::from(id),
        name: name.to_string(),
        total_points: total,
        players_remaining: 0,
        roster,
    }
}

fn row_names(table: &StatsTable) -> Vec<&str> {
    table.rows().iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn normalization_is_pure() {
    assert_eq!(normalize_position("WR1"), normalize_position("WR"));
    assert_eq!(normalize_position("WR"), "wr");
    assert_eq!(normalize_position(""), "");
    assert_eq!(normalize_position("Defense"), "defense");
}

#[test]
fn fixture_aggregate_keeps_first_occurrence() {
    let players = aggregate_players(&fixture_entries());
    let keys: Vec<(&str, &str)> = players
        .iter()
        .map(|p| (p.name.as_str(), p.position.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("J. Allen", "qb"),
            ("D. Henry", "rb"),
            ("A. St. Brown", "wr"),
            ("Ravens", "defense"),
            ("J. Harbaugh", "coach"),
            ("T. Kelce", "te"),
            ("H. Butker", "k"),
        ]
    );
    // The later RB2 copy with 99 points is dropped, not merged.
    let henry = &players[1];
    assert_eq!(henry.points, Some(22.1));
    assert!(!henry.is_active);
}

#[test]
fn dedupe_is_idempotent() {
    let once = aggregate_players(&fixture_entries());
    let twice = dedupe_players(&once);
    assert_eq!(once, twice);
}

#[test]
fn same_name_different_position_stays_separate() {
    let entries = vec![entry(
        "1",
        "A",
        0.0,
        Some(vec![player("Taysom", "QB", 4.0, true), player("Taysom", "TE1", 2.0, true)]),
    )];
    assert_eq!(aggregate_players(&entries).len(), 2);
}

#[test]
fn default_view_sorts_points_descending_with_missing_as_zero() {
    let table = build_table(&fixture_entries(), StatsViewState::default());
    assert_eq!(
        row_names(&table),
        vec![
            "J. Allen",
            "D. Henry",
            "A. St. Brown",
            "T. Kelce",
            "Ravens",
            "J. Harbaugh",
            "H. Butker",
        ]
    );
    let butker = table.rows().last().expect("rows");
    assert_eq!(butker.points, None);
}

#[test]
fn bonus_sort_is_stable_for_missing_values() {
    let view = StatsViewState::default().with_sort_clicked(SortKey::BonusPoints);
    assert_eq!(view.sort.direction, SortDirection::Desc);
    let table = build_table(&fixture_entries(), view);
    assert_eq!(
        row_names(&table),
        vec![
            "T. Kelce",
            "J. Allen",
            "H. Butker",
            "Ravens",
            "D. Henry",
            "A. St. Brown",
            "J. Harbaugh",
        ]
    );
}

#[test]
fn clicking_same_key_twice_restores_original_order() {
    let entries = fixture_entries();
    let start = StatsViewState::default();
    let original = build_table(&entries, start);

    let flipped = start.with_sort_clicked(SortKey::Points);
    assert_eq!(flipped.sort.direction, SortDirection::Asc);
    let asc = build_table(&entries, flipped);
    let mut reversed = row_names(&original);
    reversed.reverse();
    assert_eq!(row_names(&asc), reversed);

    let back = flipped.with_sort_clicked(SortKey::Points);
    assert_eq!(back, start);
    assert_eq!(build_table(&entries, back), original);
}

#[test]
fn switching_key_always_starts_descending() {
    let asc_points = StatsViewState::default().with_sort_clicked(SortKey::Points);
    let bonus = asc_points.with_sort_clicked(SortKey::BonusPoints);
    assert_eq!(bonus.sort.key, SortKey::BonusPoints);
    assert_eq!(bonus.sort.direction, SortDirection::Desc);
    let points = bonus.with_sort_clicked(SortKey::Points);
    assert_eq!(points.sort.direction, SortDirection::Desc);
}

#[test]
fn defense_filter_only_keeps_defense_rows() {
    let view = StatsViewState::default().with_filter(PositionFilter::Defense);
    let table = build_table(&fixture_entries(), view);
    let StatsTable::Rows { rows, columns } = &table else {
        panic!("expected rows, got {table:?}");
    };
    assert_eq!(*columns, ColumnSet::Defense);
    assert_eq!(rows.len(), 1);
    assert!(rows.iter().all(|p| p.position == "defense"));
    assert_eq!(rows[0].score_sack_points, Some(3.0));
}

#[test]
fn all_filter_includes_each_row_once() {
    let entries = fixture_entries();
    let aggregate = aggregate_players(&entries);
    let table = build_table(&entries, StatsViewState::default());
    assert_eq!(table.rows().len(), aggregate.len());
    for p in &aggregate {
        let hits = table
            .rows()
            .iter()
            .filter(|r| r.name == p.name && r.position == p.position)
            .count();
        assert_eq!(hits, 1);
    }
    assert!(matches!(
        table,
        StatsTable::Rows {
            columns: ColumnSet::Offense,
            ..
        }
    ));
}

#[test]
fn every_non_defense_filter_uses_offense_columns() {
    for filter in POSITION_FILTERS {
        let expected = if filter == PositionFilter::Defense {
            ColumnSet::Defense
        } else {
            ColumnSet::Offense
        };
        assert_eq!(filter.column_set(), expected, "{}", filter.label());
    }
}

#[test]
fn position_without_players_reports_no_matches() {
    let entries = vec![entry("1", "A", 0.0, Some(vec![player("Tom", "QB", 20.0, true)]))];
    let table = build_table(&entries, StatsViewState::default().with_filter(PositionFilter::K));
    assert_eq!(
        table,
        StatsTable::NoMatches {
            filter: PositionFilter::K
        }
    );
    assert_eq!(table.empty_message(), Some(NO_POSITION_MATCHES));
}

#[test]
fn empty_inputs_resolve_to_no_data() {
    let view = StatsViewState::default();
    assert_eq!(build_table(&[], view), StatsTable::NoData);

    let no_rosters = vec![entry("1", "A", 1.0, None), entry("2", "B", 2.0, Some(Vec::new()))];
    let table = build_table(&no_rosters, view);
    assert_eq!(table, StatsTable::NoData);
    assert_eq!(table.empty_message(), Some(NO_PLAYER_DATA));
}

#[test]
fn null_roster_is_skipped_and_others_still_aggregate() {
    let entries = vec![
        entry("1", "A", 1.0, None),
        entry("2", "B", 2.0, Some(vec![player("Joe", "RB", 5.0, false)])),
    ];
    let players = aggregate_players(&entries);
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Joe");
}

#[test]
fn scenario_tom_collapses_and_joe_is_eliminated() {
    let entries = vec![
        entry("1", "A", 10.0, Some(vec![player("Tom", "QB", 20.0, true)])),
        entry(
            "2",
            "B",
            15.0,
            Some(vec![player("Tom", "QB1", 20.0, true), player("Joe", "RB", 5.0, false)]),
        ),
    ];
    let table = build_table(&entries, StatsViewState::default());
    let rows = table.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].name.as_str(), rows[0].position.as_str()), ("Tom", "qb"));
    assert_eq!((rows[1].name.as_str(), rows[1].position.as_str()), ("Joe", "rb"));
    assert!(rows[1].is_eliminated());
}
