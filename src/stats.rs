use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Entry, Player};

pub const NO_PLAYER_DATA: &str = "No player data available";
pub const NO_POSITION_MATCHES: &str = "No players at this position";
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PositionFilter {
    #[default]
    All,
    Qb,
    Rb,
    Wr,
    Te,
    K,
    Defense,
    Coach,
}

pub const POSITION_FILTERS: [PositionFilter; 8] = [
    PositionFilter::All,
    PositionFilter::Qb,
    PositionFilter::Rb,
    PositionFilter::Wr,
    PositionFilter::Te,
    PositionFilter::K,
    PositionFilter::Defense,
    PositionFilter::Coach,
];

impl PositionFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Qb => "QB",
            Self::Rb => "RB",
            Self::Wr => "WR",
            Self::Te => "TE",
            Self::K => "K",
            Self::Defense => "DEFENSE",
            Self::Coach => "COACH",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        POSITION_FILTERS
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn index(self) -> usize {
        POSITION_FILTERS
            .iter()
            .position(|f| *f == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        POSITION_FILTERS[(self.index() + 1) % POSITION_FILTERS.len()]
    }

    pub fn prev(self) -> Self {
        let len = POSITION_FILTERS.len();
        POSITION_FILTERS[(self.index() + len - 1) % len]
    }

    /// `position` must already be normalized.
    pub fn matches(self, position: &str) -> bool {
        match self {
            Self::All => true,
            other => position == other.label().to_lowercase(),
        }
    }

    pub fn column_set(self) -> ColumnSet {
        match self {
            Self::Defense => ColumnSet::Defense,
            _ => ColumnSet::Offense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    Points,
    BonusPoints,
}

impl SortKey {
    /// Missing values compare as zero.
    pub fn value(self, player: &Player) -> f64 {
        let raw = match self {
            Self::Points => player.points,
            Self::BonusPoints => player.bonus_points,
        };
        raw.unwrap_or(0.0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::BonusPoints => "bonus_points",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Desc,
    Asc,
}

impl SortDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Desc => "▼",
            Self::Asc => "▲",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Points,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    /// Header click: same key flips direction, a different key starts descending.
    pub fn clicked(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Desc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Self { key, direction }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsViewState {
    pub sort: SortConfig,
    pub filter: PositionFilter,
}

impl StatsViewState {
    pub fn with_sort_clicked(self, key: SortKey) -> Self {
        Self {
            sort: self.sort.clicked(key),
            ..self
        }
    }

    pub fn with_filter(self, filter: PositionFilter) -> Self {
        Self { filter, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSet {
    Offense,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatColumn {
    Player,
    Pos,
    TotalPts,
    PassTd,
    PassYds,
    RushTd,
    RushYds,
    RecTd,
    RecYds,
    PointsAgainst,
    Sacks,
    Interceptions,
    Fumbles,
    Safety,
    Bonus,
    Status,
}

const OFFENSE_COLUMNS: [StatColumn; 6] = [
    StatColumn::PassTd,
    StatColumn::PassYds,
    StatColumn::RushTd,
    StatColumn::RushYds,
    StatColumn::RecTd,
    StatColumn::RecYds,
];

const DEFENSE_COLUMNS: [StatColumn; 5] = [
    StatColumn::PointsAgainst,
    StatColumn::Sacks,
    StatColumn::Interceptions,
    StatColumn::Fumbles,
    StatColumn::Safety,
];

impl ColumnSet {
    pub fn stat_columns(self) -> &'static [StatColumn] {
        match self {
            Self::Offense => &OFFENSE_COLUMNS,
            Self::Defense => &DEFENSE_COLUMNS,
        }
    }

    /// Full header row: name, position, points, the switching block, bonus, status.
    pub fn columns(self) -> Vec<StatColumn> {
        let mut cols = vec![StatColumn::Player, StatColumn::Pos, StatColumn::TotalPts];
        cols.extend_from_slice(self.stat_columns());
        cols.push(StatColumn::Bonus);
        cols.push(StatColumn::Status);
        cols
    }
}

impl StatColumn {
    pub fn header(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Pos => "Pos",
            Self::TotalPts => "Total Pts",
            Self::PassTd => "Pass TD",
            Self::PassYds => "Pass Yds",
            Self::RushTd => "Rush TD",
            Self::RushYds => "Rush Yds",
            Self::RecTd => "Rec TD",
            Self::RecYds => "Rec Yds",
            Self::PointsAgainst => "Points Against",
            Self::Sacks => "Sacks",
            Self::Interceptions => "INT",
            Self::Fumbles => "Fumbles",
            Self::Safety => "Safety",
            Self::Bonus => "Bonus",
            Self::Status => "Status",
        }
    }

    pub fn sort_key(self) -> Option<SortKey> {
        match self {
            Self::TotalPts => Some(SortKey::Points),
            Self::Bonus => Some(SortKey::BonusPoints),
            _ => None,
        }
    }

    pub fn cell(self, player: &Player) -> String {
        match self {
            Self::Player => non_empty_or_placeholder(&player.name),
            Self::Pos => non_empty_or_placeholder(&player.position.to_uppercase()),
            Self::TotalPts => format_decimal(player.points),
            Self::PassTd => format_raw(player.pass_td),
            Self::PassYds => format_decimal(player.pass_yds),
            Self::RushTd => format_raw(player.rush_td),
            Self::RushYds => format_decimal(player.rush_yds),
            Self::RecTd => format_raw(player.rec_td),
            Self::RecYds => format_decimal(player.rec_yds),
            Self::PointsAgainst => format_raw(player.score_allowed_points),
            Self::Sacks => format_raw(player.score_sack_points),
            Self::Interceptions => format_raw(player.score_interception_points),
            Self::Fumbles => format_raw(player.score_fumble_points),
            Self::Safety => format_raw(player.score_safety_points),
            Self::Bonus => format_decimal(player.bonus_points),
            Self::Status => status_label(player).to_string(),
        }
    }
}

pub fn status_label(player: &Player) -> &'static str {
    if player.is_active {
        "Active"
    } else {
        "Eliminated"
    }
}

pub fn format_decimal(value: Option<f64>) -> String {
    value
        .map(format_one_decimal)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// One decimal place, with exact halves rounded away from zero (`98.25` shows
/// as `98.3`). Plain `{:.1}` would round those to even.
pub fn format_one_decimal(value: f64) -> String {
    // Only x.25 and x.75 are exact halves at one decimal in binary.
    let quarters = value.abs() * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        return format!("{:.1}", (value * 10.0).round() / 10.0);
    }
    format!("{value:.1}")
}

pub fn format_raw(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn non_empty_or_placeholder(raw: &str) -> String {
    if raw.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        raw.to_string()
    }
}

/// Lower-cases and drops ASCII digits: `"WR1"` becomes `"wr"`.
pub fn normalize_position(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_ascii_digit())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keeps the first player for each (name, normalized position) pair and rewrites
/// its position to the normalized form. Later duplicates are dropped, not merged.
pub fn dedupe_players<'a, I>(players: I) -> Vec<Player>
where
    I: IntoIterator<Item = &'a Player>,
{
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut out = Vec::new();
    for player in players {
        let position = normalize_position(&player.position);
        if !seen.insert((player.name.clone(), position.clone())) {
            continue;
        }
        out.push(Player {
            position,
            ..player.clone()
        });
    }
    out
}

/// Flattens every roster in entry order. Entries without a roster are skipped.
pub fn aggregate_players(entries: &[Entry]) -> Vec<Player> {
    dedupe_players(
        entries
            .iter()
            .filter_map(|entry| entry.roster.as_deref())
            .flatten(),
    )
}

pub fn sort_players(players: &mut [Player], sort: SortConfig) {
    players.sort_by(|a, b| {
        let av = sort.key.value(a);
        let bv = sort.key.value(b);
        let ord = av.partial_cmp(&bv).unwrap_or(Ordering::Equal);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

pub fn filter_players(players: Vec<Player>, filter: PositionFilter) -> Vec<Player> {
    players
        .into_iter()
        .filter(|p| filter.matches(&p.position))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatsTable {
    /// Nothing to aggregate at all.
    NoData,
    /// Players exist, but none at the selected position.
    NoMatches { filter: PositionFilter },
    Rows {
        rows: Vec<Player>,
        columns: ColumnSet,
    },
}

impl StatsTable {
    pub fn rows(&self) -> &[Player] {
        match self {
            Self::Rows { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            Self::NoData => Some(NO_PLAYER_DATA),
            Self::NoMatches { .. } => Some(NO_POSITION_MATCHES),
            Self::Rows { .. } => None,
        }
    }
}

pub fn build_table(entries: &[Entry], view: StatsViewState) -> StatsTable {
    build_table_from_aggregate(aggregate_players(entries), view)
}

pub fn build_table_from_aggregate(mut players: Vec<Player>, view: StatsViewState) -> StatsTable {
    if players.is_empty() {
        return StatsTable::NoData;
    }
    sort_players(&mut players, view.sort);
    let rows = filter_players(players, view.filter);
    if rows.is_empty() {
        return StatsTable::NoMatches {
            filter: view.filter,
        };
    }
    StatsTable::Rows {
        rows,
        columns: view.filter.column_set(),
    }
}
