use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::leaderboard::{LeaderboardViewState, RankedEntry, ranked_view};
use crate::leaderboard_fetch::FETCH_FAILED_MESSAGE;
use crate::model::{Entry, EntryId};
use crate::stats::{PositionFilter, SortKey, StatsTable, StatsViewState, build_table};

pub const LOADING_MESSAGE: &str = "Loading leaderboard...";
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// Terminal for the session; holds the user-facing message.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: LoadStatus,
    pub entries: Vec<Entry>,
    pub source_label: String,
    pub loaded_at: Option<DateTime<Local>>,
    pub leaderboard: LeaderboardViewState,
    pub search_active: bool,
    pub selected: usize,
    pub stats_open: bool,
    pub stats: StatsViewState,
    pub stats_scroll: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: LoadStatus::Loading,
            entries: Vec::new(),
            source_label: String::new(),
            loaded_at: None,
            leaderboard: LeaderboardViewState::default(),
            search_active: false,
            selected: 0,
            stats_open: false,
            stats: StatsViewState::default(),
            stats_scroll: 0,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Text to show instead of the list, if any.
    pub fn status_line(&self) -> Option<String> {
        match &self.status {
            LoadStatus::Loading => Some(LOADING_MESSAGE.to_string()),
            LoadStatus::Failed(msg) => Some(format!("Error: {msg}")),
            LoadStatus::Ready => None,
        }
    }

    /// Ranked rows for the current search. Empty unless the load succeeded.
    pub fn ranked_entries(&self) -> Vec<RankedEntry<'_>> {
        if self.status != LoadStatus::Ready {
            return Vec::new();
        }
        ranked_view(&self.entries, &self.leaderboard)
    }

    pub fn selected_entry_id(&self) -> Option<EntryId> {
        self.ranked_entries()
            .get(self.selected)
            .map(|row| row.entry.id.clone())
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.leaderboard = self.leaderboard.with_search(term);
        self.clamp_selection();
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut term = self.leaderboard.search.clone();
        term.push(c);
        self.set_search(term);
    }

    pub fn pop_search_char(&mut self) {
        let mut term = self.leaderboard.search.clone();
        term.pop();
        self.set_search(term);
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    pub fn toggle_entry(&mut self, id: &EntryId) {
        self.leaderboard = self.leaderboard.with_toggled(id);
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_entry_id() {
            self.toggle_entry(&id);
        }
    }

    pub fn is_expanded(&self, id: &EntryId) -> bool {
        self.leaderboard.expanded.contains(id)
    }

    pub fn select_next(&mut self) {
        let total = self.ranked_entries().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.ranked_entries().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.ranked_entries().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn open_statistics(&mut self) {
        self.stats_open = true;
        self.search_active = false;
        self.stats_scroll = 0;
    }

    pub fn close_statistics(&mut self) {
        self.stats_open = false;
    }

    pub fn toggle_statistics(&mut self) {
        if self.stats_open {
            self.close_statistics();
        } else {
            self.open_statistics();
        }
    }

    pub fn click_sort(&mut self, key: SortKey) {
        self.stats = self.stats.with_sort_clicked(key);
        self.stats_scroll = 0;
    }

    pub fn set_position_filter(&mut self, filter: PositionFilter) {
        self.stats = self.stats.with_filter(filter);
        self.stats_scroll = 0;
    }

    pub fn cycle_position_filter_next(&mut self) {
        self.set_position_filter(self.stats.filter.next());
    }

    pub fn cycle_position_filter_prev(&mut self) {
        self.set_position_filter(self.stats.filter.prev());
    }

    /// Statistics always aggregate the full pool, never the searched subset.
    pub fn stats_table(&self) -> StatsTable {
        let entries: &[Entry] = if self.status == LoadStatus::Ready {
            &self.entries
        } else {
            &[]
        };
        build_table(entries, self.stats)
    }

    pub fn scroll_stats_down(&mut self, total_rows: usize) {
        if self.stats_scroll + 1 < total_rows {
            self.stats_scroll += 1;
        }
    }

    pub fn scroll_stats_up(&mut self) {
        self.stats_scroll = self.stats_scroll.saturating_sub(1);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    EntriesLoaded {
        entries: Vec<Entry>,
        source: String,
    },
    LoadFailed {
        cause: String,
    },
    Log(String),
}

/// The load result is accepted once; anything arriving after the status left
/// `Loading` is dropped with a console note.
pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::EntriesLoaded { entries, source } => {
            if !state.is_loading() {
                state.push_log("[WARN] Ignoring leaderboard data after load finished");
                return;
            }
            state.push_log(format!(
                "[INFO] Loaded {} entries from {source}",
                entries.len()
            ));
            state.entries = entries;
            state.source_label = source;
            state.loaded_at = Some(Local::now());
            state.status = LoadStatus::Ready;
            state.clamp_selection();
        }
        Delta::LoadFailed { cause } => {
            if !state.is_loading() {
                state.push_log("[WARN] Ignoring load failure after load finished");
                return;
            }
            state.push_log(format!("[WARN] Leaderboard load failed: {cause}"));
            state.entries.clear();
            state.status = LoadStatus::Failed(FETCH_FAILED_MESSAGE.to_string());
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
