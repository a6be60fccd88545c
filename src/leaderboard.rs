use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Entry, EntryId};

/// Badge shown next to the top four rows of the (filtered) standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Trophy,
    Silver,
    Bronze,
    Star,
}

impl Placement {
    pub fn for_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Trophy),
            1 => Some(Self::Silver),
            2 => Some(Self::Bronze),
            3 => Some(Self::Star),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Trophy => "1st Place",
            Self::Silver => "2nd Place",
            Self::Bronze => "3rd Place",
            Self::Star => "4th Place",
        }
    }
}

/// Set of entry ids whose roster is currently shown.
///
/// Updates are copy-on-write: [`ExpandedSet::toggled`] hands back a new set and
/// leaves the receiver untouched, so older snapshots stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpandedSet(BTreeSet<EntryId>);

impl ExpandedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.0.contains(id)
    }

    pub fn toggled(&self, id: &EntryId) -> Self {
        let mut next = self.0.clone();
        if !next.remove(id) {
            next.insert(id.clone());
        }
        Self(next)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaderboardViewState {
    pub search: String,
    pub expanded: ExpandedSet,
}

impl LeaderboardViewState {
    pub fn with_search(&self, term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            expanded: self.expanded.clone(),
        }
    }

    pub fn with_toggled(&self, id: &EntryId) -> Self {
        Self {
            search: self.search.clone(),
            expanded: self.expanded.toggled(id),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RankedEntry<'a> {
    /// 1-based position inside the current (searched) view.
    pub rank: usize,
    pub entry: &'a Entry,
    pub expanded: bool,
    pub placement: Option<Placement>,
}

pub fn matches_search(entry: &Entry, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    entry.name.to_lowercase().contains(&term.to_lowercase())
}

pub fn filter_entries<'a>(entries: &'a [Entry], term: &str) -> Vec<&'a Entry> {
    entries
        .iter()
        .filter(|entry| matches_search(entry, term))
        .collect()
}

/// Orders by total points, highest first. Ties keep their incoming order.
pub fn rank<'a>(mut entries: Vec<&'a Entry>) -> Vec<&'a Entry> {
    entries.sort_by(|a, b| {
        b.total_points
            .partial_cmp(&a.total_points)
            .unwrap_or(Ordering::Equal)
    });
    entries
}

pub fn ranked_view<'a>(entries: &'a [Entry], view: &LeaderboardViewState) -> Vec<RankedEntry<'a>> {
    rank(filter_entries(entries, &view.search))
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| RankedEntry {
            rank: idx + 1,
            entry,
            expanded: view.expanded.contains(&entry.id),
            placement: Placement::for_index(idx),
        })
        .collect()
}
