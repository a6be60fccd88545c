use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{Entry, EntryId};

pub const LEADERBOARD_PATH: &str = "/data/leaderboard.json";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch leaderboard data";

#[derive(Debug, Deserialize)]
struct LeaderboardDocument {
    entries: Vec<Value>,
}

pub fn leaderboard_url(base: &str) -> String {
    format!("{}{LEADERBOARD_PATH}", base.trim().trim_end_matches('/'))
}

pub fn fetch_leaderboard(client: &Client, url: &str) -> Result<Vec<Entry>> {
    log::info!("fetching leaderboard from {url}");
    let resp = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .with_context(|| format!("request to {url} failed"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("http {status} from {url}"));
    }
    let body = resp.text().context("failed reading body")?;
    parse_leaderboard_json(&body)
}

pub fn read_leaderboard_file(path: &Path) -> Result<Vec<Entry>> {
    log::info!("reading leaderboard from {}", path.display());
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    parse_leaderboard_json(&raw)
}

/// Parses `{ "entries": [...] }`. A body without an `entries` list is an error;
/// items that aren't entry objects are dropped and anything odd inside an entry
/// is tolerated.
pub fn parse_leaderboard_json(raw: &str) -> Result<Vec<Entry>> {
    let doc: LeaderboardDocument =
        serde_json::from_str(raw.trim()).context("invalid leaderboard json")?;
    let total = doc.entries.len();
    let mut entries: Vec<Entry> = doc
        .entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value::<Entry>(item).ok())
        .collect();
    if entries.len() < total {
        log::warn!("skipped {} malformed leaderboard entries", total - entries.len());
    }
    assign_missing_ids(&mut entries);
    Ok(entries)
}

/// Gives id-less entries `entry-<index>`, skipping any id the feed already uses.
fn assign_missing_ids(entries: &mut [Entry]) {
    let mut taken: HashSet<EntryId> = entries
        .iter()
        .filter(|e| !e.id.is_empty())
        .map(|e| e.id.clone())
        .collect();
    for (idx, entry) in entries.iter_mut().enumerate() {
        if !entry.id.is_empty() {
            continue;
        }
        let mut id = EntryId(format!("entry-{idx}"));
        let mut suffix = 1;
        while taken.contains(&id) {
            id = EntryId(format!("entry-{idx}-{suffix}"));
            suffix += 1;
        }
        taken.insert(id.clone());
        entry.id = id;
    }
}
