use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;

use crate::config::DataSource;
use crate::fake_feed;
use crate::http_client::http_client;
use crate::leaderboard_fetch::{fetch_leaderboard, read_leaderboard_file};
use crate::model::Entry;
use crate::state::Delta;

const DEMO_ENTRY_COUNT: usize = 14;

/// Spawns the single load for this session. Posts exactly one of
/// `EntriesLoaded` / `LoadFailed`, preceded by a console line.
pub fn spawn_loader(source: DataSource, timeout: Duration, tx: Sender<Delta>) -> JoinHandle<()> {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log(format!(
            "[INFO] Loading leaderboard from {}",
            source.label()
        )));
        let delta = match load_entries(&source, timeout) {
            Ok(entries) => Delta::EntriesLoaded {
                entries,
                source: source.label(),
            },
            Err(err) => {
                log::warn!("leaderboard load failed: {err:#}");
                Delta::LoadFailed {
                    cause: format!("{err:#}"),
                }
            }
        };
        let _ = tx.send(delta);
    })
}

pub fn load_entries(source: &DataSource, timeout: Duration) -> Result<Vec<Entry>> {
    match source {
        DataSource::Http(url) => {
            let client = http_client(timeout)?;
            fetch_leaderboard(client, url)
        }
        DataSource::File(path) => read_leaderboard_file(path),
        DataSource::Demo => {
            let mut rng = rand::thread_rng();
            Ok(fake_feed::demo_entries(&mut rng, DEMO_ENTRY_COUNT))
        }
    }
}
