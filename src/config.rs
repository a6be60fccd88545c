use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::leaderboard_fetch::leaderboard_url;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_FILE: &str = "data/leaderboard.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(String),
    File(PathBuf),
    Demo,
}

impl DataSource {
    pub fn label(&self) -> String {
        match self {
            DataSource::Http(url) => url.clone(),
            DataSource::File(path) => path.display().to_string(),
            DataSource::Demo => "demo feed".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: DataSource,
    pub timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Reads `.env.local`, then `.env`, then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let source = match get("LEADERBOARD_SOURCE")
            .unwrap_or_else(|| "http".to_string())
            .to_lowercase()
            .as_str()
        {
            "demo" | "fake" => DataSource::Demo,
            "file" => DataSource::File(PathBuf::from(
                get("LEADERBOARD_FILE").unwrap_or_else(|| DEFAULT_FILE.to_string()),
            )),
            _ => DataSource::Http(get("LEADERBOARD_URL").unwrap_or_else(|| {
                leaderboard_url(
                    &get("LEADERBOARD_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                )
            })),
        };

        let timeout_secs = get("LEADERBOARD_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);

        Self {
            source,
            timeout: Duration::from_secs(timeout_secs),
            log_file: get("LEADERBOARD_LOG_FILE").map(PathBuf::from),
        }
    }
}
