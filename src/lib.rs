pub mod config;
pub mod fake_feed;
pub mod feed;
pub mod http_client;
pub mod leaderboard;
pub mod leaderboard_fetch;
pub mod model;
pub mod state;
pub mod stats;
