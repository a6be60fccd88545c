use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use playoff_pool_terminal::config::DataSource;
use playoff_pool_terminal::feed::{load_entries, spawn_loader};
use playoff_pool_terminal::http_client::build_client;
use playoff_pool_terminal::leaderboard_fetch::{fetch_leaderboard, leaderboard_url};
use playoff_pool_terminal::state::{AppState, Delta, LoadStatus, apply_delta};

/// Serves a single canned response on an ephemeral port and returns the base url.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    format!("http://{addr}")
}

fn drain(rx: mpsc::Receiver<Delta>) -> AppState {
    let mut state = AppState::new();
    for delta in rx {
        apply_delta(&mut state, delta);
    }
    state
}

#[test]
fn server_error_is_a_fetch_failure() {
    let base = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
    let client = build_client(Duration::from_secs(5)).expect("client");
    let err = fetch_leaderboard(&client, &leaderboard_url(&base)).expect_err("500 must fail");
    assert!(format!("{err:#}").contains("500"));
}

#[test]
fn server_error_surfaces_error_line() {
    let base = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
    let (tx, rx) = mpsc::channel();
    let handle = spawn_loader(
        DataSource::Http(leaderboard_url(&base)),
        Duration::from_secs(5),
        tx,
    );
    let state = drain(rx);
    handle.join().expect("loader thread");

    assert_eq!(
        state.status,
        LoadStatus::Failed("Failed to fetch leaderboard data".to_string())
    );
    assert_eq!(
        state.status_line().as_deref(),
        Some("Error: Failed to fetch leaderboard data")
    );
    assert!(state.ranked_entries().is_empty());
}

#[test]
fn malformed_body_is_a_fetch_failure() {
    let base = serve_once("HTTP/1.1 200 OK", r#"{"standings":[]}"#);
    let client = build_client(Duration::from_secs(5)).expect("client");
    assert!(fetch_leaderboard(&client, &leaderboard_url(&base)).is_err());
}

#[test]
fn successful_response_is_decoded() {
    let base = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"entries":[{"id":1,"name":"A","totalPoints":10,"playersRemaining":1,"roster":[]},{"id":2,"name":"B","totalPoints":15,"playersRemaining":0}]}"#,
    );
    let client = build_client(Duration::from_secs(5)).expect("client");
    let entries = fetch_leaderboard(&client, &leaderboard_url(&base)).expect("fetch ok");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].name, "B");
    assert!(entries[1].roster.is_none());
}

#[test]
fn file_source_loads_through_the_loader() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("leaderboard.json");

    let (tx, rx) = mpsc::channel();
    let handle = spawn_loader(DataSource::File(path), Duration::from_secs(1), tx);
    let state = drain(rx);
    handle.join().expect("loader thread");

    assert_eq!(state.status, LoadStatus::Ready);
    assert_eq!(state.entries.len(), 4);
    assert!(state.logs.iter().any(|l| l.starts_with("[INFO] Loading leaderboard")));
}

#[test]
fn missing_file_fails_like_a_bad_fetch() {
    let source = DataSource::File(PathBuf::from("definitely/not/here.json"));
    assert!(load_entries(&source, Duration::from_secs(1)).is_err());
}

#[test]
fn demo_source_always_loads() {
    let entries = load_entries(&DataSource::Demo, Duration::from_secs(1)).expect("demo");
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| !e.id.is_empty()));
}
