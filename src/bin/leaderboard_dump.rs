use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};

use playoff_pool_terminal::config::{Config, DataSource};
use playoff_pool_terminal::feed;
use playoff_pool_terminal::state::{AppState, apply_delta};
use playoff_pool_terminal::stats::{
    PositionFilter, SortKey, StatsTable, format_decimal, format_one_decimal,
};

#[derive(Debug, Default)]
struct Args {
    search: Option<String>,
    position: Option<PositionFilter>,
    sort: Option<SortKey>,
    ascending: bool,
    expand_all: bool,
    stats_only: bool,
    source: Option<DataSource>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let mut config = Config::from_env();
    if let Some(source) = args.source.clone() {
        config.source = source;
    }

    // Same one-shot loader the terminal UI uses.
    let (tx, rx) = mpsc::channel();
    let handle = feed::spawn_loader(config.source.clone(), config.timeout, tx);
    let mut state = AppState::new();
    for delta in rx {
        apply_delta(&mut state, delta);
    }
    let _ = handle.join();

    if let Some(line) = state.status_line() {
        println!("{line}");
        return Ok(());
    }

    if let Some(term) = args.search.as_deref() {
        state.set_search(term);
    }
    if args.expand_all {
        let mut view = state.leaderboard.clone();
        for entry in &state.entries {
            view = view.with_toggled(&entry.id);
        }
        state.leaderboard = view;
    }
    if let Some(filter) = args.position {
        state.set_position_filter(filter);
    }
    let key = args.sort.unwrap_or(state.stats.sort.key);
    if key != state.stats.sort.key {
        state.click_sort(key);
    }
    if args.ascending {
        state.click_sort(key);
    }

    if !args.stats_only {
        print_standings(&state);
        println!();
    }
    print_stats(&state);
    Ok(())
}

fn print_standings(state: &AppState) {
    println!("NFL Playoff Pool Leaderboard ({})", state.source_label);
    let ranked = state.ranked_entries();
    if ranked.is_empty() {
        println!("  (no entries)");
        return;
    }
    for row in ranked {
        let badge = row.placement.map(|p| p.title()).unwrap_or("");
        println!(
            "#{:<3} {:<28} {:>3} players remaining {:>9} points  {badge}",
            row.rank,
            row.entry.name,
            row.entry.players_remaining,
            format_one_decimal(row.entry.total_points)
        );
        if !row.expanded {
            continue;
        }
        for player in row.entry.roster() {
            let marker = if player.is_eliminated() { " eliminated" } else { "" };
            println!(
                "      {:<8} {}{marker} ({} pts)",
                player.position,
                player.name,
                format_decimal(player.points)
            );
        }
    }
}

fn print_stats(state: &AppState) {
    let sort = state.stats.sort;
    println!(
        "Player Statistics [{}] sorted by {} {}",
        state.stats.filter.label(),
        sort.key.label(),
        sort.direction.arrow()
    );
    let table = state.stats_table();
    let StatsTable::Rows { rows, columns } = &table else {
        println!("  {}", table.empty_message().unwrap_or_default());
        return;
    };
    let cols = columns.columns();
    let header = cols
        .iter()
        .map(|c| format!("{:<14}", c.header()))
        .collect::<String>();
    println!("{}", header.trim_end());
    for player in rows {
        let line = cols
            .iter()
            .map(|c| format!("{:<14}", c.cell(player)))
            .collect::<String>();
        println!("{}", line.trim_end());
    }
}

fn parse_args() -> Result<Args> {
    let raw = std::env::args().skip(1).collect::<Vec<_>>();
    let mut args = Args::default();
    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (arg.as_str(), None),
        };
        let mut value = || -> Result<String> {
            inline
                .clone()
                .or_else(|| iter.next().cloned())
                .with_context(|| format!("{flag} needs a value"))
        };
        match flag {
            "--search" => args.search = Some(value()?),
            "--position" => {
                let label = value()?;
                args.position = Some(
                    PositionFilter::from_label(&label)
                        .with_context(|| format!("unknown position {label}"))?,
                );
            }
            "--sort" => {
                args.sort = Some(match value()?.as_str() {
                    "points" | "pts" => SortKey::Points,
                    "bonus" | "bonus_points" => SortKey::BonusPoints,
                    other => anyhow::bail!("unknown sort key {other}"),
                });
            }
            "--asc" => args.ascending = true,
            "--expand" => args.expand_all = true,
            "--stats-only" => args.stats_only = true,
            "--url" => args.source = Some(DataSource::Http(value()?)),
            "--file" => args.source = Some(DataSource::File(PathBuf::from(value()?))),
            "--demo" => args.source = Some(DataSource::Demo),
            other => anyhow::bail!("unknown argument {other}"),
        }
    }
    Ok(args)
}
