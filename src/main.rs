use std::fs::File;
use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};

use playoff_pool_terminal::config::Config;
use playoff_pool_terminal::feed;
use playoff_pool_terminal::leaderboard::{Placement, RankedEntry};
use playoff_pool_terminal::state::{AppState, Delta, LoadStatus, apply_delta};
use playoff_pool_terminal::stats::{
    POSITION_FILTERS, SortKey, StatColumn, StatsTable, format_decimal, format_one_decimal,
};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            } else if key.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        if self.state.stats_open {
            self.on_stats_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => self.state.toggle_selected(),
            KeyCode::Char('/') => {
                if self.state.status == LoadStatus::Ready {
                    self.state.search_active = true;
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.state.open_statistics(),
            KeyCode::Esc => {
                if !self.state.leaderboard.search.is_empty() {
                    self.state.clear_search();
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.state.search_active = false,
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.clear_search()
            }
            KeyCode::Char(c) => self.state.push_search_char(c),
            _ => {}
        }
    }

    fn on_stats_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.state.close_statistics()
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.state.click_sort(SortKey::Points),
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.state.click_sort(SortKey::BonusPoints)
            }
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.state.cycle_position_filter_next()
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.state.cycle_position_filter_prev()
            }
            KeyCode::Char(c @ '1'..='8') => {
                let idx = c as usize - '1' as usize;
                if let Some(filter) = POSITION_FILTERS.get(idx) {
                    self.state.set_position_filter(*filter);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let total = self.state.stats_table().rows().len();
                self.state.scroll_stats_down(total);
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_stats_up(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let config = Config::from_env();
    init_file_logging(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    feed::spawn_loader(config.source.clone(), config.timeout, tx);

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

/// stderr belongs to the alternate screen, so records only go to a file.
fn init_file_logging(config: &Config) {
    let Some(path) = config.log_file.as_ref() else {
        return;
    };
    match File::create(path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(err) => eprintln!("warning: cannot open log file {}: {err}", path.display()),
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(header_text(state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_search(frame, chunks[1], state);
    render_body(frame, chunks[2], state);

    let console = Paragraph::new(console_text(state))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(state));
    frame.render_widget(footer, chunks[4]);

    if state.stats_open {
        render_stats_overlay(frame, area, state);
    }
    if state.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let mut title = "NFL PLAYOFF POOL LEADERBOARD".to_string();
    if state.status == LoadStatus::Ready {
        title.push_str(&format!(" | {} entries", state.entries.len()));
    }
    if let Some(at) = state.loaded_at {
        title.push_str(&format!(" | Updated {}", at.format("%H:%M")));
    }
    title
}

fn footer_text(state: &AppState) -> String {
    if state.help_overlay {
        "?/Esc Close help | q Quit".to_string()
    } else if state.search_active {
        "Type to search | Backspace Delete | Ctrl-U Clear | Enter/Esc Done".to_string()
    } else if state.stats_open {
        "p Sort pts | b Sort bonus | Tab/←/→ Position | 1-8 Jump | j/k Scroll | s/Esc Close | q Quit"
            .to_string()
    } else {
        "j/k/↑/↓ Move | Enter Roster | / Search | s Player Stats | ? Help | q Quit".to_string()
    }
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let term = &state.leaderboard.search;
    let (text, style) = if term.is_empty() && !state.search_active {
        (
            "Find your entry...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else if state.search_active {
        (format!("{term}_"), Style::default())
    } else {
        (term.clone(), Style::default())
    };
    let border = if state.search_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(search, area);
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(line) = state.status_line() {
        let style = match state.status {
            LoadStatus::Failed(_) => Style::default().fg(Color::Red),
            _ => Style::default(),
        };
        let msg = Paragraph::new(line)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, area);
        return;
    }

    let ranked = state.ranked_entries();
    if ranked.is_empty() {
        let msg = if state.entries.is_empty() {
            "No entries in this pool".to_string()
        } else {
            format!("No entries match \"{}\"", state.leaderboard.search)
        };
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0usize;
    for (idx, row) in ranked.iter().enumerate() {
        let selected = idx == state.selected;
        if selected {
            selected_line = lines.len();
        }
        lines.push(entry_line(row, selected, area.width));
        if row.expanded {
            lines.extend(roster_lines(row));
        }
    }

    let visible = area.height as usize;
    let offset = scroll_offset(selected_line, lines.len(), visible);
    let list = Paragraph::new(lines).scroll((offset as u16, 0));
    frame.render_widget(list, area);
}

fn entry_line(row: &RankedEntry<'_>, selected: bool, width: u16) -> Line<'static> {
    let base = if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let (badge, badge_style) = placement_badge(row.placement);
    let chevron = if row.expanded { "▾" } else { "▸" };
    let left = format!(" #{:<3} {}", row.rank, row.entry.name);
    let remaining = format!("  {} players remaining", row.entry.players_remaining);
    let right = format!(
        "{:>8} points {chevron} ",
        format_one_decimal(row.entry.total_points)
    );

    let used = 2 + left.chars().count() + remaining.chars().count() + right.chars().count();
    let pad = (width as usize).saturating_sub(used);

    Line::from(vec![
        Span::styled(badge.to_string(), base.patch(badge_style)),
        Span::styled(left, base.add_modifier(Modifier::BOLD)),
        Span::styled(remaining, base.fg(Color::Gray)),
        Span::styled(" ".repeat(pad), base),
        Span::styled(right, base.add_modifier(Modifier::BOLD)),
    ])
}

fn roster_lines(row: &RankedEntry<'_>) -> Vec<Line<'static>> {
    let roster = row.entry.roster();
    if roster.is_empty() {
        return vec![Line::styled(
            "        No roster",
            Style::default().fg(Color::DarkGray),
        )];
    }
    roster
        .iter()
        .map(|player| {
            let mut spans = vec![
                Span::styled(
                    format!("        {:<8} ", player.position),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(format!("{:<24}", player.name)),
            ];
            if player.is_eliminated() {
                spans.push(Span::styled(
                    " eliminated",
                    Style::default().fg(Color::Red),
                ));
            } else {
                spans.push(Span::raw("           "));
            }
            spans.push(Span::styled(
                format!("  {} pts", format_decimal(player.points)),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            Line::from(spans)
        })
        .collect()
}

fn placement_badge(placement: Option<Placement>) -> (&'static str, Style) {
    match placement {
        Some(Placement::Trophy) => ("♛ ", Style::default().fg(Color::Yellow)),
        Some(Placement::Silver) => ("● ", Style::default().fg(Color::Gray)),
        Some(Placement::Bronze) => ("● ", Style::default().fg(Color::Rgb(205, 127, 50))),
        Some(Placement::Star) => ("★ ", Style::default().fg(Color::LightBlue)),
        None => ("  ", Style::default()),
    }
}

fn scroll_offset(selected: usize, total: usize, visible: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    let start = selected.saturating_sub(visible / 2);
    start.min(total - visible)
}

fn render_stats_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(94, 86, area);
    frame.render_widget(Clear, popup_area);

    let table = state.stats_table();
    let title = match &table {
        StatsTable::Rows { rows, .. } => format!("Player Statistics ({} players)", rows.len()),
        _ => "Player Statistics".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if matches!(table, StatsTable::NoData) {
        if let Some(msg) = table.empty_message() {
            let empty = Paragraph::new(msg).alignment(Alignment::Center);
            frame.render_widget(empty, inner);
        }
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let tabs = Tabs::new(POSITION_FILTERS.iter().map(|f| f.label()).collect::<Vec<_>>())
        .select(state.stats.filter.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::White).bg(Color::Blue))
        .divider(" ");
    frame.render_widget(tabs, sections[0]);

    match &table {
        StatsTable::Rows { rows, columns } => {
            let cols = columns.columns();
            let header = Row::new(
                cols.iter()
                    .map(|col| Cell::from(column_header(*col, state)))
                    .collect::<Vec<_>>(),
            )
            .style(Style::default().add_modifier(Modifier::BOLD));

            let visible = sections[2].height.saturating_sub(1) as usize;
            let start = state.stats_scroll.min(rows.len().saturating_sub(1));
            let body = rows.iter().skip(start).take(visible).map(|player| {
                Row::new(
                    cols.iter()
                        .map(|col| {
                            let text = col.cell(player);
                            let style = match col {
                                StatColumn::Status if player.is_active => {
                                    Style::default().fg(Color::Green)
                                }
                                StatColumn::Status => Style::default().fg(Color::Red),
                                StatColumn::TotalPts => {
                                    Style::default().add_modifier(Modifier::BOLD)
                                }
                                _ => Style::default(),
                            };
                            Cell::from(text).style(style)
                        })
                        .collect::<Vec<_>>(),
                )
            });

            let widths = cols.iter().map(|col| column_width(*col)).collect::<Vec<_>>();
            let widget = Table::new(body, widths).header(header).column_spacing(1);
            frame.render_widget(widget, sections[2]);
        }
        other => {
            let msg = other.empty_message().unwrap_or_default();
            let empty = Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, sections[2]);
        }
    }
}

fn column_header(col: StatColumn, state: &AppState) -> String {
    match col.sort_key() {
        Some(key) if key == state.stats.sort.key => {
            format!("{} {}", col.header(), state.stats.sort.direction.arrow())
        }
        Some(_) => format!("{} ↕", col.header()),
        None => col.header().to_string(),
    }
}

fn column_width(col: StatColumn) -> Constraint {
    match col {
        StatColumn::Player => Constraint::Min(18),
        StatColumn::Pos => Constraint::Length(8),
        StatColumn::Status => Constraint::Length(10),
        other => Constraint::Length((other.header().chars().count() as u16 + 2).max(7)),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let filters = POSITION_FILTERS
        .iter()
        .enumerate()
        .map(|(idx, f)| format!("{} {}", idx + 1, f.label()))
        .collect::<Vec<_>>()
        .join("  ");
    let text = [
        "Playoff Pool - Help".to_string(),
        String::new(),
        "Leaderboard:".to_string(),
        "  j/k or ↑/↓   Move".to_string(),
        "  Enter/Space  Show/hide roster".to_string(),
        "  /            Search entries".to_string(),
        "  Esc          Clear search".to_string(),
        "  s            Player statistics".to_string(),
        String::new(),
        "Player statistics:".to_string(),
        "  p / b        Sort by points / bonus (again to flip)".to_string(),
        "  Tab / ←/→    Cycle position".to_string(),
        format!("  {filters}"),
        "  j/k          Scroll".to_string(),
        "  s / Esc      Close".to_string(),
        String::new(),
        "  ?            Toggle help".to_string(),
        "  q            Quit".to_string(),
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
