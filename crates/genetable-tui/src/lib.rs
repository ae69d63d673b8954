// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use genetable_app::{
    Column, ColumnKind, PageRequest, PageWindowEntry, Record, Session, SortDirection, SortSpec,
    ViewCommand, ViewEvent,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";
const WINDOW_ELLIPSIS: &str = "…";
const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Side effects the table view needs from its host.
pub trait AppRuntime {
    fn gene_link(&self, gene_id: &str) -> String;
    fn export_archive(&mut self) -> Result<ExportSummary>;
}

pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Nav,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    mode: InputMode,
    selected_row: usize,
    selected_col: usize,
    help_visible: bool,
    status: Option<String>,
    status_token: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavCommand {
    Quit,
    ToggleHelp,
    CycleGroup(isize),
    StartSearch,
    SortColumn(Column),
    SortSelected,
    ClearSort,
    Page(PageRequest),
    MoveRow(isize),
    MoveColumn(isize),
    ShowLink,
    Export,
}

pub fn run_app<R: AppRuntime>(session: &mut Session, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(&mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, session, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(session, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_TTL);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Returns true when the app should exit.
fn handle_key_event<R: AppRuntime>(
    session: &mut Session,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            view_data.help_visible = false;
        }
        return false;
    }

    match view_data.mode {
        InputMode::Search => {
            handle_search_key(session, view_data, key);
            false
        }
        InputMode::Nav => match nav_command_for_key(key) {
            Some(command) => apply_nav_command(session, runtime, view_data, internal_tx, command),
            None => false,
        },
    }
}

fn handle_search_key(session: &mut Session, view_data: &mut ViewData, key: KeyEvent) {
    let mut search = session.state().search.clone();
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Enter, _) => {
            view_data.mode = InputMode::Nav;
            return;
        }
        (KeyCode::Backspace, _) => {
            search.pop();
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            search.clear();
        }
        (KeyCode::Char(ch), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            search.push(ch);
        }
        _ => return,
    }
    apply_view_command(session, view_data, ViewCommand::SetSearch(search));
}

fn nav_command_for_key(key: KeyEvent) -> Option<NavCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => Some(NavCommand::Quit),
        (KeyCode::Char('?'), _) => Some(NavCommand::ToggleHelp),
        (KeyCode::Char('['), _) => Some(NavCommand::CycleGroup(-1)),
        (KeyCode::Char(']'), _) => Some(NavCommand::CycleGroup(1)),
        (KeyCode::Char('/'), _) => Some(NavCommand::StartSearch),
        (KeyCode::Char(digit @ '1'..='9'), _) => {
            let index = digit.to_digit(10).map_or(0, |value| value as usize - 1);
            Column::ALL.get(index).copied().map(NavCommand::SortColumn)
        }
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(NavCommand::SortSelected),
        (KeyCode::Char('S'), _) => Some(NavCommand::ClearSort),
        (KeyCode::Home, _) => Some(NavCommand::Page(PageRequest::First)),
        (KeyCode::End, _) => Some(NavCommand::Page(PageRequest::Last)),
        (KeyCode::Left, _) | (KeyCode::PageUp, _) => Some(NavCommand::Page(PageRequest::Prev)),
        (KeyCode::Right, _) | (KeyCode::PageDown, _) => Some(NavCommand::Page(PageRequest::Next)),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(NavCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(NavCommand::MoveRow(-1)),
        (KeyCode::Char('h'), _) => Some(NavCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) => Some(NavCommand::MoveColumn(1)),
        (KeyCode::Enter, _) => Some(NavCommand::ShowLink),
        (KeyCode::Char('e'), KeyModifiers::NONE) => Some(NavCommand::Export),
        _ => None,
    }
}

fn apply_nav_command<R: AppRuntime>(
    session: &mut Session,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: NavCommand,
) -> bool {
    match command {
        NavCommand::Quit => return true,
        NavCommand::ToggleHelp => view_data.help_visible = !view_data.help_visible,
        NavCommand::CycleGroup(delta) => {
            let events = session.cycle_group(delta);
            after_view_events(view_data, &events);
        }
        NavCommand::StartSearch => view_data.mode = InputMode::Search,
        NavCommand::SortColumn(column) => {
            apply_sort(session, view_data, internal_tx, ViewCommand::ActivateSort(column));
        }
        NavCommand::SortSelected => {
            let column = Column::ALL
                .get(view_data.selected_col)
                .copied()
                .unwrap_or(Column::Chromosome);
            apply_sort(session, view_data, internal_tx, ViewCommand::ActivateSort(column));
        }
        NavCommand::ClearSort => {
            apply_sort(session, view_data, internal_tx, ViewCommand::ClearSort);
        }
        NavCommand::Page(request) => {
            apply_view_command(session, view_data, ViewCommand::Page(request));
        }
        NavCommand::MoveRow(delta) => {
            let rows = session.page().rows.len();
            view_data.selected_row = step(view_data.selected_row, delta, rows);
        }
        NavCommand::MoveColumn(delta) => {
            view_data.selected_col = step(view_data.selected_col, delta, Column::ALL.len());
        }
        NavCommand::ShowLink => {
            let message = match selected_record(session, view_data) {
                Some(record) => format!(
                    "{} {}",
                    record.gene_name,
                    runtime.gene_link(&record.gene_id)
                ),
                None => "no gene selected".to_owned(),
            };
            emit_status(view_data, internal_tx, message);
        }
        NavCommand::Export => {
            let message = match runtime.export_archive() {
                Ok(summary) => format!(
                    "exported {} bytes to {}",
                    summary.bytes,
                    summary.path.display()
                ),
                Err(error) => {
                    warn!(error = %format!("{error:#}"), "archive export failed");
                    format!("export failed: {error:#}")
                }
            };
            emit_status(view_data, internal_tx, message);
        }
    }
    false
}

fn apply_sort(
    session: &mut Session,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: ViewCommand,
) {
    let events = apply_view_command(session, view_data, command);
    if events
        .iter()
        .any(|event| matches!(event, ViewEvent::SortChanged(_)))
    {
        let message = format!("sort: {}", sort_label(session.state().sort));
        emit_status(view_data, internal_tx, message);
    }
}

fn apply_view_command(
    session: &mut Session,
    view_data: &mut ViewData,
    command: ViewCommand,
) -> Vec<ViewEvent> {
    let events = session.dispatch(command);
    after_view_events(view_data, &events);
    events
}

fn after_view_events(view_data: &mut ViewData, events: &[ViewEvent]) {
    if events.is_empty() {
        return;
    }
    debug!(?events, "view changed");
    view_data.selected_row = 0;
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

fn selected_record<'a>(session: &'a Session, view_data: &ViewData) -> Option<&'a Record> {
    session.page().rows.get(view_data.selected_row).copied()
}

fn sort_label(sort: Option<SortSpec>) -> String {
    match sort {
        Some(spec) => format!("{} {}", spec.column.label(), sort_mark(spec.direction)),
        None => "none".to_owned(),
    }
}

fn sort_mark(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => SORT_MARK_ASC,
        SortDirection::Desc => SORT_MARK_DESC,
    }
}

fn header_label(column: Column, sort: Option<SortSpec>) -> String {
    match sort {
        Some(spec) if spec.column == column => {
            format!("{} {}", column.label(), sort_mark(spec.direction))
        }
        _ => column.label().to_owned(),
    }
}

fn window_text(window: &[PageWindowEntry], current: usize) -> String {
    window
        .iter()
        .map(|entry| match entry {
            PageWindowEntry::Page(page) if *page == current => format!("[{page}]"),
            PageWindowEntry::Page(page) => page.to_string(),
            PageWindowEntry::Ellipsis => WINDOW_ELLIPSIS.to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn header_text(session: &Session, view_data: &ViewData) -> String {
    let state = session.state();
    let groups = session.dataset().groups();
    let position = groups
        .iter()
        .position(|group| *group == state.active_group)
        .map_or(0, |index| index + 1);
    let cursor = if view_data.mode == InputMode::Search {
        "_"
    } else {
        ""
    };
    format!(
        "group [{}] {position}/{} | search: {}{cursor} | sort: {} | rows: {}",
        state.active_group,
        groups.len(),
        state.search,
        sort_label(state.sort),
        session.view_len()
    )
}

fn footer_text(session: &Session) -> String {
    let page = session.page();
    format!(
        "page {} of {} | {}",
        page.page,
        page.total_pages,
        window_text(&page.window, page.page)
    )
}

fn status_text(view_data: &ViewData) -> String {
    let hints = match view_data.mode {
        InputMode::Search => "type to filter | backspace | ctrl+u clear | esc/enter done",
        InputMode::Nav => {
            "j/k/h/l | [/] group | / search | 1-9 s/S sort | home/end ←/→ page | enter link | e export | ? help | q"
        }
    };
    match &view_data.status {
        Some(status) => format!("{status} | {hints}"),
        None => hints.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "rows: j/k or up/down | columns: h/l\n\
group: [ previous | ] next\n\
search: / edit | esc or enter leave | backspace | ctrl+u clear\n\
sort: 1-9 column | s highlighted column | again flips | S clear\n\
pages: home first | end last | left/pgup prev | right/pgdn next\n\
enter: show gene link | e: export archive\n\
? help | q or esc quit"
}

fn column_constraint(column: Column) -> Constraint {
    match (column.kind(), column) {
        (ColumnKind::Number, _) => Constraint::Length(11),
        (ColumnKind::Text, Column::Chromosome) => Constraint::Length(6),
        (ColumnKind::Text, Column::GeneId) => Constraint::Length(17),
        (ColumnKind::Text, _) => Constraint::Min(10),
    }
}

fn render(frame: &mut ratatui::Frame<'_>, session: &Session, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(session, view_data))
        .block(Block::default().title("genetable").borders(Borders::ALL))
        .style(if view_data.mode == InputMode::Search {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        });
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], session, view_data);

    let footer = Paragraph::new(format!(
        "{}\n{}",
        footer_text(session),
        status_text(view_data)
    ))
    .style(Style::default().fg(Color::Yellow))
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(64, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

/// Row number from the source file, else the position in the view.
fn row_label(record: &Record, position: usize) -> String {
    record
        .seq
        .map_or_else(|| position.to_string(), |seq| seq.to_string())
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, session: &Session, view_data: &ViewData) {
    let page = session.page();
    let sort = session.state().sort;

    let mut widths = vec![Constraint::Length(7)];
    widths.extend(Column::ALL.iter().map(|column| column_constraint(*column)));

    let header_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let mut header_cells = vec![Cell::from("#").style(header_style)];
    header_cells.extend(Column::ALL.iter().enumerate().map(|(index, column)| {
        let style = if index == view_data.selected_col {
            header_style.fg(Color::Cyan)
        } else {
            header_style
        };
        Cell::from(header_label(*column, sort)).style(style)
    }));
    let header = Row::new(header_cells);

    let rows = page.rows.iter().enumerate().map(|(row_index, record)| {
        let selected_row = row_index == view_data.selected_row;
        let ordinal = Cell::from(row_label(record, page.offset + row_index + 1))
            .style(Style::default().fg(Color::DarkGray));
        let mut cells = vec![ordinal];
        cells.extend(Column::ALL.iter().enumerate().map(|(column_index, column)| {
            let mut style = Style::default();
            if selected_row {
                style = style.bg(Color::DarkGray);
            }
            if selected_row && column_index == view_data.selected_col {
                style = Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
            }
            Cell::from(record.value(*column).display()).style(style)
        }));
        Row::new(cells)
    });

    let title = format!(" {} ", session.state().active_group);
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
