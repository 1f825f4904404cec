mod tui_app;

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use tui_app::{
    format_value, parse_hex, truncate, AppState, ConnectionStatus, GridEditor, Message, Pane,
    ReportCell, GRID_COLUMNS,
};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client");

    let mut app = AppState::new(base_url);

    // Open the session before rendering so edits have somewhere to go
    app.connect(&client).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut report_state = TableState::default();

    let result = run_loop(&mut terminal, &mut app, &client, &mut report_state).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.disconnect(&client).await;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
    report_state: &mut TableState,
) -> io::Result<()> {
    let poll_interval = Duration::from_millis(250);

    loop {
        terminal.draw(|f| render(f, app, report_state))?;

        if !event::poll(poll_interval)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Cell edit mode swallows every key until Enter or Esc.
        if let Some(buffer) = app.editing.as_mut() {
            match key.code {
                KeyCode::Enter => {
                    if app.commit_edit() {
                        app.push_focused(client).await;
                    }
                }
                KeyCode::Esc => app.editing = None,
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
            KeyCode::Tab => app.focus = app.focus.next(),
            KeyCode::Char('g') | KeyCode::Char('G') => {
                app.generate(client).await;
                report_state.select(None);
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                app.download(client, "csv", Path::new(".")).await;
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                app.download(client, "xlsx", Path::new(".")).await;
            }
            KeyCode::Enter => app.begin_edit(),
            KeyCode::Char('a') | KeyCode::Char('A') => {
                if let Some(grid) = app.focused_grid_mut() {
                    grid.add_row();
                    app.push_focused(client).await;
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                if app.focused_grid_mut().is_some_and(|g| g.delete_row()) {
                    app.push_focused(client).await;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => move_focus(app, report_state, 1, 0),
            KeyCode::Up | KeyCode::Char('k') => move_focus(app, report_state, -1, 0),
            KeyCode::Left | KeyCode::Char('h') => move_focus(app, report_state, 0, -1),
            KeyCode::Right | KeyCode::Char('l') => move_focus(app, report_state, 0, 1),
            _ => {}
        }
    }
}

fn move_focus(app: &mut AppState, report_state: &mut TableState, d_row: isize, d_col: isize) {
    if let Some(grid) = app.focused_grid_mut() {
        grid.move_cursor(d_row, d_col);
        return;
    }
    let len = app.report.as_ref().map_or(0, |r| r.rows.len());
    if len == 0 || d_row == 0 {
        return;
    }
    let next = report_state
        .selected()
        .map_or(0, |i| i.saturating_add_signed(d_row).min(len - 1));
    report_state.select(Some(next));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState, report_state: &mut TableState) {
    let area = f.area();

    // Outer vertical split: header | grids | report | message | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // header
            Constraint::Percentage(40), // editors
            Constraint::Min(0),         // report
            Constraint::Length(1),      // message
            Constraint::Length(1),      // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_grid(f, app, &app.pitcher, Pane::Pitcher, " PITCHER STATS ", halves[0]);
    render_grid(f, app, &app.batter, Pane::Batter, " BATTER STATS ", halves[1]);

    render_report(f, app, report_state, chunks[2]);
    render_message(f, app, chunks[3]);
    render_footer(f, chunks[4]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let mut spans = vec![
        Span::styled(
            " Pitcher vs Batter Matchup Analyzer  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled("red", Style::default().fg(Color::Red)),
        Span::raw(" = pitcher advantage, "),
        Span::styled("green", Style::default().fg(Color::Green)),
        Span::raw(" = batter advantage  "),
    ];

    // Band swatches once a report has delivered the palette
    if let Some(report) = &app.report {
        for entry in &report.legend {
            spans.push(Span::styled("  ", Style::default().bg(hex_color(&entry.background))));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(paragraph, area);
}

fn render_grid(f: &mut Frame, app: &AppState, grid: &GridEditor, pane: Pane, title: &str, area: Rect) {
    let focused = app.focus == pane;

    let header_cells = GRID_COLUMNS
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = grid
        .rows
        .iter()
        .enumerate()
        .map(|(r, cells)| {
            let cells = cells.iter().enumerate().map(|(c, text)| {
                let at_cursor = focused && r == grid.cursor_row && c == grid.cursor_col;
                match (&app.editing, at_cursor) {
                    (Some(buffer), true) => Cell::from(format!("{buffer}▏"))
                        .style(Style::default().fg(Color::Black).bg(Color::Yellow)),
                    (None, true) => Cell::from(text.as_str())
                        .style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)),
                    _ => Cell::from(text.as_str()),
                }
            });
            Row::new(cells.collect::<Vec<_>>())
        })
        .collect();

    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    );

    let mut state = TableState::default().with_selected(Some(grid.cursor_row));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_report(f: &mut Frame, app: &AppState, state: &mut TableState, area: Rect) {
    let focused = app.focus == Pane::Report;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            " MATCHUP ANALYSIS ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let Some(report) = &app.report else {
        let hint = Paragraph::new("Press [g] to generate the matchup table.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let header_cells = report.columns.iter().map(|h| {
        Cell::from(truncate(h, 12)).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = report
        .rows
        .iter()
        .map(|cells| Row::new(cells.iter().map(report_cell).collect::<Vec<_>>()))
        .collect();

    let widths: Vec<Constraint> = report
        .columns
        .iter()
        .enumerate()
        .map(|(i, _)| if i == 0 { Constraint::Length(12) } else { Constraint::Length(9) })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));

    f.render_stateful_widget(table, area, state);
}

/// Delta cells carry a band; paint them with its colors.
fn report_cell(cell: &ReportCell) -> Cell<'static> {
    let text = format_value(&cell.value);
    match &cell.style {
        Some(style) => {
            let fg = match style.foreground.as_deref() {
                Some("white") => Color::White,
                _ => Color::Black,
            };
            Cell::from(text).style(Style::default().bg(hex_color(&style.background)).fg(fg))
        }
        None => Cell::from(text),
    }
}

fn hex_color(hex: &str) -> Color {
    parse_hex(hex).map_or(Color::Reset, |(r, g, b)| Color::Rgb(r, g, b))
}

fn render_message(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.message {
        Some(Message::Error(text)) => Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Some(Message::Info(text)) => {
            Line::from(Span::styled(format!(" {text}"), Style::default().fg(Color::Green)))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[tab] ", Style::default().fg(Color::Yellow)),
        Span::raw("pane  "),
        Span::styled("[enter] ", Style::default().fg(Color::Yellow)),
        Span::raw("edit  "),
        Span::styled("[a/d] ", Style::default().fg(Color::Yellow)),
        Span::raw("add/del row  "),
        Span::styled("[g] ", Style::default().fg(Color::Yellow)),
        Span::raw("generate  "),
        Span::styled("[c/x] ", Style::default().fg(Color::Yellow)),
        Span::raw("save csv/xlsx"),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
