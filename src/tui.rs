// Terminal presentation: draws a Dashboard and turns key presses into actions

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table};
use ratatui::{Frame, Terminal};
use tracing::{debug, info};

use crate::app::App;
use crate::engine::types::{Action, LoadStatus, SortDirection, SortField};
use crate::view::{Dashboard, SortButton};

// Columns drawn in the terminal; the thumbnail column has no text form
const TEXT_COLUMNS: std::ops::Range<usize> = 1..7;
const COLUMN_WIDTHS: [Constraint; 6] = [
    Constraint::Min(14),
    Constraint::Length(8),
    Constraint::Length(20),
    Constraint::Length(16),
    Constraint::Length(22),
    Constraint::Length(13),
];

#[derive(Debug)]
pub enum Command {
    Dispatch(Action),
    Quit,
}

pub fn sort_key(field: SortField) -> KeyCode {
    match field {
        SortField::MarketCap => KeyCode::F(2),
        SortField::Change => KeyCode::F(3),
    }
}

/// Map a key press onto a command, given the current search term.
pub fn map_key(key: KeyEvent, search_term: &str) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if ctrl => Some(Command::Quit),
        KeyCode::Char('u') if ctrl => Some(Command::Dispatch(Action::SearchChanged(String::new()))),
        KeyCode::Char(c) if !ctrl => {
            let mut term = search_term.to_string();
            term.push(c);
            Some(Command::Dispatch(Action::SearchChanged(term)))
        }
        KeyCode::Backspace => {
            let mut term = search_term.to_string();
            term.pop()?;
            Some(Command::Dispatch(Action::SearchChanged(term)))
        }
        code if code == sort_key(SortField::MarketCap) => {
            Some(Command::Dispatch(Action::Sort(SortField::MarketCap)))
        }
        code if code == sort_key(SortField::Change) => {
            Some(Command::Dispatch(Action::Sort(SortField::Change)))
        }
        _ => None,
    }
}

fn button_span(button: &SortButton) -> Span<'static> {
    let arrow = match button.direction {
        Some(SortDirection::Descending) => " ▼",
        Some(SortDirection::Ascending) => " ▲",
        None => "",
    };
    let key = match sort_key(button.field) {
        KeyCode::F(n) => format!("F{n}"),
        _ => String::new(),
    };
    Span::styled(format!("[{key}] {}{arrow}", button.label), Style::default().fg(Color::Cyan))
}

pub fn draw(frame: &mut Frame, dashboard: &Dashboard) {
    let [title_area, search_area, buttons_area, status_area, table_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(dashboard.heading.bold()), title_area);

    let search = if dashboard.search.value.is_empty() {
        Line::from(dashboard.search.placeholder.dark_gray())
    } else {
        Line::from(dashboard.search.value.clone())
    };
    frame.render_widget(
        Paragraph::new(search).block(Block::bordered().title("Search")),
        search_area,
    );

    let mut buttons: Vec<Span> = Vec::new();
    for button in &dashboard.buttons {
        if !buttons.is_empty() {
            buttons.push(Span::raw("  "));
        }
        buttons.push(button_span(button));
    }
    buttons.push(Span::raw("  [Esc] Quit").dark_gray());
    frame.render_widget(Paragraph::new(Line::from(buttons)), buttons_area);

    let status = match &dashboard.status {
        LoadStatus::Loading => Line::from("Loading market data...".yellow()),
        LoadStatus::Ready => Line::from(Span::styled(
            format!("{} assets", dashboard.table.rows.len()),
            Style::default().fg(Color::DarkGray),
        )),
        LoadStatus::Failed { reason } => Line::from(Span::styled(
            format!("Error fetching data: {reason}"),
            Style::default().fg(Color::Red),
        )),
    };
    frame.render_widget(Paragraph::new(status), status_area);

    let header = Row::new(dashboard.table.columns[TEXT_COLUMNS].iter().map(|c| Cell::from(*c)))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = dashboard.table.rows.iter().map(|row| {
        let cells = row.cells();
        Row::new(cells[TEXT_COLUMNS].iter().map(|c| Cell::from(c.to_string())))
    });
    let table = Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .block(Block::bordered().title("Top 10 by market cap (USD)"));
    frame.render_widget(table, table_area);
}

/// Take over the terminal and run the dashboard until the user quits.
pub async fn run(app: &mut App, tick_rate: Duration) -> anyhow::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = event_loop(&mut terminal, app, tick_rate).await;

    // restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        let dashboard = app.dashboard();
        terminal.draw(|frame| draw(frame, &dashboard))?;

        tokio::select! {
            Some(result) = app.next_fetch_result(), if app.fetch_pending() => {
                app.apply_fetch(result);
            }
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => match map_key(key, &app.state().search_term) {
                    Some(Command::Quit) => {
                        info!("Quit requested");
                        break;
                    }
                    Some(Command::Dispatch(action)) => {
                        debug!(?action, "User action");
                        app.dispatch(action);
                    }
                    None => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = ticker.tick() => {}
        }
    }
    Ok(())
}
