use chrono::Datelike;
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, Focus};
use super::form::ClientField;
use super::notify::NotificationKind;
use crate::models::Client;

const EMPTY_STATE: &str = "No clients found. Add one with the form on the right.";

/// One table row, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRow {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub balance: String,
    pub workplace: String,
}

/// What the client table currently shows.
#[derive(Debug, Default)]
pub struct TableView {
    rows: Vec<ClientRow>,
}

impl TableView {
    pub fn rows(&self) -> &[ClientRow] {
        &self.rows
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the table for `clients`, keeping their order.
pub fn render(clients: &[Client]) -> TableView {
    let rows = clients
        .iter()
        .map(|client| ClientRow {
            id: client.id,
            name: client.name.clone(),
            phone: client.phone.clone(),
            balance: format_balance(client.balance),
            workplace: display_workplace(client.workplace.as_deref()),
        })
        .collect();

    TableView { rows }
}

pub fn format_balance(balance: f64) -> String {
    format!("R{:.2}", balance)
}

pub fn display_workplace(workplace: Option<&str>) -> String {
    match workplace {
        Some(w) if !w.is_empty() => w.to_string(),
        _ => "-".to_string(),
    }
}

pub fn draw<B: Backend>(frame: &mut Frame<B>, app: &mut App) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(size);

    render_header(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(chunks[2]);

    render_table(frame, app, body[0]);
    render_form(frame, app, body[1]);
    render_notification(frame, app, chunks[3]);
    render_footer(frame, app, chunks[4]);

    if app.pending_delete().is_some() {
        render_delete_confirmation(frame, size);
    }
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}

fn render_header<B: Backend>(frame: &mut Frame<B>, app: &App, area: Rect) {
    let header = Paragraph::new(Spans::from(vec![
        Span::styled(
            "Client Ledger",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  |  {} clients", app.view().count())),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn render_search<B: Backend>(frame: &mut Frame<B>, app: &App, area: Rect) {
    let focused = app.focus() == Focus::Search;
    let text = if focused {
        format!("{}|", app.search())
    } else {
        app.search().to_string()
    };

    let search = Paragraph::new(text).block(focused_block("Search", focused));

    frame.render_widget(search, area);
}

fn render_table<B: Backend>(frame: &mut Frame<B>, app: &mut App, area: Rect) {
    let focused = app.focus() == Focus::Table;
    let (view, table_state) = app.table_parts();

    if view.is_empty() {
        let empty = Paragraph::new(EMPTY_STATE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(focused_block("Clients", focused));
        frame.render_widget(empty, area);
        return;
    }

    let header_cells = ["Name", "Phone", "Amount Owed", "Workplace"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells)
        .style(Style::default())
        .height(1)
        .bottom_margin(1);

    let rows = view.rows().iter().map(|row| {
        Row::new(vec![
            Cell::from(row.name.as_str()),
            Cell::from(row.phone.as_str()),
            Cell::from(row.balance.as_str()),
            Cell::from(row.workplace.as_str()),
        ])
        .height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(focused_block("Clients", focused))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
        ]);

    frame.render_stateful_widget(table, area, table_state);
}

fn render_form<B: Backend>(frame: &mut Frame<B>, app: &App, area: Rect) {
    let focused = app.focus() == Focus::Form;
    let form = app.form();

    let items: Vec<ListItem> = ClientField::ALL
        .iter()
        .map(|&field| {
            let current = focused && field == form.current_field();
            let label_style = if current {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value = if current {
                Span::styled(
                    format!("{}|", form.value(field)),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(form.value(field))
            };

            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                value,
            ]))
        })
        .collect();

    let list = List::new(items).block(focused_block(form.title(), focused));

    frame.render_widget(list, area);
}

fn render_notification<B: Backend>(frame: &mut Frame<B>, app: &App, area: Rect) {
    let Some(notification) = app.notification() else {
        return;
    };

    let color = match notification.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
    };

    let line = Paragraph::new(notification.message.as_str())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    frame.render_widget(line, area);
}

fn render_footer<B: Backend>(frame: &mut Frame<B>, app: &App, area: Rect) {
    let help = match app.focus() {
        Focus::Search => "Type to filter | <Esc> Clear | <Tab> Next pane | <Ctrl+C> Quit",
        Focus::Table => {
            "<E> Edit | <D> Delete | <N> New | <R> Refresh | </> Search | <Tab> Next pane | <Q> Quit"
        }
        Focus::Form => "<Enter> Save | <Esc> Reset | Up/Down Field | <Tab> Next pane",
    };
    let year = chrono::Local::now().year();

    let footer = Paragraph::new(format!("{help}  ·  © {year} Client Ledger"))
        .style(Style::default().fg(Color::Gray));

    frame.render_widget(footer, area);
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(40, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Delete this client?"),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
