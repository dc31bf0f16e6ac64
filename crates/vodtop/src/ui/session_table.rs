//! Session table widget for the vodtop TUI.
//!
//! Draws the rows built by the tracker: a bold header row naming the
//! columns, then one line per session. Rows whose address has concurrent
//! sessions are drawn in that address's colour.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use vodtop_tracker::{SessionRow, SessionTable};

use crate::app::App;
use crate::ui::theme::row_color;

pub fn render_session_table(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Sessions ({}) ", app.table.rows.len()))
        .border_style(Style::default().fg(Color::White));

    if app.table.rows.is_empty() {
        render_empty_state(frame, area, block, app);
        return;
    }

    let items: Vec<ListItem> = std::iter::once(header_item(&app.table))
        .chain(app.table.rows.iter().map(row_item))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn header_item(table: &SessionTable) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        table.header.join(" "),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )))
}

fn row_item(row: &SessionRow) -> ListItem<'static> {
    let style = match row.color {
        Some(slot) => Style::default()
            .fg(row_color(Some(slot)))
            .add_modifier(Modifier::BOLD),
        None => Style::default(),
    };
    ListItem::new(Line::from(Span::styled(row.text(), style)))
}

fn render_empty_state(frame: &mut Frame, area: Rect, block: Block, app: &App) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No sessions tracked",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Waiting for events in {}", app.log_path.display()),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
