//! Header and footer status bar widgets for the vodtop TUI.
//!
//! - Header: title, followed log, session and concurrency counts, modes
//! - Footer: keybinding hints and the number of lines read

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(header_line(app)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(header, area);
}

fn header_line(app: &App) -> Line<'static> {
    let stat_style = Style::default().fg(Color::DarkGray);
    let session_count = app.session_count();

    let stats = format!(
        " | {} session{} | {} concurrent | refresh: {} | mode: {}",
        session_count,
        if session_count == 1 { "" } else { "s" },
        app.table.concurrent_addresses,
        app.refresh_mode.label(),
        app.display_mode().column_title(),
    );

    Line::from(vec![
        Span::styled(
            "vodtop",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - "),
        Span::raw(app.log_path.display().to_string()),
        Span::styled(stats, stat_style),
    ])
}

/// Renders the footer bar with keybinding hints.
pub fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let sep_style = Style::default().fg(Color::DarkGray);

    let hints = vec![
        Span::styled(" r", key_style),
        Span::raw(" redraw"),
        Span::styled("  |  ", sep_style),
        Span::styled("q", key_style),
        Span::raw(" quit"),
        Span::styled("  |  ", sep_style),
        Span::styled(format!("{} lines read", app.lines_seen()), sep_style),
    ];

    let footer = Paragraph::new(Line::from(hints)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
