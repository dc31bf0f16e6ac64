//! Layout helpers for the vodtop TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application layout areas.
///
/// The TUI is divided into three vertical sections:
/// - Header (3 lines): title, log source and summary counts
/// - Table (fills remaining): the session table
/// - Footer (3 lines): keybinding help
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    pub table: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let [header, table, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Table
                Constraint::Length(3), // Footer
            ])
            .areas(area);

        Self {
            header,
            table,
            footer,
        }
    }
}
