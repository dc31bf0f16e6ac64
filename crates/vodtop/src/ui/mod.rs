//! UI rendering module for the vodtop TUI.
//!
//! # Layout Structure
//!
//! ```text
//! +--------------------------------------------------+
//! |  Header: title, log, counts, modes               |  <- 3 lines
//! +--------------------------------------------------+
//! | address  client  create  play ... disconnect     |
//! | 10.0.0.5 55555      0.5   12.0         60.0      |  <- fills remaining
//! | ...                                              |
//! +--------------------------------------------------+
//! |  Footer: Keybinding Hints                        |  <- 3 lines
//! +--------------------------------------------------+
//! ```
//!
//! Rendering only reads `App`; the table itself is rebuilt by
//! `App::prepare_render` before each draw.

pub mod layout;
pub mod session_table;
pub mod status_bar;
pub mod theme;

use crate::app::App;
use layout::AppLayout;
use ratatui::Frame;

pub use session_table::render_session_table;
pub use status_bar::{render_footer, render_header};

/// Renders the complete TUI interface.
///
/// ```ignore
/// if app.prepare_render(now).should_draw() {
///     terminal.draw(|frame| ui::render(frame, &app))?;
/// }
/// ```
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    render_header(frame, layout.header, app);
    render_session_table(frame, layout.table, app);
    render_footer(frame, layout.footer, app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app, line};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_render_empty_state() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = app();

        terminal.draw(|frame| render(frame, &app)).unwrap();
    }

    #[test]
    fn test_render_with_sessions() {
        let backend = TestBackend::new(120, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = app();
        app.on_line(&line("connect", "10.0.0.5", "55555"), 100.0);
        app.on_line(&line("disconnect", "10.0.0.5", "55555"), 160.0);
        app.prepare_render(160.0);

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..120u16)
            .map(|x| buffer[(x, 5)].symbol().to_string())
            .collect();
        assert!(row.contains("10.0.0.5"));
        assert!(row.contains("60.0"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let backend = TestBackend::new(10, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = app();
        app.on_line(&line("play", "10.0.0.5", "55555"), 0.0);
        app.prepare_render(0.0);

        terminal.draw(|frame| render(frame, &app)).unwrap();
    }
}
