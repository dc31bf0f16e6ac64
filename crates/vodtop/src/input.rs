//! Keyboard input handling for the vodtop TUI.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

// ============================================================================
// Event Types
// ============================================================================

/// Terminal events forwarded by the keyboard task.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input from the user.
    Key(KeyEvent),

    /// Terminal window resize event.
    Resize(u16, u16),
}

// ============================================================================
// Action Types
// ============================================================================

/// What the main loop should do in response to user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No action required.
    None,

    /// Quit the application.
    Quit,

    /// Clear and redraw the whole screen.
    Redraw,
}

// ============================================================================
// Input Handler
// ============================================================================

/// Handles a keyboard event and updates application state accordingly.
///
/// # Key Bindings
///
/// | Key          | Action                              |
/// |--------------|-------------------------------------|
/// | `q`, `Q`     | Quit the application                |
/// | `Esc`        | Quit the application                |
/// | `Ctrl+C`     | Quit the application                |
/// | `r`, `R`     | Full redraw                         |
#[must_use]
pub fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    // Raw mode swallows SIGINT, so Ctrl+C arrives as a key.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.quit();
            Action::Quit
        }

        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.request_redraw();
            Action::Redraw
        }

        _ => Action::None,
    }
}

// ============================================================================
// Tests
// ============================================================================
