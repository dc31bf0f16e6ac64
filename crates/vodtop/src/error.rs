//! Error types for the vodtop TUI.
//!
//! This module defines front-end errors: terminal setup and teardown,
//! settings resolution, and opening the log source.
//!
//! All error types use `thiserror` for derive macros and provide clear,
//! user-friendly error messages.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vodtop_tracker::TailError;

// ============================================================================
// TUI Error Type
// ============================================================================

/// TUI application errors.
///
/// Everything here except the terminal variants is raised before the
/// terminal enters the alternate screen, so the message reaches the user
/// on stderr.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Failed to initialize the terminal.
    ///
    /// Common causes include running in a non-TTY environment (pipes,
    /// scripts) or an unsupported terminal emulator.
    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    /// Failed to cleanup/restore the terminal.
    ///
    /// The terminal may be left in an inconsistent state; running `reset`
    /// can help recover.
    #[error("Failed to restore terminal: {0}")]
    TerminalCleanup(String),

    /// The resolved settings are unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The settings file could not be read.
    #[error("Failed to read settings file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file is not valid TOML or has unknown keys.
    #[error("Invalid settings file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The access log could not be opened.
    #[error(transparent)]
    LogSource(#[from] TailError),

    /// I/O error passthrough.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Convenience Result type alias for TUI operations.
pub type Result<T> = std::result::Result<T, TuiError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_init_error_display() {
        let error = TuiError::TerminalInit("not a TTY".to_string());
        let display = format!("{error}");
        assert!(display.contains("Failed to initialize terminal"));
        assert!(display.contains("not a TTY"));
    }

    #[test]
    fn test_terminal_cleanup_error_display() {
        let error = TuiError::TerminalCleanup("could not restore cursor".to_string());
        let display = format!("{error}");
        assert!(display.contains("Failed to restore terminal"));
        assert!(display.contains("could not restore cursor"));
    }

    #[test]
    fn test_config_error_display() {
        let error = TuiError::Config("no access log given".to_string());
        assert_eq!(
            format!("{error}"),
            "Configuration error: no access log given"
        );
    }

    #[test]
    fn test_config_parse_error_names_file() {
        let source = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = TuiError::ConfigParse {
            path: PathBuf::from("/etc/vodtop.toml"),
            source,
        };
        assert!(format!("{error}").contains("/etc/vodtop.toml"));
    }

    #[test]
    fn test_log_source_error_is_transparent() {
        let tail = TailError::NotAFile {
            path: PathBuf::from("/var/log"),
        };
        let expected = format!("{tail}");
        let error: TuiError = tail.into();
        assert_eq!(format!("{error}"), expected);
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "gone");
        let tui_error: TuiError = io_error.into();
        assert!(matches!(tui_error, TuiError::Io(_)));
        assert!(format!("{tui_error}").contains("IO error"));
    }
}
