//! vodtop TUI - Library modules
//!
//! This library provides the terminal front end for the session table.
//!
//! # Architecture
//!
//! The binary drives an event loop with three sources:
//!
//! 1. **Log follower task**: tails the access log and sends complete lines
//! 2. **Keyboard task**: polls for keyboard input and terminal resizes
//! 3. **Refresh timer**: only in `RefreshMode::Timer`
//!
//! All session state lives in [`App`], owned by the event loop itself, so
//! every render reads a consistent snapshot. All tasks respect a shared
//! `CancellationToken` for shutdown.

pub mod app;
pub mod error;
pub mod input;
pub mod settings;
pub mod ui;

// Re-export commonly used types
pub use app::{App, RenderDecision};
pub use error::{Result, TuiError};
pub use settings::{CliOverrides, RefreshMode, Settings, SettingsFile};
