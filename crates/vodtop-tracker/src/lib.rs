//! vodtop Tracker - Session state tracking and reconciliation
//!
//! This crate owns everything between a raw access-log line and a rendered
//! table row:
//! - `tracker` - session store, reconciler, duration ledger, eviction sweep
//!   and colour allocation, gathered in one `SessionTracker` state object
//! - `table` - builds the sorted, column-aligned session table
//! - `tail` - follows the access log across truncation and rotation
//! - `dump` - JSON snapshot of the session store for external inspection
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ lines ┌───────────────────────────────────────────┐
//! │ LogFollower  │──────▶│              SessionTracker               │
//! │ (tokio task) │ mpsc  │ parse → reconcile → commit → validate     │
//! └──────────────┘       │ sweep (evict idle / disconnected)         │
//!                        │ table (colour allocation + row layout)    │
//!                        └───────────────────────────────────────────┘
//! ```
//!
//! The tracker is owned by a single task; nothing in it is shared or locked.
//!
//! # Panic-Free Guarantees
//!
//! All production code in this crate follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations return `Result` or `Option`
//! - Channel operations handle closure gracefully

pub mod config;
pub mod dump;
pub mod error;
pub mod table;
pub mod tail;
pub mod tracker;

pub use config::TrackerConfig;
pub use dump::{write_dump, SessionDump, SessionSnapshot};
pub use error::TailError;
pub use table::{DisplayMode, SessionRow, SessionTable, TableConfig};
pub use tail::{LogFollower, StartPosition};
pub use tracker::{
    ColorAllocator, ColorSlot, DiscardReason, DurationLedger, Eviction, EvictionReason,
    IngestOutcome, LedgerEntry, SessionStore, SessionTracker,
};
