//! vodtop Core - Shared types for streaming session monitoring
//!
//! This crate provides the domain types shared between the log parser,
//! the session tracker and the terminal front end.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod clock;
pub mod error;
pub mod event;
pub mod history;
pub mod key;

// Re-exports for convenience
pub use clock::{epoch_seconds, now_seconds};
pub use error::{DomainError, DomainResult};
pub use event::{EventKind, EventRecord, DISPLAY_KINDS};
pub use history::{DurationValue, HistoryEntry, SessionHistory, VideoCheck};
pub use key::{is_client_id, is_dotted_quad, SessionKey};
