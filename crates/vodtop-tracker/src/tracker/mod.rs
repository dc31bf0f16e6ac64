//! Session tracking engine.
//!
//! The engine turns an unordered, lossy stream of access-log events into a
//! consistent per-session history.
//!
//! # Pipeline
//!
//! ```text
//! line ──▶ LineParser ──▶ reconcile ──▶ SessionStore::put ──▶ validate
//!             │               │                                  │
//!             ▼               ▼                                  ▼
//!       VideoNormalizer  DurationLedger                  purge + redraw
//!
//! sweep ──▶ evict idle / disconnected ──▶ ColorAllocator::release
//! table ──▶ ColorAllocator::assign ──▶ SessionTable
//! ```
//!
//! # Invariants
//!
//! - At most one unresolved `connect` per key; a second one is suppressed
//!   without touching history or last-active time.
//! - A session's first video name is never overwritten.
//! - The ledger carries connected time across connect/disconnect cycles
//!   until the key is evicted.

mod colors;
mod engine;
mod ledger;
mod outcome;
mod reconcile;
mod store;
mod sweep;

pub use colors::{ColorAllocator, ColorSlot};
pub use engine::SessionTracker;
pub use ledger::{DurationLedger, LedgerEntry};
pub use outcome::{DiscardReason, Eviction, EvictionReason, IngestOutcome};
pub use reconcile::{reconcile, Commit, Reconciliation};
pub use store::SessionStore;
pub use sweep::find_stale;
