//! JSON snapshot of the session store.
//!
//! Written periodically when diagnostics are enabled so the full state can
//! be inspected outside the terminal UI. The file is replaced atomically.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use vodtop_core::SessionHistory;

use crate::tracker::{ColorAllocator, ColorSlot, DurationLedger, LedgerEntry, SessionStore};

#[derive(Debug, Clone, Serialize)]
pub struct SessionDump {
    pub version: &'static str,
    pub generated_at: Option<DateTime<Utc>>,
    pub session_count: usize,
    pub sessions: Vec<SessionSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// `"<address> <client_id>"`.
    pub key: String,
    pub last_active: f64,
    pub idle_secs: f64,
    pub history: SessionHistory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger: Option<LedgerEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSlot>,
}

impl SessionDump {
    /// Captures every tracked session in key order.
    pub fn capture(
        store: &SessionStore,
        ledger: &DurationLedger,
        colors: &ColorAllocator,
        now: f64,
    ) -> Self {
        let sessions: Vec<SessionSnapshot> = store
            .iter()
            .map(|(key, history, last_active)| SessionSnapshot {
                key: key.to_string(),
                last_active,
                idle_secs: now - last_active,
                history: history.clone(),
                ledger: ledger.get(key).copied(),
                color: colors.slot_for(&key.address),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION"),
            generated_at: DateTime::from_timestamp_millis((now * 1000.0) as i64),
            session_count: sessions.len(),
            sessions,
        }
    }
}

/// Writes the dump as pretty JSON, replacing `path` atomically.
pub fn write_dump(path: &Path, dump: &SessionDump) -> io::Result<()> {
    let json = serde_json::to_string_pretty(dump).map_err(io::Error::other)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)
}
