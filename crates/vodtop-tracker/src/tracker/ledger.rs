//! Cumulative connected-time ledger.
//!
//! A session is not removed when it disconnects, so a viewer may connect
//! and disconnect several times under the same key. The ledger carries the
//! running total of connected time from one cycle to the next.

use std::collections::HashMap;

use serde::Serialize;
use vodtop_core::SessionKey;

/// Running total for one key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// Connected seconds summed over every completed cycle.
    pub total: f64,
    /// Epoch seconds of the disconnect that produced `total`.
    pub last_disconnect: f64,
}

#[derive(Debug, Default)]
pub struct DurationLedger {
    entries: HashMap<SessionKey, LedgerEntry>,
}

impl DurationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SessionKey) -> Option<&LedgerEntry> {
        self.entries.get(key)
    }

    /// Stores `entry`, superseding any previous entry for the key.
    pub fn record(&mut self, key: SessionKey, entry: LedgerEntry) {
        self.entries.insert(key, entry);
    }

    pub fn remove(&mut self, key: &SessionKey) -> Option<LedgerEntry> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
