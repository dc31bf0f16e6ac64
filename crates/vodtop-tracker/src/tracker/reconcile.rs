//! Decides the value to commit for each event.
//!
//! Pure: takes the key's current history and ledger entry, returns a
//! decision. The engine applies it.

use tracing::warn;

use vodtop_core::{DurationValue, EventKind, SessionHistory};

use super::LedgerEntry;

/// Reconciler decision for one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    Commit(Commit),
    /// Duplicate `connect` while one is unresolved.
    Suppress,
}

/// Value to commit, plus side results for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub value: DurationValue,
    /// For `disconnect`: the gap of this cycle alone, before the ledger
    /// total is added.
    pub elapsed: Option<f64>,
    /// For `disconnect`: the ledger entry that replaces the key's entry.
    pub ledger: Option<LedgerEntry>,
    /// Raw duration that could not be read as a non-negative number.
    pub anomaly: Option<String>,
}

impl Commit {
    fn value(value: DurationValue) -> Self {
        Self {
            value,
            elapsed: None,
            ledger: None,
            anomaly: None,
        }
    }
}

/// Computes what to commit for `kind` at `now`.
///
/// - `connect` commits `now` as the connect moment, or is suppressed if the
///   key already has an unresolved connect.
/// - `disconnect` measures from the latest connect moment, falling back to
///   the latest disconnect value, then the latest value of any kind, then
///   zero; the prior ledger total is added on top.
/// - Everything else commits the raw duration if it is a non-negative
///   number, otherwise an anomalous (zero) value.
pub fn reconcile(
    kind: &EventKind,
    history: Option<&SessionHistory>,
    prior: Option<&LedgerEntry>,
    now: f64,
    raw_duration: Option<&str>,
) -> Reconciliation {
    match kind {
        EventKind::Connect => {
            if history.is_some_and(SessionHistory::has_unresolved_connect) {
                Reconciliation::Suppress
            } else {
                Reconciliation::Commit(Commit::value(DurationValue::Seconds(now)))
            }
        }
        EventKind::Disconnect => Reconciliation::Commit(disconnect(history, prior, now)),
        _ => Reconciliation::Commit(reported_duration(raw_duration)),
    }
}

fn disconnect(history: Option<&SessionHistory>, prior: Option<&LedgerEntry>, now: f64) -> Commit {
    let elapsed = history
        .and_then(|h| {
            h.latest(&EventKind::Connect)
                .map(|moment| now - moment.as_seconds())
                .or_else(|| h.latest(&EventKind::Disconnect).map(|v| v.as_seconds()))
                .or_else(|| h.latest_entry().map(|e| e.value.as_seconds()))
        })
        .unwrap_or(0.0);

    let total = match prior {
        Some(entry) if elapsed.is_finite() && entry.total.is_finite() => elapsed + entry.total,
        Some(entry) => {
            warn!(
                elapsed,
                prior_total = entry.total,
                "non-numeric ledger operand, keeping elapsed unadjusted"
            );
            elapsed
        }
        None => elapsed,
    };

    Commit {
        value: DurationValue::Seconds(total),
        elapsed: Some(elapsed),
        ledger: Some(LedgerEntry {
            total,
            last_disconnect: now,
        }),
        anomaly: None,
    }
}

fn reported_duration(raw: Option<&str>) -> Commit {
    let parsed = raw.and_then(parse_seconds);

    match parsed {
        Some(secs) => Commit::value(DurationValue::Seconds(secs)),
        None => Commit {
            anomaly: Some(raw.unwrap_or("-").to_string()),
            ..Commit::value(DurationValue::Anomalous)
        },
    }
}

/// Accepts plain `123` or `123.45`; signs, exponents and `inf` are not
/// durations.
fn parse_seconds(raw: &str) -> Option<f64> {
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (raw, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !fraction.map_or(true, digits) {
        return None;
    }
    raw.parse().ok()
}
