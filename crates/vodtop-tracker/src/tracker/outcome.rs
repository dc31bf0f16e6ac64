//! Results reported by the tracker for each line and each sweep.

use std::fmt;

use vodtop_core::{DomainError, EventKind, SessionKey};
use vodtop_parse::ParseError;

// ============================================================================
// Ingest Outcome
// ============================================================================

/// What happened to one log line.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The event was committed to the session's history.
    Committed { key: SessionKey, kind: EventKind },

    /// Duplicate `connect` while one is unresolved. No state changed.
    Suppressed { key: SessionKey },

    /// The line never reached the store.
    Discarded(DiscardReason),

    /// The event was committed but the key failed validation, so all of
    /// its state was purged.
    Purged { key: SessionKey, error: DomainError },
}

impl IngestOutcome {
    /// Returns true if tracked state changed in any way.
    #[must_use]
    pub fn mutated(&self) -> bool {
        matches!(self, Self::Committed { .. } | Self::Purged { .. })
    }
}

/// Why a line was dropped before any state mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// The parser rejected the line.
    Unparseable(ParseError),
    /// Server `comment` record.
    Comment,
    /// The source address is on the ignore list.
    IgnoredAddress(String),
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable(err) => write!(f, "unparseable: {err}"),
            Self::Comment => write!(f, "comment"),
            Self::IgnoredAddress(addr) => write!(f, "ignored address {addr}"),
        }
    }
}

// ============================================================================
// Eviction
// ============================================================================

/// Reason a session was removed by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// No accepted event for longer than the idle threshold.
    Idle,
    /// Disconnected and not refreshed within the grace period.
    DisconnectGrace,
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::DisconnectGrace => write!(f, "disconnect_grace"),
        }
    }
}

/// One session removed by a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Eviction {
    pub key: SessionKey,
    pub reason: EvictionReason,
    /// Seconds since the session's last accepted event.
    pub idle_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction_reason_display() {
        assert_eq!(EvictionReason::Idle.to_string(), "idle");
        assert_eq!(
            EvictionReason::DisconnectGrace.to_string(),
            "disconnect_grace"
        );
    }

    #[test]
    fn test_only_commits_and_purges_mutate() {
        let key = SessionKey::new("10.0.0.5", "55555");
        assert!(IngestOutcome::Committed {
            key: key.clone(),
            kind: EventKind::Play
        }
        .mutated());
        assert!(!IngestOutcome::Suppressed { key }.mutated());
        assert!(!IngestOutcome::Discarded(DiscardReason::Comment).mutated());
    }
}
