//! Per-session event history.
//!
//! A session's history is an ordered list of `(kind, value)` entries plus
//! the first video name ever seen for it. Kinds may repeat (a viewer can
//! seek many times); readers usually want the latest entry of a kind.

use serde::{Deserialize, Serialize};

use crate::EventKind;

// ============================================================================
// Duration Values
// ============================================================================

/// The value committed for one event.
///
/// For `connect` this is the connect moment (epoch seconds), for
/// `disconnect` the cumulative connected time, and for every other kind
/// the duration reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationValue {
    Seconds(f64),
    /// The log carried a duration that was not a non-negative number.
    /// Counts as zero in arithmetic.
    Anomalous,
}

impl DurationValue {
    /// Numeric view of the value; anomalous values read as zero.
    #[must_use]
    pub fn as_seconds(&self) -> f64 {
        match self {
            Self::Seconds(secs) => *secs,
            Self::Anomalous => 0.0,
        }
    }

    #[must_use]
    pub fn is_anomalous(&self) -> bool {
        matches!(self, Self::Anomalous)
    }
}

/// One committed event in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: EventKind,
    pub value: DurationValue,
}

// ============================================================================
// Video Consistency
// ============================================================================

/// Result of comparing an event's video against the session's first video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoCheck {
    /// No video was stored yet; this one will become the first.
    NewlyAssigned,
    /// Same as the stored first video.
    Matches,
    /// Differs from the stored first video, which is kept.
    Mismatch { stored: String },
}

// ============================================================================
// Session History
// ============================================================================

/// Accumulated history for one session key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    first_video: Option<String>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, kind: EventKind, value: DurationValue) {
        self.entries.push(HistoryEntry { kind, value });
    }

    /// Sets the first video name unless one is already stored.
    ///
    /// Returns true if the name was stored.
    pub fn set_first_video_if_absent(&mut self, name: &str) -> bool {
        if self.first_video.is_some() || name.is_empty() {
            return false;
        }
        self.first_video = Some(name.to_string());
        true
    }

    pub fn first_video(&self) -> Option<&str> {
        self.first_video.as_deref()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest value committed for `kind`.
    pub fn latest(&self, kind: &EventKind) -> Option<DurationValue> {
        self.entries
            .iter()
            .rev()
            .find(|e| &e.kind == kind)
            .map(|e| e.value)
    }

    /// Most recently committed entry of any kind.
    pub fn latest_entry(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn contains(&self, kind: &EventKind) -> bool {
        self.entries.iter().any(|e| &e.kind == kind)
    }

    /// True if the latest connection-level entry is a `connect`, i.e. no
    /// `disconnect` has been recorded since the last connect.
    #[must_use]
    pub fn has_unresolved_connect(&self) -> bool {
        self.entries
            .iter()
            .rev()
            .find(|e| matches!(e.kind, EventKind::Connect | EventKind::Disconnect))
            .is_some_and(|e| e.kind == EventKind::Connect)
    }

    /// Classifies `name` against the stored first video. Never mutates.
    pub fn check_video(&self, name: &str) -> VideoCheck {
        match &self.first_video {
            None => VideoCheck::NewlyAssigned,
            Some(stored) if stored == name => VideoCheck::Matches,
            Some(stored) => VideoCheck::Mismatch {
                stored: stored.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_returns_most_recent_repeat() {
        let mut history = SessionHistory::new();
        history.push(EventKind::Seek, DurationValue::Seconds(1.0));
        history.push(EventKind::Play, DurationValue::Seconds(2.0));
        history.push(EventKind::Seek, DurationValue::Seconds(3.5));

        assert_eq!(
            history.latest(&EventKind::Seek),
            Some(DurationValue::Seconds(3.5))
        );
        assert_eq!(history.latest(&EventKind::Stop), None);
        assert_eq!(history.entries().len(), 3);
    }

    #[test]
    fn test_first_video_is_never_overwritten() {
        let mut history = SessionHistory::new();
        assert!(history.set_first_video_if_absent("showA/ep1"));
        assert!(!history.set_first_video_if_absent("showB/ep1"));
        assert_eq!(history.first_video(), Some("showA/ep1"));
    }

    #[test]
    fn test_empty_video_name_is_not_stored() {
        let mut history = SessionHistory::new();
        assert!(!history.set_first_video_if_absent(""));
        assert_eq!(history.first_video(), None);
    }

    #[test]
    fn test_unresolved_connect_tracking() {
        let mut history = SessionHistory::new();
        assert!(!history.has_unresolved_connect());

        history.push(EventKind::Connect, DurationValue::Seconds(100.0));
        assert!(history.has_unresolved_connect());

        history.push(EventKind::Play, DurationValue::Seconds(5.0));
        assert!(history.has_unresolved_connect());

        history.push(EventKind::Disconnect, DurationValue::Seconds(60.0));
        assert!(!history.has_unresolved_connect());
    }

    #[test]
    fn test_check_video_classification() {
        let mut history = SessionHistory::new();
        assert_eq!(history.check_video("a/b"), VideoCheck::NewlyAssigned);

        history.set_first_video_if_absent("a/b");
        assert_eq!(history.check_video("a/b"), VideoCheck::Matches);
        assert_eq!(
            history.check_video("c/d"),
            VideoCheck::Mismatch {
                stored: "a/b".to_string()
            }
        );
    }

    #[test]
    fn test_anomalous_counts_as_zero() {
        assert_eq!(DurationValue::Anomalous.as_seconds(), 0.0);
        assert!(DurationValue::Anomalous.is_anomalous());
        assert!(!DurationValue::Seconds(1.0).is_anomalous());
    }
}
