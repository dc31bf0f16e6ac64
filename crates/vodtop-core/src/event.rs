//! Access-log event kinds and parsed event records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SessionKey;

/// Lifecycle event kind from the access log's event column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EventKind {
    Connect,
    Create,
    Play,
    Seek,
    Stop,
    Destroy,
    Disconnect,
    /// Server comment lines; discarded before any state mutation.
    Comment,
    /// Any other event name, kept verbatim.
    Other(String),
}

/// Kinds that get a duration column in the session table, in display order.
pub const DISPLAY_KINDS: [EventKind; 6] = [
    EventKind::Create,
    EventKind::Play,
    EventKind::Seek,
    EventKind::Stop,
    EventKind::Destroy,
    EventKind::Disconnect,
];

impl EventKind {
    /// Parses an event column token. Matching is case-insensitive.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "connect" => Self::Connect,
            "create" => Self::Create,
            "play" => Self::Play,
            "seek" => Self::Seek,
            "stop" => Self::Stop,
            "destroy" => Self::Destroy,
            "disconnect" => Self::Disconnect,
            "comment" => Self::Comment,
            _ => Self::Other(token.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Connect => "connect",
            Self::Create => "create",
            Self::Play => "play",
            Self::Seek => "seek",
            Self::Stop => "stop",
            Self::Destroy => "destroy",
            Self::Disconnect => "disconnect",
            Self::Comment => "comment",
            Self::Other(name) => name,
        }
    }

    /// Returns true for kinds whose asset column names a video.
    ///
    /// Connection-level events never carry asset information.
    #[must_use]
    pub fn carries_video(&self) -> bool {
        !matches!(self, Self::Connect | Self::Disconnect)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        Self::from_token(&s)
    }
}

/// One parsed access-log record.
///
/// `video_path` and `raw_duration` are `None` when the line has fewer
/// columns than the configured index, or the column holds the `-` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub address: String,
    pub client_id: String,
    pub video_path: Option<String>,
    pub raw_duration: Option<String>,
}

impl EventRecord {
    #[must_use]
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.address.clone(), self.client_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_known_kinds() {
        assert_eq!(EventKind::from_token("connect"), EventKind::Connect);
        assert_eq!(EventKind::from_token("DISCONNECT"), EventKind::Disconnect);
        assert_eq!(EventKind::from_token("comment"), EventKind::Comment);
    }

    #[test]
    fn test_from_token_other_keeps_name() {
        let kind = EventKind::from_token("unpublish");
        assert_eq!(kind, EventKind::Other("unpublish".to_string()));
        assert_eq!(kind.as_str(), "unpublish");
    }

    #[test]
    fn test_carries_video() {
        assert!(!EventKind::Connect.carries_video());
        assert!(!EventKind::Disconnect.carries_video());
        assert!(EventKind::Create.carries_video());
        assert!(EventKind::Seek.carries_video());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&EventKind::Seek).unwrap();
        assert_eq!(json, "\"seek\"");
    }
}
