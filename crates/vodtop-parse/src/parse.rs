//! Access-log line parser.
//!
//! Fields are read positionally according to a `ColumnLayout`. A column
//! past the end of the record is a missing value, never an error. A line is
//! rejected only when the event kind, the source address or the client id
//! cannot be resolved.
//!
//! The client id has two extraction tiers because not every server version
//! writes it in the same column:
//!
//! 1. the configured client-id column, if it holds a 5-10 digit number;
//! 2. otherwise the first 5-10 digit token anywhere on the line, but only
//!    for records whose first two columns are a date and a time.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use vodtop_core::{is_client_id, EventKind, EventRecord};

use crate::columns::{ColumnLayout, Columns};
use crate::ParseError;

static DATE_COLUMN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok());

static TIME_COLUMN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}(\.\d+)?$").ok());

/// Parses raw access-log lines into event records.
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    layout: ColumnLayout,
}

impl LineParser {
    pub fn new(layout: ColumnLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Parses one line.
    ///
    /// `comment` records are returned even when they lack an address or a
    /// client id (those fields are then empty) so the caller can discard
    /// them explicitly.
    ///
    /// # Errors
    ///
    /// See [`ParseError`]; every variant means "drop this line".
    pub fn parse(&self, line: &str) -> Result<EventRecord, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Err(ParseError::NotARecord);
        }

        let cols = Columns::split(trimmed);

        let kind = cols
            .get(self.layout.kind)
            .map(EventKind::from_token)
            .ok_or(ParseError::MissingKind {
                column: self.layout.kind,
            })?;

        let video_path = cols.get(self.layout.asset_path).map(str::to_string);
        let raw_duration = cols.get(self.layout.duration).map(str::to_string);

        if kind == EventKind::Comment {
            return Ok(EventRecord {
                kind,
                address: cols.get(self.layout.address).unwrap_or_default().to_string(),
                client_id: self.client_id(&cols).unwrap_or_default().to_string(),
                video_path,
                raw_duration,
            });
        }

        let address = cols
            .get(self.layout.address)
            .ok_or(ParseError::MissingAddress {
                column: self.layout.address,
            })?;

        let client_id = self.client_id(&cols).ok_or(ParseError::MissingClientId {
            column: self.layout.client_id,
        })?;

        Ok(EventRecord {
            kind,
            address: address.to_string(),
            client_id: client_id.to_string(),
            video_path,
            raw_duration,
        })
    }

    fn client_id<'a>(&self, cols: &Columns<'a>) -> Option<&'a str> {
        if let Some(id) = cols.get(self.layout.client_id).filter(|id| is_client_id(id)) {
            return Some(id);
        }

        if !starts_with_timestamp(cols) {
            return None;
        }

        let fallback = cols.iter().skip(2).find(|token| is_client_id(token));
        if let Some(id) = fallback {
            trace!(client_id = id, "client id taken from fallback scan");
        }
        fallback
    }
}

fn starts_with_timestamp(cols: &Columns<'_>) -> bool {
    let (Some(date_re), Some(time_re)) = (DATE_COLUMN.as_ref(), TIME_COLUMN.as_ref()) else {
        return false;
    };
    matches!(
        (cols.get(0), cols.get(1)),
        (Some(date), Some(time)) if date_re.is_match(date) && time_re.is_match(time)
    )
}
