//! Session table layout.
//!
//! Produces the text of every row from a store snapshot: sorted by session
//! key, one right-aligned duration cell per displayed event kind, and an
//! optional colour slot for addresses with concurrent sessions. Drawing the
//! rows is the front end's job.

use serde::Deserialize;

use vodtop_core::{DurationValue, SessionHistory, SessionKey, DISPLAY_KINDS};

use crate::config::DEFAULT_DISPLAY_WIDTH;
use crate::tracker::{ColorAllocator, ColorSlot, SessionStore};

/// Shown in place of a duration the log reported as non-numeric.
pub const PLACEHOLDER: char = '?';

/// What the second column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// The session's client id.
    #[default]
    Client,
    /// The first video the session opened.
    Video,
}

impl DisplayMode {
    pub fn column_title(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Video => "video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub address_width: usize,
    pub display_width: usize,
    pub duration_width: usize,
    /// Decimal places for every duration cell.
    pub precision: usize,
    pub mode: DisplayMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            address_width: 15,
            display_width: DEFAULT_DISPLAY_WIDTH,
            duration_width: 10,
            precision: 1,
            mode: DisplayMode::Client,
        }
    }
}

/// One rendered session row.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub key: SessionKey,
    /// Address, display field, then one cell per entry of `DISPLAY_KINDS`.
    pub cells: Vec<String>,
    /// Set only while the address has two or more sessions.
    pub color: Option<ColorSlot>,
}

impl SessionRow {
    /// Cells joined by single spaces.
    pub fn text(&self) -> String {
        self.cells.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionTable {
    pub header: Vec<String>,
    pub rows: Vec<SessionRow>,
    /// Addresses currently showing two or more sessions.
    pub concurrent_addresses: usize,
}

/// Builds the table for the current store contents.
///
/// Addresses seen here with two or more sessions get a colour slot if they
/// do not hold one already.
pub fn build(
    store: &SessionStore,
    colors: &mut ColorAllocator,
    config: &TableConfig,
) -> SessionTable {
    let counts = store.address_counts();
    let concurrent_addresses = counts.values().filter(|n| **n >= 2).count();

    let rows = store
        .iter()
        .map(|(key, history, _)| {
            let concurrent = counts.get(key.address.as_str()).copied().unwrap_or(0) >= 2;
            let color = concurrent.then(|| colors.assign(&key.address));
            SessionRow {
                key: key.clone(),
                cells: row_cells(key, history, config),
                color,
            }
        })
        .collect();

    SessionTable {
        header: header(config),
        rows,
        concurrent_addresses,
    }
}

fn header(config: &TableConfig) -> Vec<String> {
    let mut cells = vec![
        pad("address", config.address_width),
        pad(config.mode.column_title(), config.display_width),
    ];
    cells.extend(
        DISPLAY_KINDS
            .iter()
            .map(|kind| format!("{:>width$}", kind.as_str(), width = config.duration_width)),
    );
    cells
}

fn row_cells(key: &SessionKey, history: &SessionHistory, config: &TableConfig) -> Vec<String> {
    let display = match config.mode {
        DisplayMode::Client => key.client_id.as_str(),
        DisplayMode::Video => history.first_video().unwrap_or_default(),
    };

    let mut cells = vec![
        pad(&key.address, config.address_width),
        pad(display, config.display_width),
    ];
    cells.extend(
        DISPLAY_KINDS
            .iter()
            .map(|kind| format_duration(history.latest(kind), config)),
    );
    cells
}

/// Right-aligns a duration at fixed precision so decimal points line up.
pub fn format_duration(value: Option<DurationValue>, config: &TableConfig) -> String {
    let width = config.duration_width;
    match value {
        None => " ".repeat(width),
        Some(DurationValue::Anomalous) => format!("{:>width$}", PLACEHOLDER),
        Some(DurationValue::Seconds(secs)) => {
            format!("{secs:>width$.prec$}", prec = config.precision)
        }
    }
}

/// Truncates or left-pads to exactly `width` characters.
fn pad(s: &str, width: usize) -> String {
    let truncated: String = s.chars().take(width).collect();
    format!("{truncated:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vodtop_core::EventKind;

    fn store_with(entries: &[(&str, &str, EventKind, DurationValue)]) -> SessionStore {
        let mut store = SessionStore::new();
        for (addr, client, kind, value) in entries {
            store.put(&SessionKey::new(*addr, *client), kind.clone(), *value, None, 0.0);
        }
        store
    }

    #[test]
    fn test_duration_cells_align_on_decimal_point() {
        let config = TableConfig {
            duration_width: 8,
            precision: 2,
            ..TableConfig::default()
        };
        assert_eq!(format_duration(Some(DurationValue::Seconds(1.5)), &config), "    1.50");
        assert_eq!(format_duration(Some(DurationValue::Seconds(123.456)), &config), "  123.46");
        assert_eq!(format_duration(None, &config), "        ");
        assert_eq!(format_duration(Some(DurationValue::Anomalous), &config), "       ?");
    }

    #[test]
    fn test_rows_sorted_by_key_string() {
        let store = store_with(&[
            ("10.0.0.9", "11111", EventKind::Play, DurationValue::Seconds(1.0)),
            ("10.0.0.10", "22222", EventKind::Play, DurationValue::Seconds(1.0)),
        ]);
        let mut colors = ColorAllocator::new(4);
        let table = build(&store, &mut colors, &TableConfig::default());

        let keys: Vec<String> = table.rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["10.0.0.10 22222", "10.0.0.9 11111"]);
    }

    #[test]
    fn test_single_session_address_is_uncolored() {
        let store = store_with(&[(
            "10.0.0.5",
            "55555",
            EventKind::Play,
            DurationValue::Seconds(1.0),
        )]);
        let mut colors = ColorAllocator::new(4);
        let table = build(&store, &mut colors, &TableConfig::default());

        assert_eq!(table.rows[0].color, None);
        assert_eq!(colors.assigned_count(), 0);
        assert_eq!(table.concurrent_addresses, 0);
    }

    #[test]
    fn test_concurrent_address_rows_share_color() {
        let store = store_with(&[
            ("10.0.0.5", "55555", EventKind::Play, DurationValue::Seconds(1.0)),
            ("10.0.0.5", "66666", EventKind::Play, DurationValue::Seconds(1.0)),
            ("10.0.0.6", "77777", EventKind::Play, DurationValue::Seconds(1.0)),
        ]);
        let mut colors = ColorAllocator::new(4);
        let table = build(&store, &mut colors, &TableConfig::default());

        assert!(table.rows[0].color.is_some());
        assert_eq!(table.rows[0].color, table.rows[1].color);
        assert_eq!(table.rows[2].color, None);
        assert_eq!(table.concurrent_addresses, 1);
    }

    #[test]
    fn test_video_mode_shows_first_video() {
        let mut store = SessionStore::new();
        let key = SessionKey::new("10.0.0.5", "55555");
        store.put(&key, EventKind::Create, DurationValue::Seconds(0.5), Some("showA/ep1"), 0.0);

        let config = TableConfig {
            mode: DisplayMode::Video,
            display_width: 12,
            ..TableConfig::default()
        };
        let mut colors = ColorAllocator::new(4);
        let table = build(&store, &mut colors, &config);

        assert_eq!(table.rows[0].cells[1], "showA/ep1   ");
        assert_eq!(table.header[1], "video       ");
    }

    #[test]
    fn test_row_has_cell_per_display_kind() {
        let store = store_with(&[(
            "10.0.0.5",
            "55555",
            EventKind::Seek,
            DurationValue::Seconds(2.0),
        )]);
        let mut colors = ColorAllocator::new(4);
        let config = TableConfig::default();
        let table = build(&store, &mut colors, &config);

        let row = &table.rows[0];
        assert_eq!(row.cells.len(), 2 + DISPLAY_KINDS.len());
        // create, play blank; seek filled
        assert_eq!(row.cells[2].trim(), "");
        assert_eq!(row.cells[4].trim(), "2.0");
    }

    #[test]
    fn test_display_field_truncated() {
        let store = store_with(&[(
            "10.0.0.5",
            "1234567890",
            EventKind::Play,
            DurationValue::Seconds(1.0),
        )]);
        let config = TableConfig {
            display_width: 6,
            ..TableConfig::default()
        };
        let mut colors = ColorAllocator::new(4);
        let table = build(&store, &mut colors, &config);
        assert_eq!(table.rows[0].cells[1], "123456");
    }
}
