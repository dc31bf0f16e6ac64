//! Column positions of the fields we read from each access-log record.
//!
//! Records are whitespace-delimited. The positions are a contract with the
//! server's log layout and can be overridden from the settings file.

use serde::Deserialize;

/// Zero-based column indices for each extracted field.
///
/// Defaults follow the stock access-log field order:
///
/// ```text
/// 0 date  1 time  2 tz  3 event  ...  7 context(asset)  ...  12 duration
/// ...  16 client-ip  ...  20 client-id
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnLayout {
    pub kind: usize,
    pub asset_path: usize,
    pub duration: usize,
    pub address: usize,
    pub client_id: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            kind: 3,
            asset_path: 7,
            duration: 12,
            address: 16,
            client_id: 20,
        }
    }
}

/// Marker the server writes for an empty column.
pub const EMPTY_MARKER: &str = "-";

/// Whitespace-split view over one record.
#[derive(Debug)]
pub(crate) struct Columns<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Columns<'a> {
    pub(crate) fn split(line: &'a str) -> Self {
        Self {
            fields: line.split_whitespace().collect(),
        }
    }

    /// Value at `index`, or `None` past the end of the record or for the
    /// empty marker.
    pub(crate) fn get(&self, index: usize) -> Option<&'a str> {
        self.fields
            .get(index)
            .copied()
            .filter(|value| *value != EMPTY_MARKER)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.fields.iter().copied()
    }
}
