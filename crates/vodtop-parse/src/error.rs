//! Reasons a log line could not become an event record.

use thiserror::Error;

/// Why a line was discarded by the parser.
///
/// None of these are fatal: the line is dropped and the stream continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line or a `#`-prefixed header directive.
    #[error("not an event record")]
    NotARecord,

    /// Event column missing or empty
    #[error("missing event kind (column {column})")]
    MissingKind { column: usize },

    /// Source address column missing or empty
    #[error("missing source address (column {column})")]
    MissingAddress { column: usize },

    /// Neither the client-id column nor a fallback token held a 5-10 digit id
    #[error("no client id in column {column} or elsewhere on the line")]
    MissingClientId { column: usize },
}
