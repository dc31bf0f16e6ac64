//! vodtop Parse - Access-log record parsing
//!
//! This crate turns raw access-log lines into typed `EventRecord`s and
//! reduces asset paths to short video identifiers. Every downstream
//! component consumes these typed fields and never re-reads raw text.

pub mod columns;
pub mod error;
pub mod parse;
pub mod video;

pub use columns::ColumnLayout;
pub use error::ParseError;
pub use parse::LineParser;
pub use video::{VideoNormalizer, DEFAULT_VIDEO_ROOT};
