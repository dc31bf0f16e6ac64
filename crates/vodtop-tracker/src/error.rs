//! Errors from following the access log.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Log-source errors.
///
/// `Open` and `NotAFile` happen at startup and are fatal to the caller.
/// Mid-run I/O errors are logged by the follower and retried.
#[derive(Error, Debug)]
pub enum TailError {
    /// The log file could not be opened.
    #[error("Cannot open log source {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path exists but is not a regular file.
    #[error("Log source {} is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    /// I/O error while reading.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
