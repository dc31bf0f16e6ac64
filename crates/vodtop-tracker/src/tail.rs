//! Follows a continuously appended log file, `tail -F` style.
//!
//! The follower polls the file for new data, emits complete lines over an
//! mpsc channel, and reattaches transparently when the file is truncated or
//! replaced by log rotation. Only opening the file at startup can fail;
//! once running, read errors are logged and retried.
//!
//! # Panic-Free Guarantees
//!
//! No `.unwrap()` / `.expect()`; channel closure and cancellation both end
//! the task quietly.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::TailError;

/// Default delay between polls once the end of the file is reached.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Where reading begins when the follower opens the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPosition {
    /// Replay the whole file first.
    Beginning,
    /// Only lines appended after startup.
    #[default]
    End,
}

pub struct LogFollower {
    path: PathBuf,
    reader: BufReader<File>,
    /// Byte offset of the next unread byte.
    position: u64,
    /// Identity of the open file, used to notice rotation.
    file_id: Option<u64>,
    /// Trailing bytes of a line whose newline has not been written yet.
    pending: Vec<u8>,
    poll_interval: Duration,
}

impl LogFollower {
    /// Opens the log source.
    ///
    /// # Errors
    ///
    /// Returns `TailError::Open` if the file cannot be opened and
    /// `TailError::NotAFile` if the path is not a regular file.
    pub async fn open(path: impl Into<PathBuf>, start: StartPosition) -> Result<Self, TailError> {
        let path = path.into();
        let (reader, file_id) = open_reader(&path).await?;

        let mut follower = Self {
            path,
            reader,
            position: 0,
            file_id,
            pending: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        };

        if start == StartPosition::End {
            follower.position = follower.reader.seek(SeekFrom::End(0)).await?;
        }

        info!(
            path = %follower.path.display(),
            offset = follower.position,
            "following log source"
        );
        Ok(follower)
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Reads the next complete line, if one is available now.
    ///
    /// Returns `Ok(None)` at end of file. A partial trailing line is kept
    /// until its newline arrives. Bytes that are not valid UTF-8 are
    /// replaced rather than dropping the line.
    pub async fn next_line(&mut self) -> Result<Option<String>, TailError> {
        loop {
            let read = match self.reader.read_until(b'\n', &mut self.pending).await {
                Ok(read) => read,
                Err(err) => {
                    self.pending.clear();
                    return Err(err.into());
                }
            };
            if read == 0 {
                return Ok(None);
            }
            self.position += read as u64;

            if self.pending.last() != Some(&b'\n') {
                continue;
            }

            let bytes = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&bytes);
            return Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()));
        }
    }

    /// Detects truncation and rotation after reaching end of file.
    ///
    /// A missing path (rotated away, not yet recreated) keeps the current
    /// handle open.
    async fn reattach_if_replaced(&mut self) -> Result<(), TailError> {
        let meta = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        let current_id = file_identity(&meta);
        if current_id.is_some() && current_id != self.file_id {
            info!(path = %self.path.display(), "log source rotated, reopening");
            let (reader, file_id) = open_reader(&self.path).await?;
            self.reader = reader;
            self.file_id = file_id;
            self.position = 0;
            self.pending.clear();
        } else if meta.len() < self.position {
            info!(path = %self.path.display(), "log source truncated, rewinding");
            self.position = self.reader.seek(SeekFrom::Start(0)).await?;
            self.pending.clear();
        }
        Ok(())
    }

    /// Runs until cancelled or the receiver is dropped.
    pub async fn run(mut self, lines: mpsc::Sender<String>, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                break;
            }

            match self.next_line().await {
                Ok(Some(line)) => {
                    if lines.send(line).await.is_err() {
                        debug!("line channel closed, follower exiting");
                        break;
                    }
                    continue;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, path = %self.path.display(), "read failed, will retry");
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            if let Err(err) = self.reattach_if_replaced().await {
                warn!(error = %err, path = %self.path.display(), "reattach failed, will retry");
            }
        }
        debug!("log follower stopped");
    }

    /// Spawns `run` on the current runtime.
    pub fn spawn(
        self,
        lines: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(lines, cancel))
    }
}

async fn open_reader(path: &Path) -> Result<(BufReader<File>, Option<u64>), TailError> {
    let file = File::open(path).await.map_err(|source| TailError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let meta = file.metadata().await.map_err(|source| TailError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(TailError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok((BufReader::new(file), file_identity(&meta)))
}

#[cfg(unix)]
fn file_identity(meta: &std::fs::Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.ino())
}

#[cfg(not(unix))]
fn file_identity(_meta: &std::fs::Metadata) -> Option<u64> {
    None
}
