//! Tracker settings. Static for the life of the process.

use std::collections::HashSet;
use std::time::Duration;

use vodtop_parse::{ColumnLayout, DEFAULT_VIDEO_ROOT};

/// Default idle time after which any session is evicted.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(600);

/// Default idle time after a `disconnect` before the session is evicted.
pub const DEFAULT_DISCONNECT_GRACE: Duration = Duration::from_secs(60);

/// Default number of distinct highlight colours.
pub const DEFAULT_PALETTE_SIZE: usize = 6;

/// Default width of the client/video display column.
pub const DEFAULT_DISPLAY_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Column positions in each access-log record.
    pub columns: ColumnLayout,
    /// Asset path prefix that marks a video reference.
    pub video_root: String,
    /// Video names are truncated to this many characters.
    pub video_width: usize,
    /// Evict any session idle for longer than this.
    pub idle_threshold: Duration,
    /// Evict a disconnected session idle for longer than this.
    pub disconnect_grace: Duration,
    /// Source addresses whose lines are dropped before tracking.
    pub ignore_addresses: HashSet<String>,
    /// Size of the highlight palette the colour allocator cycles through.
    pub palette_size: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            columns: ColumnLayout::default(),
            video_root: DEFAULT_VIDEO_ROOT.to_string(),
            video_width: DEFAULT_DISPLAY_WIDTH,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            disconnect_grace: DEFAULT_DISCONNECT_GRACE,
            ignore_addresses: HashSet::new(),
            palette_size: DEFAULT_PALETTE_SIZE,
        }
    }
}
