//! Reduces asset paths to short video identifiers for display.
//!
//! `vod/showA/ep1.mp4` becomes `showA/ep1`; `vod/trailer.mp4` becomes
//! `trailer`. Paths outside the video root are not videos.

use vodtop_core::EventKind;

/// Default asset root that marks a path as a video reference.
pub const DEFAULT_VIDEO_ROOT: &str = "vod/";

/// Video-name normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoNormalizer {
    root: String,
    width: usize,
}

impl VideoNormalizer {
    /// `width` is the display column width the result is truncated to.
    pub fn new(root: impl Into<String>, width: usize) -> Self {
        Self {
            root: root.into(),
            width,
        }
    }

    /// Returns the display identifier for an event's asset path.
    ///
    /// Yields `None` for connect/disconnect events, for missing paths, and
    /// for paths outside the video root.
    pub fn normalize(&self, kind: &EventKind, path: Option<&str>) -> Option<String> {
        if !kind.carries_video() {
            return None;
        }
        let rest = path?.strip_prefix(self.root.as_str())?;

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let name = match segments.next() {
            Some(second) => format!("{first}/{}", stem(second)),
            None => stem(first).to_string(),
        };

        let truncated: String = name.chars().take(self.width).collect();
        if truncated.is_empty() {
            None
        } else {
            Some(truncated)
        }
    }
}

impl Default for VideoNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_ROOT, 20)
    }
}

/// File name without its extension. Dotfiles keep their name.
fn stem(segment: &str) -> &str {
    match segment.rfind('.') {
        Some(0) | None => segment,
        Some(dot) => segment.get(..dot).unwrap_or(segment),
    }
}
