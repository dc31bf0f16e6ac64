//! Decisions that only surface through the diagnostic log.

use std::io;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use vodtop_core::SessionKey;
use vodtop_tracker::{SessionTracker, TrackerConfig};

/// In-memory sink for formatted log records.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with every record at trace level and above written to a buffer.
fn logged(f: impl FnOnce()) -> String {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.text()
}

fn line(kind: &str, asset: &str, duration: &str) -> String {
    format!(
        "2024-03-01 12:00:00 UTC {kind} stream INFO 200 {asset} - _defaultVHost_ vod _definst_ {duration} 10.1.1.1 1935 rtmp://x 10.0.0.5 rtmp - Player 55555"
    )
}

#[test]
fn video_mismatch_is_reported_with_both_names() {
    let mut tracker = SessionTracker::new(TrackerConfig::default());
    tracker.ingest_line(&line("create", "vod/showA/ep1.mp4", "0.2"), 1.0);

    let output = logged(|| {
        tracker.ingest_line(&line("seek", "vod/showB/ep1.mp4", "3.0"), 2.0);
    });

    let mismatch = output
        .lines()
        .find(|l| l.contains("video mismatch, keeping first"))
        .expect("mismatch record missing");
    assert!(mismatch.contains("WARN"));
    assert!(mismatch.contains("stored=showA/ep1"));
    assert!(mismatch.contains("seen="));
    assert!(mismatch.contains("showB/ep1"));

    let key = SessionKey::new("10.0.0.5", "55555");
    let history = tracker.store().history(&key).unwrap();
    assert_eq!(history.first_video(), Some("showA/ep1"));
}

#[test]
fn matching_video_is_not_reported() {
    let mut tracker = SessionTracker::new(TrackerConfig::default());
    tracker.ingest_line(&line("create", "vod/showA/ep1.mp4", "0.2"), 1.0);

    let output = logged(|| {
        tracker.ingest_line(&line("play", "vod/showA/ep1.mp4", "1.0"), 2.0);
    });

    assert!(!output.contains("video mismatch"));
    assert!(output.contains("event committed"));
}

#[test]
fn comment_line_only_leaves_a_discard_note() {
    let mut tracker = SessionTracker::new(TrackerConfig::default());

    let output = logged(|| {
        tracker.ingest_line(&line("comment", "-", "-"), 1.0);
    });

    let records: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(records.len(), 1, "unexpected records: {output}");
    assert!(records[0].contains("discarding comment line"));
    assert_eq!(tracker.session_count(), 0);
}
