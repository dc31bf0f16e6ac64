//! The session tracker - owns all session state and applies each event.
//!
//! `SessionTracker` gathers the session store, the duration ledger and the
//! colour allocator into one explicit state object. It is driven by a
//! single task: `ingest_line` for every log line, `sweep` after it, and
//! `table` when the front end decides to render.

use tracing::{debug, info, trace, warn};

use vodtop_core::{EventKind, EventRecord, SessionKey, VideoCheck};
use vodtop_parse::{LineParser, VideoNormalizer};

use super::{
    find_stale, reconcile, ColorAllocator, DiscardReason, DurationLedger, Eviction,
    IngestOutcome, Reconciliation, SessionStore,
};
use crate::dump::SessionDump;
use crate::table::{self, SessionTable, TableConfig};
use crate::TrackerConfig;

pub struct SessionTracker {
    config: TrackerConfig,
    parser: LineParser,
    videos: VideoNormalizer,
    store: SessionStore,
    ledger: DurationLedger,
    colors: ColorAllocator,
    /// Set when rows disappeared; the next render must clear the screen.
    redraw_pending: bool,
}

impl SessionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            parser: LineParser::new(config.columns),
            videos: VideoNormalizer::new(config.video_root.clone(), config.video_width),
            store: SessionStore::new(),
            ledger: DurationLedger::new(),
            colors: ColorAllocator::new(config.palette_size),
            redraw_pending: false,
            config,
        }
    }

    // ========================================================================
    // Ingest
    // ========================================================================

    /// Parses and applies one raw log line observed at `now`.
    pub fn ingest_line(&mut self, line: &str, now: f64) -> IngestOutcome {
        match self.parser.parse(line) {
            Ok(record) => self.ingest(record, now),
            Err(err) => {
                debug!(error = %err, line, "discarding unparseable line");
                IngestOutcome::Discarded(DiscardReason::Unparseable(err))
            }
        }
    }

    /// Applies one parsed record observed at `now`.
    pub fn ingest(&mut self, record: EventRecord, now: f64) -> IngestOutcome {
        if record.kind == EventKind::Comment {
            trace!("discarding comment line");
            return IngestOutcome::Discarded(DiscardReason::Comment);
        }

        if self.config.ignore_addresses.contains(&record.address) {
            trace!(address = %record.address, "discarding line from ignored address");
            return IngestOutcome::Discarded(DiscardReason::IgnoredAddress(record.address));
        }

        let key = record.key();
        let video = self
            .videos
            .normalize(&record.kind, record.video_path.as_deref());

        let decision = reconcile(
            &record.kind,
            self.store.history(&key),
            self.ledger.get(&key),
            now,
            record.raw_duration.as_deref(),
        );

        let commit = match decision {
            Reconciliation::Suppress => {
                info!(key = %key, "duplicate connect suppressed");
                return IngestOutcome::Suppressed { key };
            }
            Reconciliation::Commit(commit) => commit,
        };

        if let Some(raw) = &commit.anomaly {
            warn!(
                key = %key,
                kind = %record.kind,
                raw = %raw,
                "non-numeric duration, committing 0"
            );
        }

        if let Some(name) = video.as_deref() {
            match self.store.check_video_consistency(&key, name) {
                VideoCheck::NewlyAssigned => {
                    debug!(key = %key, video = name, "video assigned");
                }
                VideoCheck::Matches => {}
                VideoCheck::Mismatch { stored } => {
                    warn!(
                        key = %key,
                        stored = %stored,
                        seen = name,
                        "video mismatch, keeping first"
                    );
                }
            }
        }

        self.store
            .put(&key, record.kind.clone(), commit.value, video.as_deref(), now);

        if let Err(error) = self.store.validate(&key) {
            warn!(key = %key, error = %error, "invalid session key purged");
            self.ledger.remove(&key);
            self.release_color_if_empty(&key.address);
            self.redraw_pending = true;
            return IngestOutcome::Purged { key, error };
        }

        if let Some(entry) = commit.ledger {
            info!(
                key = %key,
                elapsed = commit.elapsed.unwrap_or(0.0),
                total = entry.total,
                "disconnect recorded"
            );
            self.ledger.record(key.clone(), entry);
        }

        debug!(key = %key, kind = %record.kind, "event committed");
        IngestOutcome::Committed {
            key,
            kind: record.kind,
        }
    }

    // ========================================================================
    // Eviction
    // ========================================================================

    /// Evicts idle and long-disconnected sessions.
    ///
    /// Any eviction schedules a full redraw so stale rows never linger.
    pub fn sweep(&mut self, now: f64) -> Vec<Eviction> {
        let evictions = find_stale(
            &self.store,
            now,
            self.config.idle_threshold,
            self.config.disconnect_grace,
        );

        for eviction in &evictions {
            self.store.remove(&eviction.key);
            self.ledger.remove(&eviction.key);
            self.release_color_if_empty(&eviction.key.address);

            info!(
                key = %eviction.key,
                reason = %eviction.reason,
                idle_secs = eviction.idle_secs,
                "session evicted"
            );
        }

        if !evictions.is_empty() {
            self.redraw_pending = true;
        }
        evictions
    }

    fn release_color_if_empty(&mut self, address: &str) {
        if self.store.sessions_at(address) == 0 {
            self.colors.release(address);
        }
    }

    // ========================================================================
    // Rendering support
    // ========================================================================

    /// Builds the session table, allocating colours as needed.
    pub fn table(&mut self, config: &TableConfig) -> SessionTable {
        table::build(&self.store, &mut self.colors, config)
    }

    /// Returns and clears the pending full-redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    /// Snapshot of the whole store for the diagnostic dump.
    pub fn dump(&self, now: f64) -> SessionDump {
        SessionDump::capture(&self.store, &self.ledger, &self.colors, now)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn ledger(&self) -> &DurationLedger {
        &self.ledger
    }

    pub fn colors(&self) -> &ColorAllocator {
        &self.colors
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn session_count(&self) -> usize {
        self.store.len()
    }

    pub fn last_active(&self, key: &SessionKey) -> Option<f64> {
        self.store.last_active(key)
    }
}
