//! Application state for the vodtop TUI.
//!
//! `App` owns the session tracker and decides when the table is swept and
//! redrawn. It is driven by a single task, so a render always sees a
//! consistent snapshot and no locking is needed.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use vodtop_tracker::{
    DisplayMode, IngestOutcome, SessionDump, SessionTable, SessionTracker, TableConfig,
};

use crate::settings::{RefreshMode, Settings};

// ============================================================================
// Render Decision
// ============================================================================

/// What the event loop should do with the terminal this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    /// Nothing to draw yet.
    Skip,
    /// Draw over the previous frame.
    Draw,
    /// Clear the terminal first; rows have disappeared.
    ClearAndDraw,
}

impl RenderDecision {
    pub fn should_draw(&self) -> bool {
        !matches!(self, Self::Skip)
    }
}

// ============================================================================
// Application
// ============================================================================

pub struct App {
    tracker: SessionTracker,
    table_config: TableConfig,

    /// Table as of the last render.
    pub table: SessionTable,

    pub refresh_mode: RefreshMode,
    pub refresh_interval: Duration,

    /// Access log being followed, shown in the header.
    pub log_path: PathBuf,

    /// Flag indicating the application should quit.
    pub should_quit: bool,

    /// Set by the user or a resize; forces a full redraw.
    force_redraw: bool,

    /// Time of the last render, epoch seconds.
    last_render: Option<f64>,

    renders: u64,
    lines_seen: u64,

    /// Renders between session dumps; `None` disables dumping.
    dump_every: Option<u64>,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        Self {
            tracker: SessionTracker::new(settings.tracker.clone()),
            table_config: settings.table.clone(),
            table: SessionTable::default(),
            refresh_mode: settings.refresh_mode,
            refresh_interval: settings.refresh_interval,
            log_path: settings.log_path.clone(),
            should_quit: false,
            force_redraw: false,
            last_render: None,
            renders: 0,
            lines_seen: 0,
            dump_every: settings.dump_path.as_ref().map(|_| settings.dump_every),
        }
    }

    /// Applies one log line, then sweeps for stale sessions.
    pub fn on_line(&mut self, line: &str, now: f64) -> IngestOutcome {
        self.lines_seen = self.lines_seen.saturating_add(1);
        let outcome = self.tracker.ingest_line(line, now);
        self.tracker.sweep(now);
        outcome
    }

    /// Refresh timer tick. Sweeps only in timer mode.
    pub fn on_tick(&mut self, now: f64) {
        if self.refresh_mode == RefreshMode::Timer {
            self.tracker.sweep(now);
        }
    }

    /// Forces a full redraw at the next render check.
    pub fn request_redraw(&mut self) {
        self.force_redraw = true;
    }

    /// Decides whether to render now and, if so, rebuilds the table.
    ///
    /// A pending full redraw renders immediately; otherwise renders are
    /// spaced at least `refresh_interval` apart.
    pub fn prepare_render(&mut self, now: f64) -> RenderDecision {
        let clear = self.tracker.take_redraw() | std::mem::take(&mut self.force_redraw);
        let due = match self.last_render {
            None => true,
            Some(last) => now - last >= self.refresh_interval.as_secs_f64(),
        };

        let decision = if clear {
            RenderDecision::ClearAndDraw
        } else if due {
            RenderDecision::Draw
        } else {
            RenderDecision::Skip
        };

        if decision.should_draw() {
            self.table = self.tracker.table(&self.table_config);
            self.last_render = Some(now);
            self.renders = self.renders.saturating_add(1);
            debug!(
                rows = self.table.rows.len(),
                clear = decision == RenderDecision::ClearAndDraw,
                "render"
            );
        }
        decision
    }

    /// A session dump, if one is due after the latest render.
    pub fn dump_if_due(&self, now: f64) -> Option<SessionDump> {
        let every = self.dump_every?;
        (self.renders > 0 && self.renders % every == 0).then(|| self.tracker.dump(now))
    }

    /// Sets the quit flag to true, signaling the application should exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.table_config.mode
    }

    pub fn session_count(&self) -> usize {
        self.tracker.session_count()
    }

    pub fn lines_seen(&self) -> u64 {
        self.lines_seen
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }
}

// ============================================================================
// Tests
// ============================================================================
