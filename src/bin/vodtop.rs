//! vodtop - live terminal view of streaming-server viewer sessions
//!
//! Follows a streaming server's access log and shows one row per viewer
//! session with the latest duration reported for each event kind.
//!
//! # Usage
//!
//! ```text
//! vodtop /var/log/streaming/access.log      # follow new lines
//! vodtop --from-start --video access.log    # replay, show video names
//! vodtop --timer --refresh-ms 500 access.log
//! vodtop --config vodtop.toml --debug
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};
use tracing_subscriber::EnvFilter;

use vodtop_core::now_seconds;
use vodtop_tracker::{write_dump, LogFollower};
use vodtop_tui::app::{App, RenderDecision};
use vodtop_tui::error::{Result as TuiResult, TuiError};
use vodtop_tui::input::{handle_key_event, Action, Event};
use vodtop_tui::settings::{CliOverrides, RefreshMode, Settings, SettingsFile};
use vodtop_tui::ui;

// ============================================================================
// CLI Arguments
// ============================================================================

/// vodtop - live viewer sessions from a streaming access log
#[derive(Parser, Debug)]
#[command(name = "vodtop")]
#[command(about = "Show streaming viewer sessions from an access log in real time")]
#[command(version)]
struct Args {
    /// Access log to follow (overrides `log` in the settings file)
    log: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Write the diagnostic log and periodic session dumps
    #[arg(long, short = 'd')]
    debug: bool,

    /// Diagnostic log path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Session dump path (with --debug)
    #[arg(long)]
    dump_file: Option<PathBuf>,

    /// Show each session's first video instead of its client id
    #[arg(long, short = 'v')]
    video: bool,

    /// Also sweep and refresh on a timer, not only when lines arrive
    #[arg(long, short = 't')]
    timer: bool,

    /// Read the whole log before following it
    #[arg(long)]
    from_start: bool,

    /// Drop lines from this source address (repeatable)
    #[arg(long, value_name = "ADDR")]
    ignore: Vec<String>,

    /// Evict sessions idle longer than this
    #[arg(long, value_name = "SECS")]
    idle_secs: Option<u64>,

    /// Evict disconnected sessions idle longer than this
    #[arg(long, value_name = "SECS")]
    grace_secs: Option<u64>,

    /// Minimum time between renders
    #[arg(long, value_name = "MS")]
    refresh_ms: Option<u64>,

    /// Decimal places in duration columns
    #[arg(long, value_name = "DIGITS")]
    precision: Option<usize>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            log: self.log.clone(),
            debug: self.debug,
            log_file: self.log_file.clone(),
            dump_file: self.dump_file.clone(),
            video: self.video,
            timer: self.timer,
            from_start: self.from_start,
            ignore: self.ignore.clone(),
            idle_secs: self.idle_secs,
            grace_secs: self.grace_secs,
            refresh_ms: self.refresh_ms,
            precision: self.precision,
        }
    }
}

// ============================================================================
// Terminal Setup / Cleanup
// ============================================================================

fn setup_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().map_err(|e| TuiError::TerminalInit(e.to_string()))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| TuiError::TerminalInit(e.to_string()))?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| TuiError::TerminalInit(e.to_string()))
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> TuiResult<()> {
    disable_raw_mode().map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    terminal
        .show_cursor()
        .map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    Ok(())
}

// ============================================================================
// Keyboard Input Task
// ============================================================================

fn spawn_keyboard_task(
    event_tx: mpsc::UnboundedSender<Event>,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if cancel_token.is_cancelled() {
                debug!("Keyboard task shutting down");
                break;
            }

            let poll_result = tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await;

            match poll_result {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if event_tx.send(Event::Key(key)).is_err() {
                        debug!("Event channel closed, keyboard task exiting");
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(width, height))) => {
                    if event_tx.send(Event::Resize(width, height)).is_err() {
                        break;
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Keyboard polling task panicked");
                    break;
                }
            }
        }
    })
}

// ============================================================================
// Main Event Loop
// ============================================================================

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    line_rx: &mut mpsc::Receiver<String>,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    dump_path: Option<&Path>,
    cancel_token: &CancellationToken,
) -> Result<()> {
    let timer_mode = app.refresh_mode == RefreshMode::Timer;
    let mut ticker = tokio::time::interval(app.refresh_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    draw(terminal, app, now_seconds(), dump_path)?;

    loop {
        // Whether this wakeup may change what is on screen.
        let check_render = tokio::select! {
            line = line_rx.recv() => match line {
                Some(line) => {
                    app.on_line(&line, now_seconds());
                    true
                }
                None => {
                    warn!("Log follower stopped");
                    break;
                }
            },
            event = event_rx.recv() => match event {
                Some(Event::Key(key)) => match handle_key_event(key, app) {
                    Action::Quit => {
                        info!("User requested quit");
                        break;
                    }
                    Action::Redraw => true,
                    Action::None => false,
                },
                Some(Event::Resize(width, height)) => {
                    debug!(width, height, "Terminal resized");
                    app.request_redraw();
                    true
                }
                None => {
                    warn!("Event channel closed");
                    break;
                }
            },
            _ = ticker.tick(), if timer_mode => {
                app.on_tick(now_seconds());
                true
            }
            _ = cancel_token.cancelled() => break,
        };

        if check_render {
            draw(terminal, app, now_seconds(), dump_path)?;
        }

        if app.should_quit {
            break;
        }
    }

    cancel_token.cancel();
    Ok(())
}

/// Renders if due, then writes a session dump if one is due.
fn draw(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    now: f64,
    dump_path: Option<&Path>,
) -> Result<()> {
    let decision = app.prepare_render(now);
    if !decision.should_draw() {
        return Ok(());
    }
    if decision == RenderDecision::ClearAndDraw {
        terminal.clear()?;
    }
    terminal.draw(|frame| ui::render(frame, app))?;

    if let (Some(path), Some(dump)) = (dump_path, app.dump_if_due(now)) {
        match write_dump(path, &dump) {
            Ok(()) => debug!(
                path = %path.display(),
                sessions = dump.session_count,
                "session dump written"
            ),
            Err(e) => warn!(error = %e, path = %path.display(), "Failed to write session dump"),
        }
    }
    Ok(())
}

// ============================================================================
// Logging Setup
// ============================================================================

fn create_log_file(path: &Path) -> Option<fs::File> {
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Warning: Failed to create log directory {dir:?}: {e}");
            return None;
        }
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to open log file {path:?}: {e}");
            None
        }
    }
}

/// Logs go to a file only; stderr belongs to the terminal UI.
fn init_logging(settings: &Settings) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let enabled = settings.debug || directives.is_some();
    let filter = match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new("debug"),
    };

    let log_file = if enabled {
        settings.diagnostic_log.as_deref().and_then(create_log_file)
    } else {
        None
    };

    match log_file {
        Some(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .init();
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file = SettingsFile::discover(args.config.as_deref()).context("Failed to load settings")?;
    let settings = Settings::resolve(file, args.overrides())?;

    init_logging(&settings);

    let root_span = tracing::info_span!("vodtop", version = env!("CARGO_PKG_VERSION"));
    run(settings).instrument(root_span).await
}

async fn run(settings: Settings) -> Result<()> {
    info!(
        log = %settings.log_path.display(),
        refresh = settings.refresh_mode.label(),
        mode = settings.table.mode.column_title(),
        "vodtop starting"
    );

    // A missing log is fatal before the terminal is touched.
    let follower = LogFollower::open(settings.log_path.clone(), settings.start)
        .await
        .map_err(TuiError::from)
        .context("Cannot start")?;

    let (line_tx, mut line_rx) = mpsc::channel::<String>(1024);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let cancel_token = CancellationToken::new();

    let mut terminal = match setup_terminal() {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to initialize terminal");
            return Err(e.into());
        }
    };

    let mut app = App::new(&settings);

    let follower_handle = tokio::spawn(
        follower
            .run(line_tx, cancel_token.clone())
            .instrument(tracing::Span::current()),
    );
    let keyboard_handle = spawn_keyboard_task(event_tx, cancel_token.clone());

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &mut line_rx,
        &mut event_rx,
        settings.dump_path.as_deref(),
        &cancel_token,
    )
    .await;

    cancel_token.cancel();

    let _ = tokio::time::timeout(Duration::from_millis(100), follower_handle).await;
    let _ = tokio::time::timeout(Duration::from_millis(100), keyboard_handle).await;

    if let Err(e) = cleanup_terminal(&mut terminal) {
        error!(error = %e, "Failed to cleanup terminal");
    }

    info!(lines = app.lines_seen(), renders = app.renders(), "vodtop stopped");

    result
}
