//! Settings for the vodtop front end.
//!
//! Values come from three layers, highest precedence first: command-line
//! flags, an optional TOML settings file, and built-in defaults. Everything
//! is resolved once at startup into [`Settings`] and never changes after.
//!
//! ```toml
//! log = "/var/log/streaming/access.log"
//! mode = "video"
//! refresh = "timer"
//! refresh_ms = 500
//! ignore = ["127.0.0.1"]
//!
//! [columns]
//! client_id = 21
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use vodtop_parse::{ColumnLayout, DEFAULT_VIDEO_ROOT};
use vodtop_tracker::config::{
    DEFAULT_DISCONNECT_GRACE, DEFAULT_DISPLAY_WIDTH, DEFAULT_IDLE_THRESHOLD, DEFAULT_PALETTE_SIZE,
};
use vodtop_tracker::{DisplayMode, StartPosition, TableConfig, TrackerConfig};

use crate::error::{Result, TuiError};

/// Settings file looked up under the user config dir when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default minimum time between two renders.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(1000);

/// Default number of renders between two session dumps.
pub const DEFAULT_DUMP_EVERY: u64 = 10;

// ============================================================================
// Refresh Mode
// ============================================================================

/// When the table is swept and re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    /// Only when a log line arrives. Idle periods leave the display and
    /// the session set untouched until the next line.
    #[default]
    OnInput,
    /// Also on a fixed timer, so idle sessions are evicted and the display
    /// refreshes without log traffic.
    Timer,
}

impl RefreshMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnInput => "on-input",
            Self::Timer => "timer",
        }
    }
}

// ============================================================================
// Settings File
// ============================================================================

/// Contents of the TOML settings file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Access log to follow.
    pub log: Option<PathBuf>,
    pub columns: ColumnLayout,
    pub video_root: Option<String>,
    pub address_width: Option<usize>,
    pub display_width: Option<usize>,
    pub duration_width: Option<usize>,
    pub precision: Option<usize>,
    pub idle_secs: Option<u64>,
    pub grace_secs: Option<u64>,
    pub refresh_ms: Option<u64>,
    pub ignore: Vec<String>,
    pub mode: Option<DisplayMode>,
    pub refresh: Option<RefreshMode>,
    pub palette_size: Option<usize>,
    pub from_start: Option<bool>,
    pub debug: Option<bool>,
    pub log_file: Option<PathBuf>,
    pub dump_file: Option<PathBuf>,
    pub dump_every: Option<u64>,
}

impl SettingsFile {
    /// Reads and parses a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| TuiError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| TuiError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads `explicit` if given, else the default file if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading default settings file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

// ============================================================================
// Command-Line Overrides
// ============================================================================

/// Values given on the command line. `None` and `false` defer to the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log: Option<PathBuf>,
    pub debug: bool,
    pub log_file: Option<PathBuf>,
    pub dump_file: Option<PathBuf>,
    pub video: bool,
    pub timer: bool,
    pub from_start: bool,
    pub ignore: Vec<String>,
    pub idle_secs: Option<u64>,
    pub grace_secs: Option<u64>,
    pub refresh_ms: Option<u64>,
    pub precision: Option<usize>,
}

// ============================================================================
// Resolved Settings
// ============================================================================

#[derive(Debug, Clone)]
pub struct Settings {
    pub log_path: PathBuf,
    pub start: StartPosition,
    pub tracker: TrackerConfig,
    pub table: TableConfig,
    pub refresh_mode: RefreshMode,
    pub refresh_interval: Duration,
    pub debug: bool,
    /// Diagnostic log destination; `None` if no state dir could be found.
    pub diagnostic_log: Option<PathBuf>,
    /// Session dump destination, only set when debug is on.
    pub dump_path: Option<PathBuf>,
    pub dump_every: u64,
}

impl Settings {
    /// Merges the layers. Fails if no log path was given anywhere.
    pub fn resolve(file: SettingsFile, cli: CliOverrides) -> Result<Self> {
        let log_path = cli.log.or(file.log).ok_or_else(|| {
            TuiError::Config(
                "no access log given: pass LOG or set `log` in the settings file".to_string(),
            )
        })?;

        let mut ignore_addresses: HashSet<String> = file.ignore.into_iter().collect();
        ignore_addresses.extend(cli.ignore);

        let display_width = file.display_width.unwrap_or(DEFAULT_DISPLAY_WIDTH);

        let tracker = TrackerConfig {
            columns: file.columns,
            video_root: file
                .video_root
                .unwrap_or_else(|| DEFAULT_VIDEO_ROOT.to_string()),
            video_width: display_width,
            idle_threshold: cli
                .idle_secs
                .or(file.idle_secs)
                .map_or(DEFAULT_IDLE_THRESHOLD, Duration::from_secs),
            disconnect_grace: cli
                .grace_secs
                .or(file.grace_secs)
                .map_or(DEFAULT_DISCONNECT_GRACE, Duration::from_secs),
            ignore_addresses,
            palette_size: file.palette_size.unwrap_or(DEFAULT_PALETTE_SIZE),
        };

        let defaults = TableConfig::default();
        let mode = if cli.video {
            DisplayMode::Video
        } else {
            file.mode.unwrap_or_default()
        };
        let table = TableConfig {
            address_width: file.address_width.unwrap_or(defaults.address_width),
            display_width,
            duration_width: file.duration_width.unwrap_or(defaults.duration_width),
            precision: cli
                .precision
                .or(file.precision)
                .unwrap_or(defaults.precision),
            mode,
        };

        let refresh_mode = if cli.timer {
            RefreshMode::Timer
        } else {
            file.refresh.unwrap_or_default()
        };
        let refresh_interval = cli
            .refresh_ms
            .or(file.refresh_ms)
            .map_or(DEFAULT_REFRESH_INTERVAL, Duration::from_millis);
        if refresh_mode == RefreshMode::Timer && refresh_interval.is_zero() {
            return Err(TuiError::Config(
                "refresh_ms must be greater than zero in timer mode".to_string(),
            ));
        }

        let start = if cli.from_start || file.from_start.unwrap_or(false) {
            StartPosition::Beginning
        } else {
            StartPosition::End
        };

        let debug = cli.debug || file.debug.unwrap_or(false);
        let state_dir = default_state_dir();
        let diagnostic_log = cli
            .log_file
            .or(file.log_file)
            .or_else(|| state_dir.as_ref().map(|dir| dir.join("vodtop.log")));
        let dump_path = if debug {
            cli.dump_file
                .or(file.dump_file)
                .or_else(|| state_dir.as_ref().map(|dir| dir.join("sessions.json")))
        } else {
            None
        };

        Ok(Self {
            log_path,
            start,
            tracker,
            table,
            refresh_mode,
            refresh_interval,
            debug,
            diagnostic_log,
            dump_path,
            dump_every: file.dump_every.unwrap_or(DEFAULT_DUMP_EVERY).max(1),
        })
    }
}

// ============================================================================
// Paths
// ============================================================================

/// `$XDG_STATE_HOME/vodtop` or the platform equivalent.
pub fn default_state_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("vodtop"))
}

/// `$XDG_CONFIG_HOME/vodtop/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vodtop").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_with_log() -> CliOverrides {
        CliOverrides {
            log: Some(PathBuf::from("/var/log/access.log")),
            ..CliOverrides::default()
        }
    }

    #[test]
    fn test_missing_log_path_is_config_error() {
        let result = Settings::resolve(SettingsFile::default(), CliOverrides::default());
        assert!(matches!(result, Err(TuiError::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(SettingsFile::default(), cli_with_log()).unwrap();

        assert_eq!(settings.log_path, PathBuf::from("/var/log/access.log"));
        assert_eq!(settings.start, StartPosition::End);
        assert_eq!(settings.tracker.idle_threshold, Duration::from_secs(600));
        assert_eq!(settings.tracker.disconnect_grace, Duration::from_secs(60));
        assert_eq!(settings.tracker.video_root, "vod/");
        assert_eq!(settings.table, TableConfig::default());
        assert_eq!(settings.refresh_mode, RefreshMode::OnInput);
        assert_eq!(settings.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert!(!settings.debug);
        assert_eq!(settings.dump_path, None);
    }

    #[test]
    fn test_file_values_apply() {
        let file = SettingsFile::parse(
            r#"
            log = "/srv/log/access.log"
            mode = "video"
            refresh = "timer"
            refresh_ms = 250
            precision = 3
            idle_secs = 900
            ignore = ["127.0.0.1"]

            [columns]
            client_id = 21
            "#,
        )
        .unwrap();

        let settings = Settings::resolve(file, CliOverrides::default()).unwrap();

        assert_eq!(settings.log_path, PathBuf::from("/srv/log/access.log"));
        assert_eq!(settings.table.mode, DisplayMode::Video);
        assert_eq!(settings.table.precision, 3);
        assert_eq!(settings.refresh_mode, RefreshMode::Timer);
        assert_eq!(settings.refresh_interval, Duration::from_millis(250));
        assert_eq!(settings.tracker.idle_threshold, Duration::from_secs(900));
        assert_eq!(settings.tracker.columns.client_id, 21);
        assert_eq!(settings.tracker.columns.kind, 3);
        assert!(settings.tracker.ignore_addresses.contains("127.0.0.1"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = SettingsFile::parse("log = \"/a.log\"\nprecision = 3\nidle_secs = 900").unwrap();
        let cli = CliOverrides {
            log: Some(PathBuf::from("/b.log")),
            precision: Some(0),
            idle_secs: Some(30),
            ignore: vec!["10.0.0.1".to_string()],
            from_start: true,
            ..CliOverrides::default()
        };

        let settings = Settings::resolve(file, cli).unwrap();

        assert_eq!(settings.log_path, PathBuf::from("/b.log"));
        assert_eq!(settings.table.precision, 0);
        assert_eq!(settings.tracker.idle_threshold, Duration::from_secs(30));
        assert!(settings.tracker.ignore_addresses.contains("10.0.0.1"));
        assert_eq!(settings.start, StartPosition::Beginning);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(SettingsFile::parse("colour = \"red\"").is_err());
        assert!(SettingsFile::parse("[columns]\nclient = 3").is_err());
    }

    #[test]
    fn test_zero_refresh_rejected_in_timer_mode() {
        let cli = CliOverrides {
            timer: true,
            refresh_ms: Some(0),
            ..cli_with_log()
        };
        let result = Settings::resolve(SettingsFile::default(), cli);
        assert!(matches!(result, Err(TuiError::Config(_))));
    }

    #[test]
    fn test_debug_enables_dump_path() {
        let cli = CliOverrides {
            debug: true,
            dump_file: Some(PathBuf::from("/tmp/dump.json")),
            ..cli_with_log()
        };
        let settings = Settings::resolve(SettingsFile::default(), cli).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.dump_path, Some(PathBuf::from("/tmp/dump.json")));
    }

    #[test]
    fn test_load_reports_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh = \"sometimes\"").unwrap();

        let result = SettingsFile::load(file.path());
        assert!(matches!(result, Err(TuiError::ConfigParse { .. })));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = SettingsFile::discover(Some(Path::new("/nonexistent/vodtop.toml")));
        assert!(matches!(result, Err(TuiError::ConfigRead { .. })));
    }
}
