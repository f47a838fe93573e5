//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `<config dir>/niii/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::line::DEFAULT_ACTION_PREFIX;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NiiiConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub nick_width: Option<u16>,
    pub colors: Option<bool>,
    pub status_bar: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub escape_command: Option<String>,
    pub max_input_len: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub action_prefix: Option<String>,
    pub watch: Option<WatchMode>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
}

/// How new output from the backend is noticed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchMode {
    /// Filesystem notifications on the session directory.
    #[default]
    Notify,
    /// Fixed-interval checks of the out file.
    Poll,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_NICK_WIDTH: u16 = 12;
pub const DEFAULT_ESCAPE_COMMAND: &str = "/CLOSE";
pub const DEFAULT_MAX_INPUT_LEN: usize = 1024;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub nick_width: u16,
    pub colors: bool,
    pub status_bar: bool,
    pub escape_command: String,
    pub max_input_len: usize,
    pub action_prefix: String,
    pub watch: WatchMode,
    pub poll_interval: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&NiiiConfig::default(), &CliOverrides::default())
    }
}

/// Values taken from command-line flags (None / false = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub no_color: bool,
    pub no_status_bar: bool,
    pub poll: bool,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `<config dir>/niii/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("niii").join("config.toml"))
}

/// Load config from the default location.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `NiiiConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<NiiiConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine config directory, using default config");
            return Ok(NiiiConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(NiiiConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<NiiiConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: NiiiConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# niii configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [display]
# nick_width = 12          # Width of the nick column
# colors = true            # Or set NIII_COLORS=0, or pass --no-color
# status_bar = true        # "[network] [channel]" row above the prompt

# [input]
# escape_command = "/CLOSE"
# max_input_len = 1024     # Longer input is truncated

# [backend]
# action_prefix = "\u0001ACTION "   # CTCP sentinel that marks /me lines
# watch = "notify"                  # "notify" or "poll"
# poll_interval_ms = 250

# [log]
# file = "/tmp/niii.log"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &NiiiConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &NiiiConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let env_bool = |key: &str| env(key).map(|v| !matches!(v.as_str(), "0" | "false" | "no"));

    // Colors: CLI can only disable; env → config → default
    let colors = !cli.no_color
        && env_bool("NIII_COLORS")
            .or(config.display.colors)
            .unwrap_or(true);

    let status_bar = !cli.no_status_bar
        && env_bool("NIII_STATUS_BAR")
            .or(config.display.status_bar)
            .unwrap_or(true);

    // An empty escape command would turn every empty submission into a quit
    let escape_command = env("NIII_ESCAPE_COMMAND")
        .filter(|v| !v.is_empty())
        .or_else(|| config.input.escape_command.clone().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_ESCAPE_COMMAND.to_string());

    let action_prefix = config
        .backend
        .action_prefix
        .clone()
        .unwrap_or_else(|| DEFAULT_ACTION_PREFIX.to_string());

    let watch = if cli.poll {
        WatchMode::Poll
    } else {
        match env("NIII_WATCH").as_deref() {
            Some("poll") => WatchMode::Poll,
            Some("notify") => WatchMode::Notify,
            _ => config.backend.watch.unwrap_or_default(),
        }
    };

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env("NIII_LOG_FILE").map(PathBuf::from))
        .or_else(|| config.log.file.clone());

    ResolvedConfig {
        nick_width: config.display.nick_width.unwrap_or(DEFAULT_NICK_WIDTH),
        colors,
        status_bar,
        escape_command,
        max_input_len: config
            .input
            .max_input_len
            .unwrap_or(DEFAULT_MAX_INPUT_LEN)
            .max(1),
        action_prefix,
        watch,
        poll_interval: Duration::from_millis(
            config
                .backend
                .poll_interval_ms
                .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
                .max(10),
        ),
        log_file,
    }
}
