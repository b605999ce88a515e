//! Sift Logging
//!
//! Every Sift crate logs through the macros re-exported here, and binaries call
//! [`init`] once to install a `tracing` subscriber configured from the
//! environment.
//!
//! # Usage
//!
//! ```rust
//! use sift_log::{debug, info, warn};
//!
//! sift_log::init();
//!
//! info!("connected to {}", "http://localhost:9200");
//! debug!(index = "books", "creating index");
//! warn!("endpoint skipped");
//! ```
//!
//! # Environment Variables
//!
//! - `SIFT_DEBUG=1` - Enable debug logging
//! - `SIFT_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `SIFT_LOG_FORMAT=pretty|compact|json` - Set output format
//! - `SIFT_LOG_COLOR=1|0` - Enable/disable ANSI colors
//! - `RUST_LOG` - Full filter directive, overrides `SIFT_LOG_LEVEL`

use once_cell::sync::{Lazy, OnceCell};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

pub use tracing::{debug, error, info, trace, warn};

// ============================================================================
// Log Levels
// ============================================================================

/// Minimum level that reaches the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Most verbose
    Trace,
    /// Debug
    Debug,
    /// Info
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
    /// No logging at all
    Off,
}

impl Level {
    /// Directive understood by `EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl FromStr for Level {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "off" | "none" => Ok(Level::Off),
            _ => Err(ParseLogSettingError(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_directive().to_uppercase())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line, human oriented
    Pretty,
    /// Single line per event
    Compact,
    /// One JSON object per event
    Json,
}

impl FromStr for Format {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Format::Pretty),
            "compact" => Ok(Format::Compact),
            "json" => Ok(Format::Json),
            _ => Err(ParseLogSettingError(s.to_string())),
        }
    }
}

/// Unrecognized level or format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLogSettingError(pub String);

impl fmt::Display for ParseLogSettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized log setting: {:?}", self.0)
    }
}

impl std::error::Error for ParseLogSettingError {}

// ============================================================================
// Configuration
// ============================================================================

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether `SIFT_DEBUG` was set
    pub debug: bool,
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether ANSI colors are enabled
    pub color: bool,
    /// Whether to print the event target (module path)
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            color: false,
            module_path: true,
        }
    }
}

impl LogConfig {
    /// Read the configuration from `SIFT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        };

        let debug = flag("SIFT_DEBUG").unwrap_or(false);

        let level = lookup("SIFT_LOG_LEVEL")
            .and_then(|s| s.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = lookup("SIFT_LOG_FORMAT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(Format::Json);

        let color = flag("SIFT_LOG_COLOR")
            .unwrap_or_else(|| lookup("NO_COLOR").is_none() && lookup("TERM").is_some());

        let module_path = flag("SIFT_LOG_MODULE").unwrap_or(true);

        Self {
            debug,
            level,
            format,
            color,
            module_path,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_directive()))
    }
}

/// Configuration read from the environment on first use.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Subscriber installation
// ============================================================================

/// Install the global subscriber once; later calls are no-ops.
pub fn init() {
    INSTALLED.get_or_init(|| {
        if let Err(err) = try_init() {
            eprintln!("sift-log: subscriber not installed: {err}");
        }
    });
}

/// Install the global subscriber, failing if one is already set.
pub fn try_init() -> Result<(), TryInitError> {
    install(config())
}

fn install(config: &LogConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(config.filter());
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.module_path);

    match config.format {
        #[cfg(feature = "json")]
        Format::Json => registry.with(layer.json()).try_init(),
        #[cfg(not(feature = "json"))]
        Format::Json => registry.with(layer.compact().with_ansi(false)).try_init(),
        Format::Compact => registry.with(layer.compact().with_ansi(config.color)).try_init(),
        Format::Pretty => registry.with(layer.pretty().with_ansi(config.color)).try_init(),
    }
}
