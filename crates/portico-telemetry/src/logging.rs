//! Structured logging for Portico.
//!
//! Binding and response-writing emit `tracing` events under the
//! `portico_*` targets. [`init_logging`] installs a fmt layer in one of
//! three formats, filtered by an `EnvFilter` directive.
//!
//! # Example
//!
//! ```rust,ignore
//! use portico_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig {
//!     level: "portico_bind=debug,info".into(),
//!     ..LogConfig::default()
//! })?;
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human-readable output.
    Pretty,
    /// Single-line, human-readable output.
    Compact,
}

/// The `[logging]` section of a Portico config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `false` makes [`init_logging`] a no-op.
    pub enabled: bool,

    /// Filter directive (e.g. `"info"`, `"portico_bind=debug,warn"`).
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Print the event target (module path).
    pub include_target: bool,

    /// Print source file and line.
    pub file_line_info: bool,

    /// Emit an event when a span closes, carrying its busy and idle time.
    /// Each `handle_call` runs in its own span.
    pub span_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            include_target: true,
            file_line_info: false,
            span_events: false,
        }
    }
}

impl LogConfig {
    /// Debug level, pretty output, source locations and span timings.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_target: true,
            file_line_info: true,
            span_events: true,
        }
    }

    /// Same as [`LogConfig::default`]: info level, JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing when `config.enabled` is `false`.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if `config.level` does not parse,
/// and `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;
    let span_events = if config.span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let base = tracing_subscriber::fmt::layer()
        .with_span_events(span_events)
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_target(config.include_target);

    let registry = tracing_subscriber::registry();
    let result = match config.format {
        LogFormat::Json => registry.with(base.json().with_filter(filter)).try_init(),
        LogFormat::Pretty => registry.with(base.pretty().with_filter(filter)).try_init(),
        LogFormat::Compact => registry.with(base.compact().with_filter(filter)).try_init(),
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Parses an `EnvFilter` directive such as `portico_bind=debug,warn`.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter(e.to_string()))
}
