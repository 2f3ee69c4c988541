//! Errors from logging setup.

use thiserror::Error;

/// Failure to install the logging subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("logging already initialized: {0}")]
    LoggingInit(String),

    /// The `level` directive does not parse.
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
}
