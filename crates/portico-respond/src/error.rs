//! Response writing errors.

use std::io;
use thiserror::Error;

/// Errors that can occur while encoding a response body.
///
/// These are returned to the caller as-is. Depending on the variant the
/// status line may already be committed.
#[derive(Debug, Error)]
pub enum WriteError {
    /// JSON encoding failed after the status was written.
    #[error("failed to encode JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding failed after the status was written.
    #[error("failed to encode CSV response: {0}")]
    Csv(#[from] csv::Error),

    /// The underlying writer failed.
    #[error("failed to write response: {0}")]
    Io(#[from] io::Error),

    /// The reply asked for `text/csv` but carries a JSON value. Nothing was
    /// written.
    #[error("response marked text/csv but the body is not a table")]
    NotTabular,

    /// The configured CSV delimiter is not a single ASCII character. Nothing
    /// was written.
    #[error("CSV delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),
}

impl WriteError {
    /// Returns `true` if the error was raised before anything was written.
    #[must_use]
    pub const fn is_uncommitted(&self) -> bool {
        matches!(self, Self::NotTabular | Self::InvalidDelimiter(_))
    }
}
