//! Errors raised while loading a [`PorticoConfig`](crate::PorticoConfig).

use std::path::PathBuf;
use thiserror::Error;

/// A configuration source that could not be read, parsed or accepted.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required config file does not exist.
    #[error("config file {path} does not exist")]
    Missing {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// A config file exists but could not be read.
    #[error("cannot read config file {path}")]
    Read {
        /// The file.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML, or TOML naming an unknown key.
    #[error("bad TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or JSON naming an unknown key.
    #[error("bad JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension or format name other than TOML or JSON.
    #[error("unsupported configuration format: {format}")]
    UnsupportedFormat {
        /// The rejected format or path.
        format: String,
    },

    /// A value parsed but is out of range.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted path of the setting, e.g. `csv.delimiter`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable whose value does not parse.
    #[error("environment override {var}: {reason}")]
    InvalidEnv {
        /// The variable name.
        var: String,
        /// What was expected.
        reason: String,
    },
}

impl ConfigError {
    /// A missing config file.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    /// An unreadable config file.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// A format other than TOML or JSON.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// A setting outside its accepted range.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// An override variable that does not parse.
    pub fn invalid_env(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEnv {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
