//! Configuration schema types.
//!
//! This module defines the binding and CSV sections. The logging section
//! is [`LogConfig`](portico_telemetry::LogConfig).

use serde::{Deserialize, Serialize};

/// Default cap on retained multipart text, in bytes (32 MiB).
pub const DEFAULT_MULTIPART_MAX_MEMORY: usize = 32 << 20;

/// Default cap on the number of multipart parts.
pub const DEFAULT_MULTIPART_MAX_FIELDS: usize = 1000;

/// Request binding configuration section.
///
/// # Example
///
/// ```
/// use portico_config::BindConfig;
///
/// let config = BindConfig {
///     multipart_max_memory: 1 << 20,
///     ..Default::default()
/// };
/// assert_eq!(config.multipart_max_fields, 1000);
/// assert!(!config.ignore_unknown_keys);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BindConfig {
    /// Maximum bytes of multipart text field data kept in memory.
    #[serde(default = "default_multipart_max_memory")]
    pub multipart_max_memory: usize,

    /// Maximum number of multipart parts, files included.
    #[serde(default = "default_multipart_max_fields")]
    pub multipart_max_fields: usize,

    /// Accept query, form and multipart keys the target does not declare.
    /// Off by default: an unknown key is a malformed request.
    #[serde(default)]
    pub ignore_unknown_keys: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            multipart_max_memory: DEFAULT_MULTIPART_MAX_MEMORY,
            multipart_max_fields: DEFAULT_MULTIPART_MAX_FIELDS,
            ignore_unknown_keys: false,
        }
    }
}

fn default_multipart_max_memory() -> usize {
    DEFAULT_MULTIPART_MAX_MEMORY
}

fn default_multipart_max_fields() -> usize {
    DEFAULT_MULTIPART_MAX_FIELDS
}

/// CSV output configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CsvConfig {
    /// Field delimiter. Must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Terminate records with `\r\n` instead of `\n`.
    #[serde(default)]
    pub crlf: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            crlf: false,
        }
    }
}

impl CsvConfig {
    /// The delimiter as a byte, `None` if it is not ASCII.
    #[must_use]
    pub fn delimiter_byte(&self) -> Option<u8> {
        u8::try_from(self.delimiter).ok().filter(u8::is_ascii)
    }
}

fn default_delimiter() -> char {
    ','
}
