//! Typed configuration for Portico.
//!
//! Three sections tune the request/response wrapper:
//!
//! - [`BindConfig`] - multipart memory and field limits
//! - [`CsvConfig`] - CSV delimiter and line terminator
//! - [`LogConfig`] - log filter and output format
//!
//! Configuration is layered: defaults, then an optional TOML or JSON file,
//! then `PREFIX__SECTION__KEY` environment variables. Unknown keys in a file
//! are rejected.
//!
//! # Example
//!
//! ```no_run
//! use portico_config::{ConfigLoader, PorticoConfig};
//!
//! # fn main() -> Result<(), portico_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("portico.toml")?
//!     .with_env_prefix("PORTICO")
//!     .load()?;
//!
//! println!("multipart limit: {} bytes", config.bind.multipart_max_memory);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [bind]
//! multipart_max_memory = 33554432
//! multipart_max_fields = 1000
//! ignore_unknown_keys = false
//!
//! [csv]
//! delimiter = ","
//! crlf = false
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! span_events = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `PORTICO__BIND__MULTIPART_MAX_MEMORY=1048576`
//! - `PORTICO__BIND__IGNORE_UNKNOWN_KEYS=true`
//! - `PORTICO__CSV__DELIMITER=;`
//! - `PORTICO__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{PorticoConfig, PorticoConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use portico_telemetry::{LogConfig, LogFormat};
pub use schema::{BindConfig, CsvConfig, DEFAULT_MULTIPART_MAX_FIELDS, DEFAULT_MULTIPART_MAX_MEMORY};
