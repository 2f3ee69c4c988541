//! Main configuration types.
//!
//! This module provides the top-level [`PorticoConfig`] struct and its builder.

use portico_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::{BindConfig, ConfigError, CsvConfig};

/// Complete Portico configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use portico_config::PorticoConfig;
///
/// let config = PorticoConfig::default();
/// assert_eq!(config.bind.multipart_max_fields, 1000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PorticoConfig {
    /// Request binding limits.
    #[serde(default)]
    pub bind: BindConfig,

    /// CSV response format.
    #[serde(default)]
    pub csv: CsvConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LogConfig,
}

impl PorticoConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> PorticoConfigBuilder {
        PorticoConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - a multipart limit is zero
    /// - the CSV delimiter is not ASCII, or is a quote or line break
    /// - the log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.multipart_max_memory == 0 {
            return Err(ConfigError::invalid_value(
                "bind.multipart_max_memory",
                "must be greater than zero",
            ));
        }

        if self.bind.multipart_max_fields == 0 {
            return Err(ConfigError::invalid_value(
                "bind.multipart_max_fields",
                "must be greater than zero",
            ));
        }

        match self.csv.delimiter_byte() {
            None => {
                return Err(ConfigError::invalid_value(
                    "csv.delimiter",
                    format!("must be a single ASCII character, got {:?}", self.csv.delimiter),
                ));
            }
            Some(b'"' | b'\n' | b'\r') => {
                return Err(ConfigError::invalid_value(
                    "csv.delimiter",
                    "must not be a quote or line break",
                ));
            }
            Some(_) => {}
        }

        if self.logging.enabled {
            portico_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, debug-level logs; everything else at defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use portico_config::PorticoConfig;
    ///
    /// let config = PorticoConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LogConfig::development(),
            ..Self::default()
        }
    }

    /// Create a production configuration preset.
    ///
    /// # Example
    ///
    /// ```
    /// use portico_config::{LogFormat, PorticoConfig};
    ///
    /// let config = PorticoConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// Builder for [`PorticoConfig`].
#[derive(Debug, Default)]
pub struct PorticoConfigBuilder {
    bind: Option<BindConfig>,
    csv: Option<CsvConfig>,
    logging: Option<LogConfig>,
}

impl PorticoConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the binding configuration.
    #[must_use]
    pub fn bind(mut self, bind: BindConfig) -> Self {
        self.bind = Some(bind);
        self
    }

    /// Set the CSV configuration.
    #[must_use]
    pub fn csv(mut self, csv: CsvConfig) -> Self {
        self.csv = Some(csv);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LogConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> PorticoConfig {
        PorticoConfig {
            bind: self.bind.unwrap_or_default(),
            csv: self.csv.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<PorticoConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
