//! Application configuration
//!
//! Values are layered: built-in defaults, then an optional `config.toml`,
//! then `BUSROUTE_*` environment variables. Nested keys use a double
//! underscore, e.g. `BUSROUTE_SEARCH__MAX_CONCURRENCY=8` or
//! `BUSROUTE_BUS__TAGO_BASE_URL=...`.

use std::path::Path;

use application::RouteSearchConfig;
use integration_bus::BusApiConfig;
use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;
use crate::telemetry::TelemetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BUSROUTE";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider endpoints, timeouts and page sizes
    #[serde(default)]
    pub bus: BusApiConfig,

    /// Fan-out settings
    #[serde(default)]
    pub search: RouteSearchConfig,

    /// Retry policy for unavailable upstreams
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file, then the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.bus.validate()?;
        self.search.validate()?;
        self.retry.validate()?;
        self.telemetry.validate()
    }
}
