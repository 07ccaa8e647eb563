//! Application configuration
//!
//! Layered from built-in defaults, an optional `busroute.toml` (or the file
//! given on the command line) and `BUSROUTE_*` environment variables, in that
//! order of precedence.
//!
//! Split into focused sub-modules:
//! - `pipeline`: batch geocoding policy and storage
//! - `logging`: log filter and output format
//!
//! External service settings reuse the integration crates' own config types.

mod logging;
mod pipeline;

use std::path::Path;

pub use integration_osm::{NominatimConfig, OsrmConfig};
pub use integration_postal::ViaCepConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use pipeline::{GeocodingAppConfig, StorageBackend, StorageConfig};
use serde::{Deserialize, Serialize};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BUSROUTE";

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "busroute";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Nominatim geocoding service
    #[serde(default)]
    pub nominatim: NominatimConfig,

    /// OSRM routing service
    #[serde(default)]
    pub osrm: OsrmConfig,

    /// ViaCEP postal code service
    #[serde(default)]
    pub viacep: ViaCepConfig,

    /// Batch geocoding pacing and retries
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Key-value storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `busroute.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file
    ///
    /// An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(path, env_source())
    }

    fn build(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .set_default("storage.backend", "file")?
            .set_default("logging.format", "text")?
            .add_source(file)
            // e.g. BUSROUTE_GEOCODING__DELAY_MS=1500
            .add_source(environment);

        builder.build()?.try_deserialize()
    }

    /// Create a configuration suitable for testing
    ///
    /// No pacing, no caching, in-memory storage.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            nominatim: NominatimConfig::for_testing(),
            osrm: OsrmConfig::for_testing(),
            viacep: ViaCepConfig::for_testing(),
            geocoding: GeocodingAppConfig::for_testing(),
            storage: StorageConfig::for_testing(),
            logging: LoggingConfig::for_testing(),
        }
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first invalid section and why.
    pub fn validate(&self) -> Result<(), String> {
        let sections = [
            ("nominatim", self.nominatim.validate()),
            ("osrm", self.osrm.validate()),
            ("viacep", self.viacep.validate()),
            ("geocoding", self.geocoding.validate()),
            ("storage", self.storage.validate()),
            ("logging", self.logging.validate()),
        ];

        for (name, result) in sections {
            result.map_err(|e| format!("{name}: {e}"))?;
        }
        Ok(())
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
