//! Postal code service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the ViaCEP lookup service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaCepConfig {
    /// Base URL, up to and including the `/ws` segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of cached lookups (0 to disable caching)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Identifying client string sent as `User-Agent`
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_cache_capacity() -> u64 {
    500
}

fn default_user_agent() -> String {
    "BusManager/1.0 (Transporte Escolar)".to_string()
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_capacity: default_cache_capacity(),
            user_agent: default_user_agent(),
        }
    }
}

impl ViaCepConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_capacity: 16,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_capacity > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViaCepConfig::default();
        assert_eq!(config.base_url, "https://viacep.com.br/ws");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.caching_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_caching_disabled() {
        let config = ViaCepConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        assert!(!config.caching_enabled());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = ViaCepConfig {
            timeout_secs: 0,
            ..ViaCepConfig::for_testing()
        };
        assert!(config.validate().is_err());
    }
}
