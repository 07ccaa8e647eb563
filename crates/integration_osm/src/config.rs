//! Routing service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Routing profile (`driving`, `car`, ...)
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Identifying client string sent as `User-Agent`
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_profile() -> String {
    "driving".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    "BusManager/1.0 (Transporte Escolar)".to_string()
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            profile: default_profile(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl OsrmConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
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

        if self.profile.trim().is_empty() || self.profile.contains('/') {
            return Err("profile must be a single path segment".to_string());
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
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, "https://router.project-osrm.org");
        assert_eq!(config.profile, "driving");
        assert_eq!(config.timeout_secs, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        let config = OsrmConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_validation_empty_base_url() {
        let config = OsrmConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_profile() {
        let config = OsrmConfig {
            profile: "driving/extra".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = OsrmConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: OsrmConfig = serde_json::from_str(r#"{"profile":"car"}"#).unwrap();
        assert_eq!(config.profile, "car");
        assert_eq!(config.base_url, "https://router.project-osrm.org");
    }
}
