//! Route pipeline configuration: batch geocoding and storage.

use std::path::PathBuf;
use std::time::Duration;

use application::{BatchGeocoderConfig, StorageKeys};
use serde::{Deserialize, Serialize};

// ==============================
// Batch Geocoding Configuration
// ==============================

/// Pacing and retry policy for batch geocoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// Pause between consecutive geocoding requests, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Extra attempts for network failures and timeouts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

const fn default_delay_ms() -> u64 {
    1000
}

const fn default_max_retries() -> u32 {
    3
}

impl Default for GeocodingAppConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl GeocodingAppConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            delay_ms: 0,
            max_retries: 0,
        }
    }

    /// Convert into the batch geocoder's policy
    #[must_use]
    pub const fn to_batch_config(&self) -> BatchGeocoderConfig {
        BatchGeocoderConfig {
            delay: Duration::from_millis(self.delay_ms),
            max_retries: self.max_retries,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err("max_retries must be 10 or less".to_string());
        }
        Ok(())
    }
}

// ==============================
// Storage Configuration
// ==============================

/// Where route state and the roster are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON document on disk
    #[default]
    File,
    /// Process memory only
    Memory,
}

/// Key-value storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend
    #[serde(default)]
    pub backend: StorageBackend,

    /// Data file for the `file` backend
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Key of the route configuration
    #[serde(default = "default_route_points_key")]
    pub route_points_key: String,

    /// Key of the student roster
    #[serde(default = "default_students_key")]
    pub students_key: String,

    /// Key of the last computed itinerary
    #[serde(default = "default_itinerary_key")]
    pub itinerary_key: String,
}

fn default_path() -> PathBuf {
    PathBuf::from("busroute-data.json")
}

fn default_route_points_key() -> String {
    StorageKeys::default().route_points
}

fn default_students_key() -> String {
    StorageKeys::default().students
}

fn default_itinerary_key() -> String {
    StorageKeys::default().itinerary
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            route_points_key: default_route_points_key(),
            students_key: default_students_key(),
            itinerary_key: default_itinerary_key(),
        }
    }
}

impl StorageConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Default::default()
        }
    }

    /// Storage keys for the application services
    #[must_use]
    pub fn keys(&self) -> StorageKeys {
        StorageKeys {
            route_points: self.route_points_key.clone(),
            itinerary: self.itinerary_key.clone(),
            students: self.students_key.clone(),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        let keys = [
            &self.route_points_key,
            &self.students_key,
            &self.itinerary_key,
        ];
        if keys.iter().any(|k| k.trim().is_empty()) {
            return Err("storage keys must not be empty".to_string());
        }
        if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
            return Err("storage keys must be distinct".to_string());
        }
        if self.backend == StorageBackend::File && self.path.as_os_str().is_empty() {
            return Err("path must be set for the file backend".to_string());
        }
        Ok(())
    }
}
