//! Nominatim geocoding client
//!
//! Converts address search strings to geographic coordinates using
//! the [Nominatim](https://nominatim.openstreetmap.org) API (OpenStreetMap).
//!
//! Enforces a minimum spacing between requests (Nominatim usage policy allows
//! at most one request per second) and caches results to minimize API calls.

use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Country code filter (e.g., "br" for Brazil); empty disables the filter
    #[serde(default = "default_country_filter")]
    pub country_filter: String,

    /// Identifying client string sent as `User-Agent`
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum spacing between two requests, in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_country_filter() -> String {
    "br".to_string()
}

fn default_user_agent() -> String {
    "BusManager/1.0 (Transporte Escolar)".to_string()
}

const fn default_min_interval_ms() -> u64 {
    1000
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            country_filter: default_country_filter(),
            user_agent: default_user_agent(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_hours: 0,
            min_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_hours > 0
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

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must identify the application".to_string());
        }

        Ok(())
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Address could not be resolved to coordinates
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Rate limit exceeded (max 1 req/sec for Nominatim)
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

impl GeocodingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RateLimitExceeded | Self::Timeout
        )
    }
}

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Convert an address search string to geographic coordinates
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodingError>;
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, Coordinate>>,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(config.cache_ttl_hours * 3600))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Mutex::new(None),
        })
    }

    /// Keep at least `min_interval_ms` between two outbound requests
    async fn rate_limit(&self) {
        let min_interval = Duration::from_millis(self.config.min_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                let wait = min_interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn cached(&self, key: &str) -> Option<Coordinate> {
        match &self.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    /// Parse a Nominatim search response; the first result wins
    fn parse_search_response(body: &str, query: &str) -> Result<Coordinate, GeocodingError> {
        let response: NominatimResponse =
            serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let result = response
            .into_results()
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::AddressNotFound(query.to_string()))?;

        let lat = result
            .lat
            .as_f64()
            .ok_or_else(|| GeocodingError::ParseError("Invalid latitude".to_string()))?;
        let lon = result
            .lon
            .as_f64()
            .ok_or_else(|| GeocodingError::ParseError("Invalid longitude".to_string()))?;

        Coordinate::new(lat, lon).map_err(|e| GeocodingError::ParseError(e.to_string()))
    }
}

/// Map a failure while sending or reading the body
fn transport_error(error: &reqwest::Error) -> GeocodingError {
    if error.is_timeout() {
        GeocodingError::Timeout
    } else {
        GeocodingError::ConnectionFailed(error.to_string())
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodingError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodingError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }

        let cache_key = query.to_lowercase();
        if let Some(coordinate) = self.cached(&cache_key).await {
            debug!(%query, "Geocoding cache hit");
            return Ok(coordinate);
        }

        self.rate_limit().await;

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];

        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(%query, "Geocoding address");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&e))?;

        let coordinate = Self::parse_search_response(&body, query)?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, coordinate).await;
        }
        debug!(%query, %coordinate, "Geocoded address");

        Ok(coordinate)
    }
}

/// Raw Nominatim search response: a bare array, or wrapped in `results`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NominatimResponse {
    Bare(Vec<NominatimResult>),
    Wrapped { results: Vec<NominatimResult> },
}

impl NominatimResponse {
    fn into_results(self) -> Vec<NominatimResult> {
        match self {
            Self::Bare(results) | Self::Wrapped { results } => results,
        }
    }
}

/// Raw Nominatim search result
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: RawNumber,
    lon: RawNumber,
}

/// Nominatim sends numbers as strings; plain numbers are accepted as well
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}
