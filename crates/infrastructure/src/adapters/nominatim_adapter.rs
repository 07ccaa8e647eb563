//! Geocoding adapter - Implements GeocodingPort using the Nominatim client

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{Address, Coordinate};
use integration_osm::{GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient};
use tracing::{debug, instrument};

/// Resolves addresses through Nominatim
pub struct NominatimGeocodingAdapter {
    client: NominatimGeocodingClient,
    timeout_secs: u64,
}

impl std::fmt::Debug for NominatimGeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocodingAdapter")
            .field("client", &"NominatimGeocodingClient")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl NominatimGeocodingAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn new(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(format!("Nominatim client: {e}")))?;
        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl GeocodingPort for NominatimGeocodingAdapter {
    #[instrument(skip(self, address), fields(city = %address.city))]
    async fn resolve(&self, address: &Address) -> Result<Coordinate, ApplicationError> {
        address
            .validate()
            .map_err(|e| ApplicationError::Validation(e.to_string()))?;

        let query = address.search_query();
        debug!(%query, "Resolving address");

        self.client
            .geocode(&query)
            .await
            .map_err(|e| map_geocoding_error(e, self.timeout_secs))
    }
}

/// Map a Nominatim client error onto the application taxonomy
fn map_geocoding_error(e: GeocodingError, timeout_secs: u64) -> ApplicationError {
    match e {
        GeocodingError::AddressNotFound(query) => ApplicationError::NotFound(query),
        GeocodingError::Timeout => ApplicationError::Timeout { timeout_secs },
        GeocodingError::ConnectionFailed(msg) | GeocodingError::RequestFailed(msg) => {
            ApplicationError::Network(format!("Geocoding: {msg}"))
        },
        GeocodingError::RateLimitExceeded => {
            ApplicationError::Network("Geocoding rate limit exceeded".to_string())
        },
        GeocodingError::ParseError(msg) => {
            ApplicationError::Internal(format!("Geocoding response: {msg}"))
        },
    }
}
