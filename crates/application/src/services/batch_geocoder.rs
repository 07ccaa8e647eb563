//! Batch geocoding with pacing and per-address failure tolerance
//!
//! Addresses are drained from a work queue one at a time. After every request
//! except the last the worker pauses for the configured delay, so a shared
//! public geocoder never sees more than one request per interval from us.
//! A failing address leaves a `None` at its position; it never aborts the batch.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use domain::{Address, Coordinate};
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{GeocodingPort, Pacer},
};

/// Pacing and retry policy for batch geocoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchGeocoderConfig {
    /// Pause between consecutive requests
    pub delay: Duration,
    /// Extra attempts for an address whose failure is retryable
    pub max_retries: u32,
}

impl Default for BatchGeocoderConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
            max_retries: 3,
        }
    }
}

/// Sequential geocoder over many addresses
#[derive(Clone)]
pub struct BatchGeocoder {
    resolver: Arc<dyn GeocodingPort>,
    pacer: Arc<dyn Pacer>,
    config: BatchGeocoderConfig,
}

impl std::fmt::Debug for BatchGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchGeocoder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BatchGeocoder {
    /// Create a batch geocoder
    #[must_use]
    pub fn new(
        resolver: Arc<dyn GeocodingPort>,
        pacer: Arc<dyn Pacer>,
        config: BatchGeocoderConfig,
    ) -> Self {
        Self {
            resolver,
            pacer,
            config,
        }
    }

    /// Resolve every address, preserving length and position
    ///
    /// `result[i]` is `None` exactly when `addresses[i]` could not be
    /// resolved.
    #[instrument(skip(self, addresses), fields(count = addresses.len()))]
    pub async fn resolve_all(&self, addresses: &[Address]) -> Vec<Option<Coordinate>> {
        let mut results = vec![None; addresses.len()];
        let mut queue: VecDeque<(usize, &Address)> = addresses.iter().enumerate().collect();

        while let Some((index, address)) = queue.pop_front() {
            match self.resolve_with_retry(address).await {
                Ok(coordinate) => {
                    debug!(index, %coordinate, "Address geocoded");
                    results[index] = Some(coordinate);
                },
                Err(e) => {
                    warn!(index, %address, error = %e, "Failed to geocode address, leaving a gap");
                },
            }

            if !queue.is_empty() {
                self.pacer.pause(self.config.delay).await;
            }
        }

        results
    }

    async fn resolve_with_retry(&self, address: &Address) -> Result<Coordinate, ApplicationError> {
        let mut attempt = 0;
        loop {
            match self.resolver.resolve(address).await {
                Ok(coordinate) => return Ok(coordinate),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    debug!(attempt, error = %e, "Retrying geocoding request");
                    self.pacer.pause(self.config.delay).await;
                },
                Err(e) => return Err(e),
            }
        }
    }
}
