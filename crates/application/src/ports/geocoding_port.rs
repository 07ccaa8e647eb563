//! Geocoding port
//!
//! Converts one postal address into a coordinate. Implementations call an
//! external geocoding service and must not retry internally; retries are the
//! caller's policy.

use async_trait::async_trait;
use domain::{Address, Coordinate};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for resolving a single address
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve an address to its highest-relevance coordinate
    ///
    /// Fails with `Validation` for an incomplete address, `NotFound` when the
    /// service has no candidate, and `Network`/`Timeout` on transport failure.
    async fn resolve(&self, address: &Address) -> Result<Coordinate, ApplicationError>;
}
