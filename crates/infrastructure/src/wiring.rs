//! Service wiring
//!
//! Builds the application services from configuration: adapters for the
//! external services, the configured key-value store, and the route
//! pipeline on top of them.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{
    GeocodingPort, KeyValueStorePort, PathPlanningPort, PostalCodePort, TokioPacer,
};
use application::services::{
    AddressAutofill, BatchGeocoder, ItineraryBuilder, RouteService, RouteState, StudentRoster,
};
use tracing::{debug, instrument};

use crate::adapters::{NominatimGeocodingAdapter, OsrmPathPlanningAdapter, ViaCepAdapter};
use crate::config::{AppConfig, StorageBackend, StorageConfig};
use crate::persistence::{InMemoryStore, JsonFileStore};

/// External collaborators of the route pipeline
#[derive(Clone)]
pub struct Ports {
    /// Durable key-value storage
    pub store: Arc<dyn KeyValueStorePort>,
    /// Single-address geocoding
    pub geocoding: Arc<dyn GeocodingPort>,
    /// Path planning through ordered waypoints
    pub path_planning: Arc<dyn PathPlanningPort>,
    /// Postal code lookup
    pub postal_code: Arc<dyn PostalCodePort>,
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Fully wired application services
#[derive(Debug, Clone)]
pub struct Services {
    /// Route configuration and last itinerary
    pub state: Arc<RouteState>,
    /// Itinerary computation
    pub route: RouteService,
    /// Enrolled students
    pub roster: StudentRoster,
    /// Postal code autofill
    pub autofill: AddressAutofill,
}

impl Services {
    /// Wire the services from configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for invalid settings and `Storage` when the
    /// data file cannot be opened.
    #[instrument(skip_all)]
    pub async fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;

        let ports = Ports {
            store: open_store(&config.storage).await?,
            geocoding: Arc::new(NominatimGeocodingAdapter::new(&config.nominatim)?),
            path_planning: Arc::new(OsrmPathPlanningAdapter::new(&config.osrm)?),
            postal_code: Arc::new(ViaCepAdapter::new(&config.viacep)?),
        };

        Self::assemble(config, ports).await
    }

    /// Wire the services on top of the given ports
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the persisted state cannot be read.
    pub async fn assemble(config: &AppConfig, ports: Ports) -> Result<Self, ApplicationError> {
        let keys = config.storage.keys();

        let geocoder = BatchGeocoder::new(
            ports.geocoding,
            Arc::new(TokioPacer),
            config.geocoding.to_batch_config(),
        );
        let builder = ItineraryBuilder::new(geocoder, ports.path_planning);

        let roster = StudentRoster::new(Arc::clone(&ports.store), keys.students.clone());
        let state = Arc::new(RouteState::initialize(ports.store, keys).await?);

        debug!("Services wired");
        Ok(Self {
            route: RouteService::new(Arc::clone(&state), builder),
            state,
            roster,
            autofill: AddressAutofill::new(ports.postal_code),
        })
    }
}

/// Open the configured key-value store
///
/// # Errors
///
/// Returns `Storage` when the data file exists but cannot be read.
pub async fn open_store(
    config: &StorageConfig,
) -> Result<Arc<dyn KeyValueStorePort>, ApplicationError> {
    match config.backend {
        StorageBackend::File => Ok(Arc::new(JsonFileStore::open(config.path.clone()).await?)),
        StorageBackend::Memory => Ok(Arc::new(InMemoryStore::new())),
    }
}
