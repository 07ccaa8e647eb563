//! Route computation entry point
//!
//! Ties the itinerary builder to the route state: the previous itinerary is
//! cleared, a new one is built from the current endpoints, and on success it
//! becomes the stored itinerary.

use std::sync::Arc;

use domain::{Itinerary, Student};
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    services::{ItineraryBuilder, RouteState},
};

/// Computes and stores itineraries
#[derive(Debug, Clone)]
pub struct RouteService {
    state: Arc<RouteState>,
    builder: ItineraryBuilder,
}

impl RouteService {
    /// Create a route service
    #[must_use]
    pub const fn new(state: Arc<RouteState>, builder: ItineraryBuilder) -> Self {
        Self { state, builder }
    }

    /// Shared route state
    #[must_use]
    pub const fn state(&self) -> &Arc<RouteState> {
        &self.state
    }

    /// Recompute the itinerary for the given roster
    ///
    /// # Errors
    ///
    /// Propagates the builder's errors; the previous itinerary stays
    /// cleared in that case.
    #[instrument(skip_all, fields(students = students.len()))]
    pub async fn compute(&self, students: &[Student]) -> Result<Arc<Itinerary>, ApplicationError> {
        let configuration = self.state.configuration();
        self.state.clear_itinerary().await?;

        let itinerary = self
            .builder
            .build(
                students,
                configuration.start.as_ref(),
                configuration.end.as_ref(),
            )
            .await?;

        let stored = self.state.replace_itinerary(itinerary).await?;
        info!(stops = stored.stops().len(), "Itinerary stored");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use domain::{Address, Coordinate, RouteGeometry};

    use super::*;
    use crate::{
        ports::{
            MockGeocodingPort, MockKeyValueStorePort, MockPacer, MockPathPlanningPort, PlannedPath,
        },
        services::{BatchGeocoder, BatchGeocoderConfig, StorageKeys},
    };

    fn store() -> MockKeyValueStorePort {
        let mut store = MockKeyValueStorePort::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_set().returning(|_, _| Ok(()));
        store.expect_remove().returning(|_| Ok(()));
        store
    }

    fn builder(planner: MockPathPlanningPort) -> ItineraryBuilder {
        let mut resolver = MockGeocodingPort::new();
        resolver
            .expect_resolve()
            .returning(|a| Coordinate::new(-23.5 - a.street.len() as f64 / 1000.0, -46.6).map_err(Into::into));
        let mut pacer = MockPacer::new();
        pacer.expect_pause().returning(|_| ());
        let geocoder = BatchGeocoder::new(
            Arc::new(resolver),
            Arc::new(pacer),
            BatchGeocoderConfig {
                delay: Duration::ZERO,
                max_retries: 0,
            },
        );
        ItineraryBuilder::new(geocoder, Arc::new(planner))
    }

    fn planner() -> MockPathPlanningPort {
        let mut planner = MockPathPlanningPort::new();
        planner.expect_plan().returning(|w| {
            Ok(PlannedPath {
                geometry: RouteGeometry::default(),
                distance_meters: 5_000.0,
                duration_seconds: 600.0,
                snapped_waypoints: w.to_vec(),
            })
        });
        planner
    }

    async fn service(planner: MockPathPlanningPort) -> RouteService {
        let state = RouteState::initialize(Arc::new(store()), StorageKeys::default())
            .await
            .unwrap();
        RouteService::new(Arc::new(state), builder(planner))
    }

    fn roster() -> Vec<Student> {
        vec![Student::new(
            1,
            "Ana",
            "11999990000",
            Address::new("Rua A", "10", "São Paulo"),
        )]
    }

    async fn with_endpoints(service: &RouteService) {
        service
            .state()
            .set_start(Address::new("Rua da Garagem", "1", "São Paulo"))
            .await
            .unwrap();
        service
            .state()
            .set_end(Address::new("Rua da Escola", "200", "São Paulo"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn compute_stores_itinerary() {
        let service = service(planner()).await;
        with_endpoints(&service).await;

        let itinerary = service.compute(&roster()).await.unwrap();
        assert_eq!(itinerary.stops().len(), 3);
        assert!(service.state().has_itinerary());
        assert_eq!(itinerary.summary().total_distance, "5.00 km");
    }

    #[tokio::test]
    async fn compute_without_endpoints_fails() {
        let service = service(MockPathPlanningPort::new()).await;
        let err = service.compute(&roster()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::MissingEndpoints));
        assert!(!service.state().has_itinerary());
    }

    #[tokio::test]
    async fn compute_with_incomplete_start_is_validation_error() {
        let mut planner = MockPathPlanningPort::new();
        planner.expect_plan().never();
        let service = service(planner).await;
        with_endpoints(&service).await;
        service
            .state()
            .set_start(Address::new("", "1", "São Paulo"))
            .await
            .unwrap();

        let err = service.compute(&roster()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
        assert!(!service.state().has_itinerary());
    }

    #[tokio::test]
    async fn failed_recompute_clears_previous_itinerary() {
        let mut planner = MockPathPlanningPort::new();
        let mut calls = 0;
        planner.expect_plan().returning(move |w| {
            calls += 1;
            if calls == 1 {
                Ok(PlannedPath {
                    geometry: RouteGeometry::default(),
                    distance_meters: 1.0,
                    duration_seconds: 1.0,
                    snapped_waypoints: w.to_vec(),
                })
            } else {
                Err(ApplicationError::NoRoute("NoRoute".into()))
            }
        });

        let service = service(planner).await;
        with_endpoints(&service).await;

        service.compute(&roster()).await.unwrap();
        assert!(service.state().has_itinerary());

        let err = service.compute(&roster()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NoRoute(_)));
        assert!(!service.state().has_itinerary());
    }
}
