//! Path planning adapter - Implements PathPlanningPort using the OSRM client

use application::error::ApplicationError;
use application::ports::{PathPlanningPort, PlannedPath};
use async_trait::async_trait;
use domain::{Coordinate, RouteGeometry};
use integration_osm::{OsrmConfig, OsrmRoutingClient, Route, RoutingClient, RoutingError};
use tracing::{debug, instrument};

/// Plans driving paths through OSRM
pub struct OsrmPathPlanningAdapter {
    client: OsrmRoutingClient,
}

impl std::fmt::Debug for OsrmPathPlanningAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsrmPathPlanningAdapter")
            .field("client", &"OsrmRoutingClient")
            .finish()
    }
}

impl OsrmPathPlanningAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn new(config: &OsrmConfig) -> Result<Self, ApplicationError> {
        let client = OsrmRoutingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(format!("OSRM client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PathPlanningPort for OsrmPathPlanningAdapter {
    #[instrument(skip(self, waypoints), fields(waypoints = waypoints.len()))]
    async fn plan(&self, waypoints: &[Coordinate]) -> Result<PlannedPath, ApplicationError> {
        let route = self.client.route(waypoints).await.map_err(map_routing_error)?;
        debug!(
            distance_meters = route.distance_meters,
            points = route.geometry.len(),
            "Route planned"
        );
        Ok(into_planned_path(route))
    }
}

fn into_planned_path(route: Route) -> PlannedPath {
    PlannedPath {
        geometry: RouteGeometry::new(route.geometry),
        distance_meters: route.distance_meters,
        duration_seconds: route.duration_seconds,
        snapped_waypoints: route.waypoints.into_iter().map(|w| w.location).collect(),
    }
}

/// Map an OSRM client error onto the application taxonomy
fn map_routing_error(e: RoutingError) -> ApplicationError {
    match e {
        RoutingError::NoRoute { code, message } if message.is_empty() => {
            ApplicationError::NoRoute(code)
        },
        RoutingError::NoRoute { code, message } => {
            ApplicationError::NoRoute(format!("{code}: {message}"))
        },
        RoutingError::InvalidWaypoints(msg) => ApplicationError::Validation(msg),
        RoutingError::Timeout { timeout_secs } => ApplicationError::Timeout { timeout_secs },
        RoutingError::ConnectionFailed(msg) | RoutingError::RequestFailed(msg) => {
            ApplicationError::Network(format!("Routing: {msg}"))
        },
        RoutingError::RateLimitExceeded { .. } => {
            ApplicationError::Network("Routing rate limit exceeded".to_string())
        },
        RoutingError::ParseError(msg) => {
            ApplicationError::Internal(format!("Routing response: {msg}"))
        },
    }
}
