//! OSRM routing client
//!
//! Plans a drivable route through an ordered list of waypoints using the
//! `/route` service of an [OSRM](https://project-osrm.org) server. The
//! waypoint order is kept as given; no trip optimization is requested.

use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::config::OsrmConfig;
use crate::error::RoutingError;
use crate::models::{RawRoute, RawRouteResponse, RawWaypoint, Route, SnappedWaypoint};

/// Trait for routing clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Plan a route visiting `waypoints` in the given order
    async fn route(&self, waypoints: &[Coordinate]) -> Result<Route, RoutingError>;
}

/// OSRM-based routing client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM routing client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Build the `/route` URL; coordinates go in `lon,lat` order
    fn route_url(&self, waypoints: &[Coordinate]) -> String {
        let path: Vec<String> = waypoints
            .iter()
            .map(|c| {
                let (lon, lat) = c.lon_lat();
                format!("{lon},{lat}")
            })
            .collect();

        format!(
            "{}/route/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            path.join(";")
        )
    }

    /// Parse the raw OSRM JSON response into a typed route
    fn parse_route_response(body: &str) -> Result<Route, RoutingError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if raw.code != "Ok" {
            return Err(RoutingError::NoRoute {
                message: raw.message.unwrap_or_default(),
                code: raw.code,
            });
        }

        let Some(route) = raw.routes.into_iter().next() else {
            return Err(RoutingError::NoRoute {
                code: raw.code,
                message: "response contained no routes".to_string(),
            });
        };

        let waypoints = raw
            .waypoints
            .into_iter()
            .map(Self::convert_waypoint)
            .collect::<Result<Vec<_>, _>>()?;

        Self::convert_route(route, waypoints)
    }

    /// Convert a raw route, falling back to its `summary` for the totals
    fn convert_route(raw: RawRoute, waypoints: Vec<SnappedWaypoint>) -> Result<Route, RoutingError> {
        let summary = raw.summary.as_ref();
        let distance_meters = raw
            .distance
            .or_else(|| summary.and_then(|s| s.distance))
            .ok_or_else(|| RoutingError::ParseError("route has no distance".to_string()))?;
        let duration_seconds = raw
            .duration
            .or_else(|| summary.and_then(|s| s.duration))
            .ok_or_else(|| RoutingError::ParseError("route has no duration".to_string()))?;

        Ok(Route {
            geometry: raw.geometry.coordinates,
            distance_meters,
            duration_seconds,
            waypoints,
        })
    }

    /// Map a failure while sending or reading the body
    fn transport_error(&self, error: &reqwest::Error) -> RoutingError {
        if error.is_timeout() {
            RoutingError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            RoutingError::ConnectionFailed(error.to_string())
        }
    }

    fn convert_waypoint(raw: RawWaypoint) -> Result<SnappedWaypoint, RoutingError> {
        let [lon, lat] = raw.location;
        let location = Coordinate::from_lon_lat(lon, lat)
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        Ok(SnappedWaypoint {
            location,
            name: raw.name,
            waypoint_index: raw.waypoint_index,
        })
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self, waypoints), fields(waypoints = waypoints.len()))]
    async fn route(&self, waypoints: &[Coordinate]) -> Result<Route, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::InvalidWaypoints(format!(
                "at least 2 waypoints are required, got {}",
                waypoints.len()
            )));
        }

        let url = self.route_url(waypoints);
        let params = [
            ("overview", "full"),
            ("geometries", "geojson"),
            ("steps", "false"),
        ];

        debug!(%url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        // OSRM reports NoRoute/NoSegment with HTTP 400 and a JSON body
        if !status.is_success() && status != StatusCode::BAD_REQUEST {
            return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let route = match Self::parse_route_response(&body) {
            Err(RoutingError::ParseError(_)) if !status.is_success() => {
                return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
            },
            other => other?,
        };

        debug!(
            distance = route.distance_meters,
            duration = route.duration_seconds,
            vertices = route.geometry.len(),
            "Route planned"
        );
        Ok(route)
    }
}
