//! Path planning port
//!
//! Computes a drivable polyline through an ordered list of coordinates.
//! Waypoints are visited exactly in the given order.

use async_trait::async_trait;
use domain::{Coordinate, RouteGeometry};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Result of planning a path through the waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedPath {
    /// Polyline of the whole path
    pub geometry: RouteGeometry,
    /// Total distance in meters
    pub distance_meters: f64,
    /// Total duration in seconds
    pub duration_seconds: f64,
    /// Input waypoints as snapped onto the road network, in input order
    pub snapped_waypoints: Vec<Coordinate>,
}

/// Port for computing a path through ordered waypoints
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PathPlanningPort: Send + Sync {
    /// Plan a path visiting `waypoints` in order (at least two)
    ///
    /// Fails with `NoRoute` when the backend has no candidate path.
    async fn plan(&self, waypoints: &[Coordinate]) -> Result<PlannedPath, ApplicationError>;
}
