//! Routing data models

use domain::Coordinate;
use serde::{Deserialize, Serialize};

/// A drivable route through an ordered list of waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Polyline as `[longitude, latitude]` pairs
    pub geometry: Vec<[f64; 2]>,
    /// Total distance in meters
    pub distance_meters: f64,
    /// Total duration in seconds
    pub duration_seconds: f64,
    /// Waypoints as snapped to the road network, in request order
    pub waypoints: Vec<SnappedWaypoint>,
}

/// A requested waypoint after snapping to the nearest road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnappedWaypoint {
    /// Snapped position
    pub location: Coordinate,
    /// Name of the street the waypoint snapped to (may be empty)
    pub name: String,
    /// Position of the waypoint in the optimized order, when reported
    pub waypoint_index: Option<usize>,
}

/// Raw OSRM `/route` response
#[derive(Debug, Deserialize)]
pub(crate) struct RawRouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
    #[serde(default)]
    pub waypoints: Vec<RawWaypoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoute {
    pub geometry: RawGeometry,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub summary: Option<RawSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeometry {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSummary {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawWaypoint {
    /// `[longitude, latitude]`
    pub location: [f64; 2],
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub waypoint_index: Option<usize>,
}
