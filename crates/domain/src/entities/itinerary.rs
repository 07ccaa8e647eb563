//! Itinerary entity - An ordered, geocoded, drivable route
//!
//! An itinerary is only ever constructed through [`Itinerary::new`], which
//! checks the stop ordering and derives the summary. It is immutable once
//! built; recomputation produces a new value.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Address;
use crate::errors::DomainError;
use crate::value_objects::Coordinate;

/// Role a stop plays in the route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopRole {
    /// Driver's starting point
    Start,
    /// Student pickup
    Student,
    /// Final destination (usually the school)
    End,
}

impl StopRole {
    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Student => "student",
            Self::End => "end",
        }
    }
}

impl fmt::Display for StopRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One geocoded waypoint of an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Address the coordinate was resolved from
    pub address: Address,
    /// Resolved position
    pub coordinate: Coordinate,
    /// Display name ("Ponto de Partida", the student's name, ...)
    pub name: String,
    /// Role tag
    pub role: StopRole,
    /// Zero-based position within the itinerary
    pub order: usize,
    /// Contact phone, for student stops
    #[serde(default)]
    pub phone: Option<String>,
}

/// Path polyline as `[longitude, latitude]` pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    /// Ordered polyline vertices
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteGeometry {
    /// Create a geometry from `[lon, lat]` vertices
    #[must_use]
    pub const fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self { coordinates }
    }

    /// Number of vertices
    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether the polyline has no vertices
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Human-readable itinerary totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItinerarySummary {
    /// Distance formatted as kilometres with two decimals, e.g. `"12.35 km"`
    pub total_distance: String,
    /// Duration rounded to whole minutes, e.g. `"25 min"`
    pub total_duration: String,
    /// Number of stops
    pub total_stops: usize,
    /// Number of student stops
    pub students_count: usize,
}

impl ItinerarySummary {
    fn derive(distance_meters: f64, duration_seconds: f64, stops: &[Stop]) -> Self {
        Self {
            total_distance: format_distance(distance_meters),
            total_duration: format_duration(duration_seconds),
            total_stops: stops.len(),
            students_count: stops
                .iter()
                .filter(|s| s.role == StopRole::Student)
                .count(),
        }
    }
}

/// Format meters as kilometres with two decimals
#[must_use]
pub fn format_distance(distance_meters: f64) -> String {
    format!("{:.2} km", distance_meters / 1000.0)
}

/// Format seconds as whole minutes, rounded to nearest
#[must_use]
pub fn format_duration(duration_seconds: f64) -> String {
    format!("{} min", (duration_seconds / 60.0).round())
}

/// A computed route: geometry, totals and the ordered stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItineraryRecord")]
pub struct Itinerary {
    geometry: RouteGeometry,
    distance_meters: f64,
    duration_seconds: f64,
    stops: Vec<Stop>,
    summary: ItinerarySummary,
    computed_at: DateTime<Utc>,
}

/// Serialized form; the summary is always re-derived on load
#[derive(Deserialize)]
struct ItineraryRecord {
    geometry: RouteGeometry,
    distance_meters: f64,
    duration_seconds: f64,
    stops: Vec<Stop>,
    computed_at: DateTime<Utc>,
}

impl TryFrom<ItineraryRecord> for Itinerary {
    type Error = DomainError;

    fn try_from(record: ItineraryRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.geometry,
            record.distance_meters,
            record.duration_seconds,
            record.stops,
            record.computed_at,
        )
    }
}

impl Itinerary {
    /// Assemble an itinerary, checking its invariants
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidItinerary` when fewer than two stops are
    /// given, when `order` does not match each stop's position, or when the
    /// totals are negative or not finite.
    pub fn new(
        geometry: RouteGeometry,
        distance_meters: f64,
        duration_seconds: f64,
        stops: Vec<Stop>,
        computed_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if stops.len() < 2 {
            return Err(DomainError::InvalidItinerary(format!(
                "an itinerary needs at least 2 stops, got {}",
                stops.len()
            )));
        }

        if let Some((position, stop)) = stops
            .iter()
            .enumerate()
            .find(|(position, stop)| stop.order != *position)
        {
            return Err(DomainError::InvalidItinerary(format!(
                "stop at position {position} has order {}",
                stop.order
            )));
        }

        for (name, value) in [
            ("distance", distance_meters),
            ("duration", duration_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidItinerary(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }

        let summary = ItinerarySummary::derive(distance_meters, duration_seconds, &stops);

        Ok(Self {
            geometry,
            distance_meters,
            duration_seconds,
            stops,
            summary,
            computed_at,
        })
    }

    /// Path polyline
    #[must_use]
    pub const fn geometry(&self) -> &RouteGeometry {
        &self.geometry
    }

    /// Total distance in meters
    #[must_use]
    pub const fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Total duration in seconds
    #[must_use]
    pub const fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Stops in driving order
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Derived summary
    #[must_use]
    pub const fn summary(&self) -> &ItinerarySummary {
        &self.summary
    }

    /// When the itinerary was computed
    #[must_use]
    pub const fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    /// Google Maps directions link visiting every stop in order
    #[must_use]
    pub fn navigation_url(&self) -> String {
        let waypoints: Vec<String> = self
            .stops
            .iter()
            .map(|s| {
                format!(
                    "{},{}",
                    s.coordinate.latitude(),
                    s.coordinate.longitude()
                )
            })
            .collect();
        format!("https://www.google.com/maps/dir/{}", waypoints.join("/"))
    }
}
