//! Itinerary assembly
//!
//! Orders the stops as start, every student marked as going (roster order),
//! then end; geocodes them through the [`BatchGeocoder`]; drops the entries
//! that failed; asks the path planner for the drivable route and tags the
//! surviving stops with their role and a dense order.

use std::sync::Arc;

use chrono::Utc;
use domain::{Address, Coordinate, Itinerary, Stop, StopRole, Student};
use tracing::{info, instrument, warn};

use crate::{error::ApplicationError, ports::PathPlanningPort, services::BatchGeocoder};

/// Display name of the start stop
pub const START_STOP_NAME: &str = "Ponto de Partida";

/// Display name of the end stop
pub const END_STOP_NAME: &str = "Ponto de Chegada";

/// Where an entry of the address sequence came from
enum StopSource<'a> {
    Start(&'a Address),
    Student(&'a Student),
    End(&'a Address),
}

impl StopSource<'_> {
    const fn address(&self) -> &Address {
        match self {
            Self::Start(address) | Self::End(address) => address,
            Self::Student(student) => &student.address,
        }
    }

    fn into_stop(self, coordinate: Coordinate, order: usize) -> Stop {
        let (address, name, role, phone) = match self {
            Self::Start(address) => (address, START_STOP_NAME.to_string(), StopRole::Start, None),
            Self::End(address) => (address, END_STOP_NAME.to_string(), StopRole::End, None),
            Self::Student(student) => (
                &student.address,
                student.name.clone(),
                StopRole::Student,
                student.contact_phone().map(str::to_string),
            ),
        };

        Stop {
            address: address.clone(),
            coordinate,
            name,
            role,
            order,
            phone,
        }
    }
}

/// Builds an [`Itinerary`] from the roster and the route endpoints
#[derive(Clone)]
pub struct ItineraryBuilder {
    geocoder: BatchGeocoder,
    planner: Arc<dyn PathPlanningPort>,
}

impl std::fmt::Debug for ItineraryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItineraryBuilder")
            .field("geocoder", &self.geocoder)
            .finish_non_exhaustive()
    }
}

impl ItineraryBuilder {
    /// Create a builder
    #[must_use]
    pub fn new(geocoder: BatchGeocoder, planner: Arc<dyn PathPlanningPort>) -> Self {
        Self { geocoder, planner }
    }

    /// Build the itinerary for the students currently marked as going
    ///
    /// # Errors
    ///
    /// - `MissingEndpoints` when start or end is unset
    /// - `Validation` when start or end lacks street, number or city
    /// - `NoStudentsSelected` when no student is going
    /// - `InsufficientGeocoding` when fewer than two addresses resolved
    /// - whatever the path planner reports (`NoRoute`, `Network`, ...)
    #[instrument(skip_all, fields(students = students.len()))]
    pub async fn build(
        &self,
        students: &[Student],
        start: Option<&Address>,
        end: Option<&Address>,
    ) -> Result<Itinerary, ApplicationError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(ApplicationError::MissingEndpoints);
        };
        for (label, address) in [("start", start), ("end", end)] {
            address
                .validate()
                .map_err(|e| ApplicationError::Validation(format!("{label}: {e}")))?;
        }

        let going: Vec<&Student> = students.iter().filter(|s| s.going).collect();
        if going.is_empty() {
            return Err(ApplicationError::NoStudentsSelected);
        }

        let sources: Vec<StopSource<'_>> = std::iter::once(StopSource::Start(start))
            .chain(going.into_iter().map(StopSource::Student))
            .chain(std::iter::once(StopSource::End(end)))
            .collect();
        let submitted = sources.len();

        let addresses: Vec<Address> = sources.iter().map(|s| s.address().clone()).collect();
        let coordinates = self.geocoder.resolve_all(&addresses).await;

        let survivors: Vec<(StopSource<'_>, Coordinate)> = sources
            .into_iter()
            .zip(coordinates)
            .filter_map(|(source, coordinate)| coordinate.map(|c| (source, c)))
            .collect();

        if survivors.len() < 2 {
            return Err(ApplicationError::InsufficientGeocoding {
                resolved: survivors.len(),
                submitted,
            });
        }
        if survivors.len() < submitted {
            warn!(
                resolved = survivors.len(),
                submitted, "Some stops could not be geocoded and were dropped"
            );
        }

        let waypoints: Vec<Coordinate> = survivors.iter().map(|(_, c)| *c).collect();
        let path = self.planner.plan(&waypoints).await?;

        let stops: Vec<Stop> = survivors
            .into_iter()
            .enumerate()
            .map(|(order, (source, coordinate))| source.into_stop(coordinate, order))
            .collect();

        let itinerary = Itinerary::new(
            path.geometry,
            path.distance_meters,
            path.duration_seconds,
            stops,
            Utc::now(),
        )?;

        info!(
            stops = itinerary.stops().len(),
            distance = %itinerary.summary().total_distance,
            duration = %itinerary.summary().total_duration,
            "Itinerary built"
        );

        Ok(itinerary)
    }
}
