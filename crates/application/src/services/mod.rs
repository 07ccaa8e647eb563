//! Application services - Use case implementations

mod address_autofill;
mod batch_geocoder;
mod itinerary_builder;
mod route_service;
mod route_state;
mod student_roster;

pub use address_autofill::AddressAutofill;
pub use batch_geocoder::{BatchGeocoder, BatchGeocoderConfig};
pub use itinerary_builder::{END_STOP_NAME, ItineraryBuilder, START_STOP_NAME};
pub use route_service::RouteService;
pub use route_state::{RouteState, StorageKeys};
pub use student_roster::StudentRoster;
