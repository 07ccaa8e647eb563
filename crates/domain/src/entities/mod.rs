//! Domain entities - Objects with identity and lifecycle

mod address;
mod itinerary;
mod route_configuration;
mod student;

pub use address::Address;
pub use itinerary::{
    Itinerary, ItinerarySummary, RouteGeometry, Stop, StopRole, format_distance, format_duration,
};
pub use route_configuration::RouteConfiguration;
pub use student::{NAME_MIN_LENGTH, PHONE_MIN_DIGITS, Student, StudentId};
