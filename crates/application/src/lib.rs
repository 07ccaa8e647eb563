//! Application layer - Use cases and orchestration
//!
//! Contains the route resolution pipeline (batch geocoding, path planning,
//! itinerary assembly), the route state holder and the port definitions the
//! infrastructure layer implements.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
