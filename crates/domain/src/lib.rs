//! Domain layer for the school transport route planner
//!
//! Contains addresses, coordinates, students and the itinerary model.
//! This layer performs no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
