//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod postal_code;

pub use coordinate::Coordinate;
pub use postal_code::{POSTAL_CODE_LENGTH, PostalCode};
