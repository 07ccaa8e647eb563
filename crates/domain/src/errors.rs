//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Latitude/longitude outside the geographic range or not finite
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Postal code does not normalize to exactly 8 digits
    #[error("Invalid postal code: {0}")]
    InvalidPostalCode(String),

    /// Address lacks one of the fields required for geocoding
    #[error("Incomplete address: {0}")]
    IncompleteAddress(String),

    /// Itinerary violates one of its structural invariants
    #[error("Invalid itinerary: {0}")]
    InvalidItinerary(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_postal_code_message() {
        let err = DomainError::InvalidPostalCode("1234567".to_string());
        assert_eq!(err.to_string(), "Invalid postal code: 1234567");
    }

    #[test]
    fn incomplete_address_message() {
        let err = DomainError::IncompleteAddress("street is required".to_string());
        assert_eq!(err.to_string(), "Incomplete address: street is required");
    }

    #[test]
    fn invalid_coordinates_message() {
        assert!(DomainError::InvalidCoordinates.to_string().contains("latitude"));
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("name is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: name is required");
    }
}
