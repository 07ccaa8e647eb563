//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Missing or malformed input, rejected before any network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A lookup returned no candidates
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport-level failure talking to an external service
    #[error("Network error: {0}")]
    Network(String),

    /// An outbound call exceeded its bounded wait
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// Configured timeout in seconds
        timeout_secs: u64,
    },

    /// The routing backend returned no candidate path
    #[error("No route: {0}")]
    NoRoute(String),

    /// Start and/or end point not configured
    #[error("Start and end points must both be configured")]
    MissingEndpoints,

    /// No student is flagged as going on this trip
    #[error("No students selected for this trip")]
    NoStudentsSelected,

    /// Fewer than two addresses could be geocoded
    #[error("Only {resolved} of {submitted} addresses could be geocoded; at least 2 are needed")]
    InsufficientGeocoding {
        /// Addresses that produced a coordinate
        resolved: usize,
        /// Addresses submitted for geocoding
        submitted: usize,
    },

    /// Persistence collaborator failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }
}
