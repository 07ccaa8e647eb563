//! Postal code lookup error types

use thiserror::Error;

/// Errors that can occur during a postal code lookup
#[derive(Debug, Error)]
pub enum PostalCodeError {
    /// Connection to the lookup service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the lookup service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the lookup response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The service does not know the code
    #[error("Postal code not found: {0}")]
    NotFound(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl PostalCodeError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(PostalCodeError::ConnectionFailed("reset".to_string()).is_retryable());
        assert!(PostalCodeError::Timeout { timeout_secs: 5 }.is_retryable());
        assert!(!PostalCodeError::NotFound("99999999".to_string()).is_retryable());
        assert!(!PostalCodeError::ParseError("x".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = PostalCodeError::NotFound("01310-100".to_string());
        assert_eq!(err.to_string(), "Postal code not found: 01310-100");
    }
}
