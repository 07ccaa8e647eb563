//! Postal code lookup port
//!
//! Address autofill from a Brazilian postal code (CEP).

use async_trait::async_trait;
use domain::{Address, PostalCode};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Structured address returned by a postal code lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    /// The code that was looked up
    pub postal_code: PostalCode,
    /// Street name, empty for city-wide codes
    pub street: String,
    /// Complement (building, range of numbers)
    pub complement: Option<String>,
    /// Neighborhood
    pub neighborhood: Option<String>,
    /// City
    pub city: String,
    /// State abbreviation
    pub state: String,
}

impl PostalAddress {
    /// Turn the lookup result into an address once the house number is known
    pub fn into_address(self, number: impl Into<String>) -> Address {
        Address {
            street: self.street,
            number: number.into(),
            neighborhood: self.neighborhood.filter(|n| !n.trim().is_empty()),
            city: self.city,
            state: Some(self.state).filter(|s| !s.trim().is_empty()),
            postal_code: Some(self.postal_code.digits().to_string()),
        }
    }
}

/// Port for postal code lookups
///
/// Starting a lookup supersedes any lookup still in flight on the same port;
/// the superseded call resolves to `Ok(None)`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PostalCodePort: Send + Sync {
    /// Look up a postal code; `Ok(None)` means the call was superseded
    async fn lookup(&self, code: &PostalCode) -> Result<Option<PostalAddress>, ApplicationError>;

    /// Cancel the in-flight lookup, if any
    fn cancel_pending(&self);
}
