//! Postal-code address autofill
//!
//! Normalizes the entered code before anything goes over the network and
//! turns the lookup result into a form-ready [`Address`].

use std::sync::Arc;

use domain::{Address, PostalCode};
use tracing::{debug, instrument};

use crate::{
    error::ApplicationError,
    ports::{PostalAddress, PostalCodePort},
};

/// Looks up addresses by postal code
#[derive(Clone)]
pub struct AddressAutofill {
    port: Arc<dyn PostalCodePort>,
}

impl std::fmt::Debug for AddressAutofill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressAutofill").finish_non_exhaustive()
    }
}

impl AddressAutofill {
    /// Create an autofill service
    #[must_use]
    pub fn new(port: Arc<dyn PostalCodePort>) -> Self {
        Self { port }
    }

    /// Look up the address for a raw postal code
    ///
    /// Returns `Ok(None)` when a newer lookup superseded this one.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the input does not hold exactly eight
    /// digits; no request is made in that case. Unknown codes are
    /// `NotFound`.
    #[instrument(skip(self))]
    pub async fn lookup(&self, raw: &str) -> Result<Option<PostalAddress>, ApplicationError> {
        let code =
            PostalCode::parse(raw).map_err(|e| ApplicationError::Validation(e.to_string()))?;
        let found = self.port.lookup(&code).await?;
        debug!(%code, found = found.is_some(), "Postal code lookup finished");
        Ok(found)
    }

    /// Look up a postal code and build an address with the given house number
    ///
    /// # Errors
    ///
    /// Same as [`lookup`](Self::lookup).
    pub async fn autofill(
        &self,
        raw: &str,
        number: &str,
    ) -> Result<Option<Address>, ApplicationError> {
        Ok(self
            .lookup(raw)
            .await?
            .map(|found| found.into_address(number)))
    }

    /// Abandon the lookup in flight, if any
    pub fn cancel_pending(&self) {
        self.port.cancel_pending();
    }
}
