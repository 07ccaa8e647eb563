//! Postal code adapter - Implements PostalCodePort using the ViaCEP client

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{PostalAddress, PostalCodePort};
use async_trait::async_trait;
use domain::PostalCode;
use integration_postal::{PostalCodeClient, PostalCodeError, PostalRecord, ViaCepClient, ViaCepConfig};
use tokio::sync::watch;
use tracing::instrument;

/// Looks up postal codes through ViaCEP
#[derive(Debug, Clone)]
pub struct ViaCepAdapter {
    client: Arc<ViaCepClient>,
}

impl ViaCepAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn new(config: &ViaCepConfig) -> Result<Self, ApplicationError> {
        let client = ViaCepClient::new(config)
            .map_err(|e| ApplicationError::Configuration(format!("ViaCEP client: {e}")))?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Observe whether a lookup is in flight
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.client.subscribe_loading()
    }
}

#[async_trait]
impl PostalCodePort for ViaCepAdapter {
    #[instrument(skip(self, code), fields(code = %code))]
    async fn lookup(&self, code: &PostalCode) -> Result<Option<PostalAddress>, ApplicationError> {
        let record = self.client.lookup(code).await.map_err(map_postal_error)?;
        Ok(record.map(into_postal_address))
    }

    fn cancel_pending(&self) {
        self.client.cancel_pending();
    }
}

fn into_postal_address(record: PostalRecord) -> PostalAddress {
    PostalAddress {
        postal_code: record.postal_code,
        street: record.street,
        complement: record.complement,
        neighborhood: record.neighborhood,
        city: record.city,
        state: record.state,
    }
}

/// Map a ViaCEP client error onto the application taxonomy
fn map_postal_error(e: PostalCodeError) -> ApplicationError {
    match e {
        PostalCodeError::NotFound(code) => ApplicationError::NotFound(format!("postal code {code}")),
        PostalCodeError::Timeout { timeout_secs } => ApplicationError::Timeout { timeout_secs },
        PostalCodeError::ConnectionFailed(msg) | PostalCodeError::RequestFailed(msg) => {
            ApplicationError::Network(format!("Postal code lookup: {msg}"))
        },
        PostalCodeError::ParseError(msg) => {
            ApplicationError::Internal(format!("Postal code response: {msg}"))
        },
    }
}
