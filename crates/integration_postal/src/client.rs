//! ViaCEP lookup client
//!
//! Every lookup takes a ticket. Starting a lookup cancels the one currently
//! holding the in-flight slot; the cancelled call resolves to `Ok(None)`.
//! Cache hits never touch the slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use domain::PostalCode;
use moka::future::Cache;
use parking_lot::Mutex;
use reqwest::Client;
use tokio::sync::{oneshot, watch};
use tracing::{debug, instrument};

use crate::config::ViaCepConfig;
use crate::error::PostalCodeError;
use crate::models::{PostalRecord, RawViaCepResponse};

/// Trait for postal code lookup clients
#[async_trait]
pub trait PostalCodeClient: Send + Sync {
    /// Look up a postal code; `Ok(None)` means a newer lookup superseded this one
    async fn lookup(&self, code: &PostalCode) -> Result<Option<PostalRecord>, PostalCodeError>;

    /// Cancel the in-flight lookup, if any
    fn cancel_pending(&self);
}

/// The lookup currently holding the in-flight slot
#[derive(Debug)]
struct InFlight {
    ticket: u64,
    cancel: oneshot::Sender<()>,
}

/// ViaCEP client with result caching and request supersession
#[derive(Debug)]
pub struct ViaCepClient {
    client: Client,
    config: ViaCepConfig,
    cache: Option<Cache<String, PostalRecord>>,
    in_flight: Mutex<Option<InFlight>>,
    next_ticket: AtomicU64,
    loading: watch::Sender<bool>,
}

/// Releases the in-flight slot when a lookup ends or is dropped
struct TicketGuard<'a> {
    owner: &'a ViaCepClient,
    ticket: u64,
}

impl Drop for TicketGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.owner.in_flight.lock();
        if slot.as_ref().is_some_and(|f| f.ticket == self.ticket) {
            *slot = None;
            self.owner.loading.send_replace(false);
        }
    }
}

impl ViaCepClient {
    /// Create a new ViaCEP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &ViaCepConfig) -> Result<Self, PostalCodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PostalCodeError::ConnectionFailed(e.to_string()))?;

        let cache = config
            .caching_enabled()
            .then(|| Cache::builder().max_capacity(config.cache_capacity).build());

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            in_flight: Mutex::new(None),
            next_ticket: AtomicU64::new(0),
            loading: watch::Sender::new(false),
        })
    }

    /// Observe whether a lookup is in flight
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Whether a lookup is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Drop every cached result
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    /// Number of cached results
    pub async fn cache_size(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            },
            None => 0,
        }
    }

    async fn cached(&self, key: &str) -> Option<PostalRecord> {
        match &self.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    /// Take the in-flight slot, cancelling whoever held it
    fn claim_slot(&self) -> (TicketGuard<'_>, oneshot::Receiver<()>) {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let (cancel, cancelled) = oneshot::channel();

        let previous = self
            .in_flight
            .lock()
            .replace(InFlight { ticket, cancel });
        if let Some(previous) = previous {
            debug!(ticket = previous.ticket, "Superseding in-flight postal code lookup");
            // the receiver is gone when that lookup already finished
            let _ = previous.cancel.send(());
        }
        self.loading.send_replace(true);

        (
            TicketGuard {
                owner: self,
                ticket,
            },
            cancelled,
        )
    }

    /// Map a failure while sending or reading the body
    fn transport_error(&self, error: &reqwest::Error) -> PostalCodeError {
        if error.is_timeout() {
            PostalCodeError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            PostalCodeError::ConnectionFailed(error.to_string())
        }
    }

    async fn fetch(&self, code: &PostalCode) -> Result<PostalRecord, PostalCodeError> {
        let url = format!(
            "{}/{}/json/",
            self.config.base_url.trim_end_matches('/'),
            code.digits()
        );

        debug!(%url, "Looking up postal code");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostalCodeError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        let raw: RawViaCepResponse =
            serde_json::from_str(&body).map_err(|e| PostalCodeError::ParseError(e.to_string()))?;

        if raw.is_not_found() {
            return Err(PostalCodeError::NotFound(code.formatted()));
        }

        Ok(raw.into_record(code.clone()))
    }
}

#[async_trait]
impl PostalCodeClient for ViaCepClient {
    #[instrument(skip(self, code), fields(code = %code))]
    async fn lookup(&self, code: &PostalCode) -> Result<Option<PostalRecord>, PostalCodeError> {
        if let Some(record) = self.cached(code.digits()).await {
            debug!("Postal code cache hit");
            return Ok(Some(record));
        }

        let (_guard, cancelled) = self.claim_slot();

        let record = tokio::select! {
            _ = cancelled => {
                debug!("Postal code lookup superseded");
                return Ok(None);
            }
            result = self.fetch(code) => result?,
        };

        if let Some(cache) = &self.cache {
            cache.insert(code.digits().to_string(), record.clone()).await;
        }
        Ok(Some(record))
    }

    fn cancel_pending(&self) {
        if let Some(previous) = self.in_flight.lock().take() {
            debug!(ticket = previous.ticket, "Cancelling in-flight postal code lookup");
            let _ = previous.cancel.send(());
            self.loading.send_replace(false);
        }
    }
}
