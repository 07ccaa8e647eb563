//! Key-value persistence port
//!
//! Durable string storage keyed by name, the shape of browser local storage.
//! Values are JSON documents; the typed extension tolerates malformed stored
//! JSON by discarding it.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::error::ApplicationError;

/// Port for durable key-value storage of raw JSON strings
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStorePort: Send + Sync + std::fmt::Debug {
    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> Result<(), ApplicationError>;

    /// Delete the value stored under `key`; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<(), ApplicationError>;
}

/// Typed JSON operations on top of the raw string interface
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStorePort {
    /// Load and deserialize the value under `key`
    ///
    /// A value that fails to parse is removed from the store and reported as
    /// absent.
    async fn load<T>(&self, key: &str) -> Result<Option<T>, ApplicationError>
    where
        T: DeserializeOwned + Send,
    {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(%key, error = %e, "Discarding malformed stored value");
                self.remove(key).await?;
                Ok(None)
            },
        }
    }

    /// Serialize `value` and store it under `key`
    async fn save<T>(&self, key: &str, value: &T) -> Result<(), ApplicationError>
    where
        T: Serialize + Send + Sync,
    {
        let raw = serde_json::to_string(value)
            .map_err(|e| ApplicationError::Internal(format!("Serialization error: {e}")))?;
        self.set(key, raw).await
    }
}

// Blanket implementation for all KeyValueStorePort implementors
impl<T: KeyValueStorePort + ?Sized> KeyValueStoreExt for T {}
