//! Shared route state
//!
//! Holds the route configuration (start and end) and the last computed
//! itinerary. Every change is written to the key-value store before it is
//! published, and observers subscribe through `tokio::sync::watch` channels.

use std::sync::Arc;

use domain::{Address, Itinerary, RouteConfiguration};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{KeyValueStoreExt, KeyValueStorePort},
};

/// Storage keys used by the route state and the student roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Route configuration (start/end)
    pub route_points: String,
    /// Last computed itinerary
    pub itinerary: String,
    /// Student roster
    pub students: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            route_points: "busManager_routePoints".to_string(),
            itinerary: "busManager_itinerary".to_string(),
            students: "busManager_students".to_string(),
        }
    }
}

/// Route configuration plus last itinerary, persisted and observable
pub struct RouteState {
    store: Arc<dyn KeyValueStorePort>,
    keys: StorageKeys,
    configuration: watch::Sender<RouteConfiguration>,
    itinerary: watch::Sender<Option<Arc<Itinerary>>>,
}

impl std::fmt::Debug for RouteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteState")
            .field("keys", &self.keys)
            .field("configuration", &*self.configuration.borrow())
            .field("has_itinerary", &self.has_itinerary())
            .finish_non_exhaustive()
    }
}

impl RouteState {
    /// Load the persisted state
    ///
    /// Absent or malformed stored values start out empty.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store itself fails.
    #[instrument(skip(store))]
    pub async fn initialize(
        store: Arc<dyn KeyValueStorePort>,
        keys: StorageKeys,
    ) -> Result<Self, ApplicationError> {
        let configuration: RouteConfiguration = store
            .load(&keys.route_points)
            .await?
            .unwrap_or_default();
        let itinerary: Option<Itinerary> = store.load(&keys.itinerary).await?;

        debug!(
            has_start = configuration.start.is_some(),
            has_end = configuration.end.is_some(),
            has_itinerary = itinerary.is_some(),
            "Route state loaded"
        );

        Ok(Self {
            store,
            keys,
            configuration: watch::Sender::new(configuration),
            itinerary: watch::Sender::new(itinerary.map(Arc::new)),
        })
    }

    /// Current configuration
    #[must_use]
    pub fn configuration(&self) -> RouteConfiguration {
        self.configuration.borrow().clone()
    }

    /// Current start point
    #[must_use]
    pub fn start(&self) -> Option<Address> {
        self.configuration.borrow().start.clone()
    }

    /// Current end point
    #[must_use]
    pub fn end(&self) -> Option<Address> {
        self.configuration.borrow().end.clone()
    }

    /// Replace the start point
    ///
    /// # Errors
    ///
    /// Returns `Storage` when persisting fails; the state is then unchanged.
    pub async fn set_start(&self, address: Address) -> Result<(), ApplicationError> {
        let mut next = self.configuration();
        next.start = Some(address);
        self.publish_configuration(next).await
    }

    /// Replace the end point
    ///
    /// # Errors
    ///
    /// Returns `Storage` when persisting fails; the state is then unchanged.
    pub async fn set_end(&self, address: Address) -> Result<(), ApplicationError> {
        let mut next = self.configuration();
        next.end = Some(address);
        self.publish_configuration(next).await
    }

    async fn publish_configuration(
        &self,
        configuration: RouteConfiguration,
    ) -> Result<(), ApplicationError> {
        self.store
            .save(&self.keys.route_points, &configuration)
            .await?;
        self.configuration.send_replace(configuration);
        info!("Route configuration updated");
        Ok(())
    }

    /// Last computed itinerary
    #[must_use]
    pub fn current_itinerary(&self) -> Option<Arc<Itinerary>> {
        self.itinerary.borrow().clone()
    }

    /// Store a freshly computed itinerary, replacing the previous one
    ///
    /// # Errors
    ///
    /// Returns `Storage` when persisting fails; the state is then unchanged.
    pub async fn replace_itinerary(
        &self,
        itinerary: Itinerary,
    ) -> Result<Arc<Itinerary>, ApplicationError> {
        self.store.save(&self.keys.itinerary, &itinerary).await?;
        let itinerary = Arc::new(itinerary);
        self.itinerary.send_replace(Some(Arc::clone(&itinerary)));
        Ok(itinerary)
    }

    /// Drop the stored itinerary
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the store cannot delete the value.
    pub async fn clear_itinerary(&self) -> Result<(), ApplicationError> {
        self.store.remove(&self.keys.itinerary).await?;
        self.itinerary.send_replace(None);
        debug!("Itinerary cleared");
        Ok(())
    }

    /// Whether start and end are both set and complete
    #[must_use]
    pub fn can_compute(&self) -> bool {
        self.configuration.borrow().can_compute()
    }

    /// Whether an itinerary is available
    #[must_use]
    pub fn has_itinerary(&self) -> bool {
        self.itinerary.borrow().is_some()
    }

    /// Observe configuration changes
    #[must_use]
    pub fn subscribe_configuration(&self) -> watch::Receiver<RouteConfiguration> {
        self.configuration.subscribe()
    }

    /// Observe itinerary changes
    #[must_use]
    pub fn subscribe_itinerary(&self) -> watch::Receiver<Option<Arc<Itinerary>>> {
        self.itinerary.subscribe()
    }

    /// Storage keys in use
    #[must_use]
    pub const fn keys(&self) -> &StorageKeys {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::Utc;
    use domain::{Coordinate, RouteGeometry, Stop, StopRole};
    use parking_lot::Mutex;

    use super::*;
    use crate::ports::MockKeyValueStorePort;

    #[derive(Debug, Default)]
    struct MapStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl KeyValueStorePort for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
            Ok(self.values.lock().get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<(), ApplicationError> {
            self.values.lock().insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), ApplicationError> {
            self.values.lock().remove(key);
            Ok(())
        }
    }

    fn school() -> Address {
        Address::new("Rua da Escola", "200", "São Paulo")
    }

    fn garage() -> Address {
        Address::new("Rua da Garagem", "1", "São Paulo")
    }

    fn itinerary() -> Itinerary {
        let stop = |order, role, address: Address| Stop {
            address,
            coordinate: Coordinate::new(-23.5, -46.6).unwrap(),
            name: format!("stop {order}"),
            role,
            order,
            phone: None,
        };
        Itinerary::new(
            RouteGeometry::default(),
            1000.0,
            120.0,
            vec![
                stop(0, StopRole::Start, garage()),
                stop(1, StopRole::End, school()),
            ],
            Utc::now(),
        )
        .unwrap()
    }

    async fn state_with(store: Arc<MapStore>) -> RouteState {
        RouteState::initialize(store, StorageKeys::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn starts_empty() {
        let state = state_with(Arc::new(MapStore::default())).await;
        assert!(state.start().is_none());
        assert!(state.end().is_none());
        assert!(!state.can_compute());
        assert!(!state.has_itinerary());
    }

    #[tokio::test]
    async fn setters_persist_and_survive_reload() {
        let store = Arc::new(MapStore::default());
        let state = state_with(Arc::clone(&store)).await;

        state.set_start(garage()).await.unwrap();
        assert!(!state.can_compute());
        state.set_end(school()).await.unwrap();
        assert!(state.can_compute());

        let raw = store.values.lock().get("busManager_routePoints").cloned().unwrap();
        assert!(raw.contains("startPoint"));
        assert!(raw.contains("endPoint"));

        let reloaded = state_with(store).await;
        assert_eq!(reloaded.start(), Some(garage()));
        assert_eq!(reloaded.end(), Some(school()));
    }

    #[tokio::test]
    async fn incomplete_endpoint_cannot_compute() {
        let state = state_with(Arc::new(MapStore::default())).await;
        state.set_start(garage()).await.unwrap();
        state
            .set_end(Address::new("Rua da Escola", "", "São Paulo"))
            .await
            .unwrap();
        assert!(!state.can_compute());
    }

    #[tokio::test]
    async fn malformed_stored_configuration_is_discarded() {
        let store = Arc::new(MapStore::default());
        store
            .values
            .lock()
            .insert("busManager_routePoints".to_string(), "{broken".to_string());

        let state = state_with(Arc::clone(&store)).await;
        assert!(state.start().is_none());
        assert!(!store.values.lock().contains_key("busManager_routePoints"));
    }

    #[tokio::test]
    async fn itinerary_replace_and_clear() {
        let store = Arc::new(MapStore::default());
        let state = state_with(Arc::clone(&store)).await;

        let stored = state.replace_itinerary(itinerary()).await.unwrap();
        assert!(state.has_itinerary());
        assert_eq!(state.current_itinerary().as_deref(), Some(&*stored));

        let reloaded = state_with(Arc::clone(&store)).await;
        assert_eq!(
            reloaded.current_itinerary().unwrap().stops(),
            stored.stops()
        );

        state.clear_itinerary().await.unwrap();
        assert!(!state.has_itinerary());
        assert!(!store.values.lock().contains_key("busManager_itinerary"));
    }

    #[tokio::test]
    async fn observers_see_changes() {
        let state = state_with(Arc::new(MapStore::default())).await;
        let mut config_rx = state.subscribe_configuration();
        let mut itinerary_rx = state.subscribe_itinerary();

        state.set_start(garage()).await.unwrap();
        assert!(config_rx.has_changed().unwrap());
        assert_eq!(config_rx.borrow_and_update().start, Some(garage()));

        state.replace_itinerary(itinerary()).await.unwrap();
        assert!(itinerary_rx.has_changed().unwrap());
        assert!(itinerary_rx.borrow_and_update().is_some());

        state.clear_itinerary().await.unwrap();
        assert!(itinerary_rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn failed_persist_leaves_state_unchanged() {
        let mut store = MockKeyValueStorePort::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(ApplicationError::Storage("read-only".into())));

        let state = RouteState::initialize(Arc::new(store), StorageKeys::default())
            .await
            .unwrap();
        let mut rx = state.subscribe_configuration();

        let err = state.set_start(garage()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Storage(_)));
        assert!(state.start().is_none());
        assert!(!rx.has_changed().unwrap());
    }
}
