//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the OpenStreetMap and ViaCEP
//! integration crates, provides key-value persistence, layered
//! configuration and tracing setup, and wires the services together.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;
pub mod wiring;

pub use adapters::*;
pub use config::{
    AppConfig, GeocodingAppConfig, LogFormat, LoggingConfig, StorageBackend, StorageConfig,
};
pub use persistence::{InMemoryStore, JsonFileStore};
pub use telemetry::init_tracing;
pub use wiring::{Ports, Services, open_store};
