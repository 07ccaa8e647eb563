//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geocoding_port;
mod key_value_store;
mod pacer;
mod path_planning_port;
mod postal_code_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use key_value_store::MockKeyValueStorePort;
pub use key_value_store::{KeyValueStoreExt, KeyValueStorePort};
#[cfg(test)]
pub use pacer::MockPacer;
pub use pacer::{Pacer, TokioPacer};
#[cfg(test)]
pub use path_planning_port::MockPathPlanningPort;
pub use path_planning_port::{PathPlanningPort, PlannedPath};
#[cfg(test)]
pub use postal_code_port::MockPostalCodePort;
pub use postal_code_port::{PostalAddress, PostalCodePort};
