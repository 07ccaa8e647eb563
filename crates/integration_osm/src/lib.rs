//! OpenStreetMap integration
//!
//! Address geocoding via [Nominatim](https://nominatim.openstreetmap.org) and
//! drivable routes via [OSRM](https://project-osrm.org).
//!
//! # Architecture
//!
//! Same client-trait pattern as the other integration crates.
//! [`GeocodingClient`] turns a search string into a coordinate and is
//! implemented by [`NominatimGeocodingClient`]. [`RoutingClient`] plans a route
//! through an ordered list of coordinates and is implemented by
//! [`OsrmRoutingClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_osm::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//! let route = client.route(&[garage, school]).await?;
//! println!("{} m", route.distance_meters);
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod models;

pub use client::{OsrmRoutingClient, RoutingClient};
pub use config::OsrmConfig;
pub use error::RoutingError;
pub use geocoding::{GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient};
pub use models::{Route, SnappedWaypoint};
