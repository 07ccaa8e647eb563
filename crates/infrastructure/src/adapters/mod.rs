//! Adapters binding the integration clients to application ports

mod nominatim_adapter;
mod osrm_adapter;
mod viacep_adapter;

pub use nominatim_adapter::NominatimGeocodingAdapter;
pub use osrm_adapter::OsrmPathPlanningAdapter;
pub use viacep_adapter::ViaCepAdapter;
