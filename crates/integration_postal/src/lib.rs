//! Postal code lookup integration
//!
//! Resolves Brazilian postal codes (CEP) to street addresses using the public
//! [ViaCEP](https://viacep.com.br) API. Used for address autofill.
//!
//! A client keeps at most one lookup in flight: starting a new lookup
//! supersedes the previous one, which then resolves to `Ok(None)`.

mod client;
mod config;
mod error;
mod models;

pub use client::{PostalCodeClient, ViaCepClient};
pub use config::ViaCepConfig;
pub use error::PostalCodeError;
pub use models::PostalRecord;
