//! Key-value persistence
//!
//! Implementations of the application's key-value store port: a JSON
//! document on disk and a process-local map.

mod in_memory_store;
mod json_file_store;

pub use in_memory_store::InMemoryStore;
pub use json_file_store::JsonFileStore;
