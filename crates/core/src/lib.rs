//! Leadstream Core - Domain entities, services, and traits.
//!
//! This crate contains the lead-ingestion business logic. It is
//! store-agnostic and defines traits that are implemented by the
//! `store-postgrest` crate.

pub mod errors;
pub mod leads;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
