//! PostgREST store gateway for Leadstream.
//!
//! This crate talks to the hosted relational store over its REST surface
//! (Supabase exposes PostgREST; any compatible endpoint works). It implements
//! the repository traits defined in `leadstream-core` and is the only place
//! in the application where the HTTP client to the store exists.
//!
//! ```text
//! core (domain)
//!       │
//!       ▼
//! store-postgrest (this crate)
//!       │
//!       ▼
//!   hosted store (REST)
//! ```

pub mod client;
pub mod errors;

// Repository implementations
pub mod leads;

pub use client::StoreConfig;
pub use errors::StorageError;

// Re-export from leadstream-core for convenience
pub use leadstream_core::errors::{Error, Result, StoreError};
