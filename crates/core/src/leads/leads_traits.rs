use crate::errors::Result;
use crate::leads::leads_model::{Environment, Lead, NewLead};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for lead store gateway operations.
#[async_trait]
pub trait LeadRepositoryTrait: Send + Sync {
    /// Persists all records in one batch and returns them augmented with the
    /// store-assigned `id` and `created_at`. The whole batch aborts if the
    /// store rejects any record.
    async fn insert(&self, records: Vec<NewLead>) -> Result<Vec<Lead>>;

    /// Returns all leads ordered by `created_at` descending.
    async fn list(&self) -> Result<Vec<Lead>>;

    /// Removes every lead.
    async fn delete_all(&self) -> Result<()>;

    /// Removes a single lead by identifier.
    async fn delete_one(&self, id: i64) -> Result<()>;

    /// Trivial read used to report store reachability.
    async fn probe(&self) -> Result<()>;
}

/// Trait for lead service operations.
#[async_trait]
pub trait LeadServiceTrait: Send + Sync {
    /// Normalizes an arbitrary decoded payload and persists the resulting
    /// records, returning them in insertion order.
    async fn ingest(&self, payload: &Value, env: Environment) -> Result<Vec<Lead>>;

    /// All leads, newest first.
    async fn get_leads(&self) -> Result<Vec<Lead>>;

    /// Deletes one lead when `id` is given, otherwise every lead.
    async fn clear_leads(&self, id: Option<i64>) -> Result<()>;

    /// Checks that the store is reachable.
    async fn check_store(&self) -> Result<()>;
}
