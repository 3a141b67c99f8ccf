use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::errors::Result;
use crate::leads::leads_model::{Environment, Lead, NewLead};
use crate::leads::leads_normalizer::normalize;
use crate::leads::leads_traits::{LeadRepositoryTrait, LeadServiceTrait};

/// Service for ingesting and managing leads.
pub struct LeadService {
    lead_repository: Arc<dyn LeadRepositoryTrait>,
}

impl LeadService {
    /// Creates a new LeadService instance with an injected repository.
    pub fn new(lead_repository: Arc<dyn LeadRepositoryTrait>) -> Self {
        Self { lead_repository }
    }
}

#[async_trait]
impl LeadServiceTrait for LeadService {
    async fn ingest(&self, payload: &Value, env: Environment) -> Result<Vec<Lead>> {
        let records: Vec<NewLead> = normalize(payload, env);
        debug!(
            "Normalized webhook payload into {} record(s) for environment {}",
            records.len(),
            env
        );
        self.lead_repository.insert(records).await
    }

    async fn get_leads(&self) -> Result<Vec<Lead>> {
        self.lead_repository.list().await
    }

    async fn clear_leads(&self, id: Option<i64>) -> Result<()> {
        match id {
            Some(id) => self.lead_repository.delete_one(id).await,
            None => self.lead_repository.delete_all().await,
        }
    }

    async fn check_store(&self) -> Result<()> {
        self.lead_repository.probe().await
    }
}
