//! Repository implementation for leads against the PostgREST endpoint.

use async_trait::async_trait;
use log::error;
use reqwest::{Client, Response};

use leadstream_core::leads::{Lead, LeadRepositoryTrait, NewLead};
use leadstream_core::Result;

use crate::client::{build_client, StoreConfig};
use crate::errors::{rejection_message, StorageError};

const LEADS_TABLE: &str = "leads";

pub struct LeadRepository {
    client: Client,
    config: StoreConfig,
}

impl LeadRepository {
    pub fn new(config: StoreConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(&config)?,
            config,
        })
    }

    fn leads_url(&self) -> String {
        self.config.table_url(LEADS_TABLE)
    }

    /// Turns a non-success response into the store's own message; the caller
    /// decides nothing here, per the gateway's pass-through contract.
    async fn check(response: Response, operation: &str) -> std::result::Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = rejection_message(status, &body);
        error!("Store rejected {}: {}", operation, message);
        Err(StorageError::Rejected(message))
    }
}

#[async_trait]
impl LeadRepositoryTrait for LeadRepository {
    async fn insert(&self, records: Vec<NewLead>) -> Result<Vec<Lead>> {
        // An empty batch (e.g. a webhook that posted `[]`) has nothing to
        // send; the store would answer with an empty representation anyway.
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(self.leads_url())
            // Ask PostgREST to echo the inserted rows with their
            // store-assigned id and created_at.
            .header("Prefer", "return=representation")
            .json(&records)
            .send()
            .await
            .map_err(StorageError::from)?;
        let response = Self::check(response, "insert").await?;

        let inserted: Vec<Lead> = response
            .json()
            .await
            .map_err(|e| StorageError::Decode(e.to_string()))?;
        Ok(inserted)
    }

    async fn list(&self) -> Result<Vec<Lead>> {
        let response = self
            .client
            .get(self.leads_url())
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(StorageError::from)?;
        let response = Self::check(response, "list").await?;

        let leads: Vec<Lead> = response
            .json()
            .await
            .map_err(|e| StorageError::Decode(e.to_string()))?;
        Ok(leads)
    }

    async fn delete_all(&self) -> Result<()> {
        // PostgREST refuses an unqualified DELETE; `id=not.is.null` is a
        // filter true for every row.
        let response = self
            .client
            .delete(self.leads_url())
            .query(&[("id", "not.is.null")])
            .send()
            .await
            .map_err(StorageError::from)?;
        Self::check(response, "delete_all").await?;
        Ok(())
    }

    async fn delete_one(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.leads_url())
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(StorageError::from)?;
        Self::check(response, "delete_one").await?;
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        let response = self
            .client
            .get(self.leads_url())
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .map_err(StorageError::from)?;
        Self::check(response, "probe").await?;
        Ok(())
    }
}
