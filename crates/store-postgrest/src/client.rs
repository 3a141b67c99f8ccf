//! Shared HTTP client for the hosted store's REST surface.

use std::time::Duration;

use leadstream_core::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a PostgREST-compatible endpoint.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Anonymous/service key sent as both `apikey` and bearer token.
    pub api_key: String,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// REST endpoint for a table.
    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

/// Builds the reqwest client with the store's auth headers pre-applied.
/// Every request depends on those default headers, so a key that cannot be
/// carried as a header value, or a builder failure, is surfaced as a
/// configuration error rather than degraded into a client that would 401.
pub(crate) fn build_client(config: &StoreConfig) -> Result<Client> {
    let bad_key = |e: reqwest::header::InvalidHeaderValue| {
        Error::Configuration(format!("Store API key is not a valid header value: {e}"))
    };

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(&config.api_key).map_err(bad_key)?);
    headers.insert(
        reqwest::header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(bad_key)?,
    );

    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()
        .map_err(|e| Error::Configuration(format!("Failed to build the store HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::{build_client, StoreConfig};

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let config = StoreConfig::new("https://xyz.supabase.co/", "key");
        assert_eq!(
            config.table_url("leads"),
            "https://xyz.supabase.co/rest/v1/leads"
        );
    }

    #[test]
    fn test_build_client_accepts_typical_key() {
        let config = StoreConfig::new("https://xyz.supabase.co", "service-key");
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_build_client_rejects_key_unusable_as_header() {
        let config = StoreConfig::new("https://xyz.supabase.co", "bad\nkey");
        let err = build_client(&config).err().map(|e| e.to_string()).unwrap();
        assert!(err.contains("header value"), "got: {err}");
    }
}
