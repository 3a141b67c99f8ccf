use std::{net::SocketAddr, time::Duration};

/// Diagnostic surfaced by every store-dependent route when the store
/// credentials are absent. One constant so the webhook/leads error body and
/// the status report cannot drift apart.
pub const MISSING_STORE_CREDENTIALS: &str =
    "Store credentials not configured: set SUPABASE_URL and SUPABASE_ANON_KEY";

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Hosted store endpoint and credential. Both optional: when either is
    /// missing the server still starts and store-dependent routes answer
    /// with a configuration error instead.
    pub store_url: Option<String>,
    pub store_api_key: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("LEADSTREAM_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid LEADSTREAM_LISTEN_ADDR");
        let store_url = non_empty_env("SUPABASE_URL");
        let store_api_key = non_empty_env("SUPABASE_ANON_KEY");
        let cors_allow = std::env::var("LEADSTREAM_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("LEADSTREAM_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Self {
            listen_addr,
            store_url,
            store_api_key,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
