use std::sync::Arc;

use crate::{
    config::{Config, MISSING_STORE_CREDENTIALS},
    error::ApiError,
    events::EventBus,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use leadstream_core::leads::{LeadService, LeadServiceTrait};
use leadstream_store_postgrest::leads::LeadRepository;
use leadstream_store_postgrest::StoreConfig;

pub struct AppState {
    /// `None` when the store credentials are absent; every store-dependent
    /// route then answers with a configuration error instead of crashing.
    pub lead_service: Option<Arc<dyn LeadServiceTrait>>,
    pub event_bus: EventBus,
}

impl AppState {
    /// The lead service, or the configuration error the HTTP surface
    /// translates into a 500.
    pub fn require_lead_service(&self) -> Result<Arc<dyn LeadServiceTrait>, ApiError> {
        self.lead_service.clone().ok_or_else(|| {
            leadstream_core::Error::Configuration(MISSING_STORE_CREDENTIALS.to_string()).into()
        })
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("LEADSTREAM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let lead_service: Option<Arc<dyn LeadServiceTrait>> =
        match (&config.store_url, &config.store_api_key) {
            (Some(url), Some(key)) => {
                let repository = Arc::new(LeadRepository::new(StoreConfig::new(url, key))?);
                Some(Arc::new(LeadService::new(repository)))
            }
            _ => {
                tracing::warn!(
                    "SUPABASE_URL / SUPABASE_ANON_KEY not set; \
                     store-dependent routes will report a configuration error"
                );
                None
            }
        };

    let event_bus = EventBus::new(256);

    Ok(Arc::new(AppState {
        lead_service,
        event_bus,
    }))
}
