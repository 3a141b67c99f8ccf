use std::sync::Arc;

use crate::{
    error::ApiResult,
    events::{ServerEvent, LEAD_CREATED},
    main_lib::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use leadstream_core::leads::{Environment, Lead};

#[derive(Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub data: Vec<Lead>,
}

/// Decodes the webhook body. Scrapers occasionally post non-JSON payloads;
/// those are kept as `{"raw": <text>}` rather than rejected.
fn decode_body(body: &Bytes) -> Value {
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => json!({ "raw": String::from_utf8_lossy(body) }),
    }
}

async fn ingest_into(
    state: Arc<AppState>,
    env: Environment,
    body: Bytes,
) -> ApiResult<Json<IngestResponse>> {
    let service = state.require_lead_service()?;
    let payload = decode_body(&body);
    let inserted = service.ingest(&payload, env).await?;

    // One event per persisted record, in store order.
    for lead in &inserted {
        let payload = serde_json::to_value(lead).map_err(leadstream_core::Error::from)?;
        state
            .event_bus
            .publish(ServerEvent::with_payload(LEAD_CREATED, payload));
    }

    tracing::info!(count = inserted.len(), environment = %env, "Ingested webhook batch");
    Ok(Json(IngestResponse {
        success: true,
        data: inserted,
    }))
}

async fn ingest(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Json<IngestResponse>> {
    ingest_into(state, Environment::Production, body).await
}

async fn ingest_with_env(
    Path(env): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<IngestResponse>> {
    ingest_into(state, Environment::from_segment(&env), body).await
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhook", post(ingest))
        .route("/webhook/{env}", post(ingest_with_env))
}
