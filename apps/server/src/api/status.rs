use std::sync::Arc;

use crate::{config::MISSING_STORE_CREDENTIALS, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct StatusResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reports whether the store is configured and reachable. Always answers
/// 200: the diagnostic lives in the body.
async fn store_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let Some(service) = state.lead_service.clone() else {
        return Json(StatusResponse {
            configured: false,
            message: None,
            error: Some(MISSING_STORE_CREDENTIALS.to_string()),
        });
    };

    match service.check_store().await {
        Ok(()) => Json(StatusResponse {
            configured: true,
            message: Some("Store configured and reachable".to_string()),
            error: None,
        }),
        Err(e) => Json(StatusResponse {
            configured: false,
            message: None,
            error: Some(e.to_string()),
        }),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(store_status))
}
