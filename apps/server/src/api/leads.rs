use std::sync::Arc;

use crate::{
    error::ApiResult,
    events::{ServerEvent, LEADS_CLEARED},
    main_lib::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use leadstream_core::leads::Lead;

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Deserialize)]
struct ClearParams {
    id: Option<i64>,
}

/// All leads, newest first.
async fn list_leads(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Lead>>> {
    let service = state.require_lead_service()?;
    let leads = service.get_leads().await?;
    Ok(Json(leads))
}

/// Deletes one lead when `?id=` is given, otherwise every lead, then tells
/// subscribers to drop their view.
async fn clear_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClearParams>,
) -> ApiResult<Json<SuccessResponse>> {
    let service = state.require_lead_service()?;
    service.clear_leads(params.id).await?;
    state.event_bus.publish(ServerEvent::new(LEADS_CLEARED));
    Ok(Json(SuccessResponse { success: true }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/leads", get(list_leads).delete(clear_leads))
}
