mod leads;
mod status;
mod stream;
mod webhook;

use std::sync::Arc;

use crate::{config::Config, main_lib::AppState};
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    // Webhook callers are third-party scrapers posting from arbitrary
    // origins, so CORS defaults to fully permissive.
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .cors_allow
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // The SSE route is mounted outside the timeout layer: subscriptions are
    // long-lived by design.
    let api = Router::new()
        .merge(webhook::router())
        .merge(leads::router())
        .merge(status::router())
        .layer(TimeoutLayer::new(config.request_timeout))
        .merge(stream::router());

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
}
