use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tower::ServiceExt;

use leadstream_core::errors::{Result, StoreError};
use leadstream_core::leads::{Lead, LeadRepositoryTrait, LeadService, NewLead};
use leadstream_server::{
    api::app_router,
    config::{Config, MISSING_STORE_CREDENTIALS},
    events::{EventBus, LEADS_CLEARED, LEAD_CREATED},
    AppState,
};

// --- In-memory repository standing in for the hosted store ---

#[derive(Default)]
struct FakeLeadRepository {
    leads: Mutex<Vec<Lead>>,
    next_id: Mutex<i64>,
    reject_message: Option<String>,
}

impl FakeLeadRepository {
    fn rejecting(message: &str) -> Self {
        Self {
            reject_message: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl LeadRepositoryTrait for FakeLeadRepository {
    async fn insert(&self, records: Vec<NewLead>) -> Result<Vec<Lead>> {
        if let Some(message) = &self.reject_message {
            return Err(StoreError::Rejected(message.clone()).into());
        }
        let mut leads = self.leads.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        let mut inserted = Vec::with_capacity(records.len());
        for record in records {
            *next_id += 1;
            let lead = Lead {
                id: *next_id,
                name: record.name,
                address: record.address,
                phone: record.phone,
                website: record.website,
                instagram: record.instagram,
                image_url: record.image_url,
                rating: record.rating,
                reviews: record.reviews,
                especialidades: record.especialidades,
                idx: record.idx,
                raw_data: record.raw_data,
                created_at: Utc.timestamp_opt(1_700_000_000 + *next_id, 0).unwrap(),
            };
            leads.push(lead.clone());
            inserted.push(lead);
        }
        Ok(inserted)
    }

    async fn list(&self) -> Result<Vec<Lead>> {
        let mut leads = self.leads.lock().unwrap().clone();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    async fn delete_all(&self) -> Result<()> {
        self.leads.lock().unwrap().clear();
        Ok(())
    }

    async fn delete_one(&self, id: i64) -> Result<()> {
        self.leads.lock().unwrap().retain(|lead| lead.id != id);
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        store_url: None,
        store_api_key: None,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
    }
}

fn router_with_repository(repository: FakeLeadRepository) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        lead_service: Some(Arc::new(LeadService::new(Arc::new(repository)))),
        event_bus: EventBus::new(16),
    });
    (app_router(state.clone(), &test_config()), state)
}

fn router_without_store() -> axum::Router {
    let state = Arc::new(AppState {
        lead_service: None,
        event_bus: EventBus::new(16),
    });
    app_router(state, &test_config())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_webhook(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn webhook_persists_lead_and_listing_returns_it() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .clone()
        .oneshot(post_webhook(
            "/api/webhook",
            r#"{ "title": "Acme", "phone_number": "123", "website": "https://acme.example" }"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"][0]["name"], json!("Acme"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let leads = body_json(response).await;
    let leads = leads.as_array().unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["name"], json!("Acme"));
    assert_eq!(leads[0]["phone"], json!("123"));
    assert_eq!(leads[0]["website"], json!("https://acme.example"));
    assert!(leads[0]["id"].is_i64());
    assert!(leads[0]["created_at"].is_string());
    assert_eq!(leads[0]["raw_data"]["_environment"], json!("production"));
}

#[tokio::test]
async fn webhook_env_segment_tags_test_environment() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .clone()
        .oneshot(post_webhook("/api/webhook/test", r#"{ "name": "Lab" }"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["raw_data"]["_environment"], json!("test"));

    // Any other segment is production.
    let response = app
        .oneshot(post_webhook("/api/webhook/staging", r#"{ "name": "Lab2" }"#))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(
        body["data"][0]["raw_data"]["_environment"],
        json!("production")
    );
}

#[tokio::test]
async fn webhook_batch_publishes_one_event_per_lead_in_order() {
    let (app, state) = router_with_repository(FakeLeadRepository::default());
    let mut subscriber = state.event_bus.subscribe();

    let response = app
        .oneshot(post_webhook(
            "/api/webhook",
            r#"[ { "name": "First" }, { "name": "Second" } ]"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let first = subscriber.recv().await.unwrap();
    assert_eq!(first.name, LEAD_CREATED);
    assert_eq!(first.payload.as_ref().unwrap()["name"], json!("First"));

    let second = subscriber.recv().await.unwrap();
    assert_eq!(second.payload.as_ref().unwrap()["name"], json!("Second"));
}

#[tokio::test]
async fn late_subscriber_does_not_receive_past_leads() {
    let (app, state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .oneshot(post_webhook("/api/webhook", r#"{ "name": "Early" }"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut late = state.event_bus.subscribe();
    assert!(late.try_recv().is_err());
}

#[tokio::test]
async fn non_json_body_is_stored_not_rejected() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .oneshot(post_webhook("/api/webhook", "name=Acme&source=form"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["name"], json!("Desconhecido"));
    assert_eq!(
        body["data"][0]["raw_data"]["raw"],
        json!("name=Acme&source=form")
    );
}

#[tokio::test]
async fn webhook_rejects_non_post_with_405() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/webhook")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn store_rejection_surfaces_as_500_with_message() {
    let (app, _state) = router_with_repository(FakeLeadRepository::rejecting("quota exceeded"));

    let response = app
        .oneshot(post_webhook("/api/webhook", r#"{ "name": "Acme" }"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("quota exceeded"), "got: {message}");
}

#[tokio::test]
async fn delete_clears_store_and_notifies_subscribers() {
    let (app, state) = router_with_repository(FakeLeadRepository::default());

    app.clone()
        .oneshot(post_webhook("/api/webhook", r#"{ "name": "Acme" }"#))
        .await
        .unwrap();

    let mut subscriber = state.event_bus.subscribe();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], json!(true));

    let event = subscriber.recv().await.unwrap();
    assert_eq!(event.name, LEADS_CLEARED);
    assert!(event.payload.is_none());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let leads = body_json(response).await;
    assert_eq!(leads.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn delete_with_id_removes_only_that_lead() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .clone()
        .oneshot(post_webhook(
            "/api/webhook",
            r#"[ { "name": "Keep" }, { "name": "Drop" } ]"#,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let drop_id = body["data"][1]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/leads?id={drop_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let leads = body_json(response).await;
    let leads = leads.as_array().unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["name"], json!("Keep"));
}

#[tokio::test]
async fn status_reports_unconfigured_store() {
    let app = router_without_store();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["configured"], json!(false));
    assert_eq!(body["error"], json!(MISSING_STORE_CREDENTIALS));
}

#[tokio::test]
async fn status_reports_reachable_store() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["configured"], json!(true));
}

#[tokio::test]
async fn store_routes_degrade_to_configuration_error_without_credentials() {
    let app = router_without_store();

    let response = app
        .clone()
        .oneshot(post_webhook("/api/webhook", r#"{ "name": "Acme" }"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    // Same diagnostic the status route reports.
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains(MISSING_STORE_CREDENTIALS));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/webhook")
                .header(header::ORIGIN, "https://scraper.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn stream_delivers_lead_payload_then_clear_event() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    // Subscribing happens while the handler runs, so the response must be in
    // hand before the writes below for their events to reach this stream.
    let stream_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(stream_response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_webhook("/api/webhook", r#"{ "name": "Acme" }"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut frames = stream_response.into_body().into_data_stream();
    let mut wire = String::new();
    while !wire.contains("event: clear") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), frames.next())
            .await
            .expect("no SSE frame within 5s")
            .expect("stream ended before the clear event")
            .unwrap();
        wire.push_str(std::str::from_utf8(&chunk).unwrap());
    }

    // The new lead is a default message whose data line carries the stored
    // row; EventSource clients read it via `onmessage`.
    let lead_line = wire
        .lines()
        .find(|line| line.starts_with("data: {"))
        .expect("no lead data frame");
    let payload: Value = serde_json::from_str(&lead_line["data: ".len()..]).unwrap();
    assert_eq!(payload["name"], json!("Acme"));
    assert!(payload["id"].is_i64());
    assert_eq!(payload["raw_data"]["_environment"], json!("production"));

    // The bulk delete arrives afterwards as a named event.
    assert!(wire.find("data: {").unwrap() < wire.find("event: clear").unwrap());
}

#[tokio::test]
async fn stream_endpoint_answers_with_event_stream() {
    let (app, _state) = router_with_repository(FakeLeadRepository::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("text/event-stream"));
}
