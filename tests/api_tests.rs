//! HTTP surface tests: the router is driven with `tower::ServiceExt::oneshot`
//! against a service backed by the in-process mock backend.

#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use bid_notifier::api::build_router;
use bid_notifier::app_state::{AppService, AppState};
use bid_notifier::persistence::MemoryProvider;
use common::{MockBackend, auction, token};

fn app(service: &Arc<AppService>) -> Router {
    build_router().with_state(AppState::new(Arc::clone(service)))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("request should build");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router should answer");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body should read");
    };
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn setup() -> (MockBackend, Arc<AppService>, Router) {
    let mock = MockBackend::start().await;
    let service = mock.service(Arc::new(MemoryProvider::new()));
    let router = app(&service);
    (mock, service, router)
}

#[tokio::test]
async fn health_reports_session_status() {
    let (_mock, service, app) = setup().await;
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["session_active"], false);

    let _ = service.open_session(token(), "default").await;
    let (_, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(body["session_active"], true);
}

#[tokio::test]
async fn blank_token_is_rejected() {
    let (_mock, _service, app) = setup().await;
    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/session",
        Some(json!({"token": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);
}

#[tokio::test]
async fn session_login_and_logout() {
    let (_mock, service, app) = setup().await;
    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/session",
        Some(json!({"token": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["poll_interval_secs"], 3600);
    assert_eq!(body["session_key"], token().fingerprint());
    assert!(service.has_session().await);

    let (status, body) = call(&app, Method::DELETE, "/api/v1/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ended");
    assert_eq!(body["session_key"], token().fingerprint());
    assert!(!service.has_session().await);
}

#[tokio::test]
async fn blank_session_key_is_rejected() {
    let (_mock, service, app) = setup().await;
    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/session",
        Some(json!({"token": "secret", "session_key": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);
    assert!(!service.has_session().await);
}

#[tokio::test]
async fn each_login_sees_only_its_own_list() {
    let (mock, _service, app) = setup().await;
    mock.update(|s| s.bidding = json!([auction(7, "inProgress")]));
    let (_, alice) = call(
        &app,
        Method::PUT,
        "/api/v1/session",
        Some(json!({"token": "alice-token"})),
    )
    .await;
    let _ = call(&app, Method::POST, "/api/v1/notifications/refresh", None).await;
    mock.update(|s| s.bidding = json!([auction(7, "outbid")]));
    let _ = call(&app, Method::POST, "/api/v1/notifications/refresh", None).await;
    let (_, body) = call(&app, Method::GET, "/api/v1/notifications", None).await;
    assert_eq!(body["unread_count"], 1);

    let _ = call(&app, Method::DELETE, "/api/v1/session", None).await;
    let (_, bob) = call(
        &app,
        Method::PUT,
        "/api/v1/session",
        Some(json!({"token": "bob-token"})),
    )
    .await;
    assert_ne!(bob["session_key"], alice["session_key"]);
    let _ = call(&app, Method::POST, "/api/v1/notifications/refresh", None).await;
    let (_, body) = call(&app, Method::GET, "/api/v1/notifications", None).await;
    assert_eq!(body["unread_count"], 0);
    assert_eq!(body["data"], json!([]));

    let _ = call(
        &app,
        Method::PUT,
        "/api/v1/session",
        Some(json!({"token": "alice-token"})),
    )
    .await;
    let (_, body) = call(&app, Method::GET, "/api/v1/notifications", None).await;
    assert_eq!(body["unread_count"], 1);
}

#[tokio::test]
async fn refresh_without_session_is_unauthorized() {
    let (_mock, _service, app) = setup().await;
    let (status, body) = call(&app, Method::POST, "/api/v1/notifications/refresh", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn refresh_list_and_mark_all_read() {
    let (mock, service, app) = setup().await;
    mock.update(|s| s.bidding = json!([auction(7, "inProgress")]));
    let _ = service.open_session(token(), "default").await;

    let (status, body) = call(&app, Method::POST, "/api/v1/notifications/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bidding_added"], 0);

    mock.update(|s| s.bidding = json!([auction(7, "outbid")]));
    let (_, body) = call(&app, Method::POST, "/api/v1/notifications/refresh", None).await;
    assert_eq!(body["bidding_added"], 1);
    assert_eq!(body["unread_count"], 1);

    let (status, body) = call(&app, Method::GET, "/api/v1/notifications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread_count"], 1);
    assert_eq!(body["data"][0]["auctionId"], 7);
    assert_eq!(body["data"][0]["kind"], "outbid");
    assert_eq!(body["data"][0]["isRead"], false);

    let (_, body) = call(&app, Method::POST, "/api/v1/notifications/mark-all-read", None).await;
    assert_eq!(body["marked"], 1);
    assert_eq!(body["unread_count"], 0);
    assert_eq!(mock.read(|s| s.mark_calls), 1);

    let (_, body) = call(&app, Method::GET, "/api/v1/notifications/unread-count", None).await;
    assert_eq!(body["unread_count"], 0);
}
