//! In-process mock of the marketplace backend.
//!
//! Serves the four REST endpoints the notifier consumes on an ephemeral
//! port. Responses are read from a shared [`MockState`] that tests mutate
//! between ticks.

#![allow(dead_code, missing_docs, clippy::panic)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use bid_notifier::backend::HttpBackend;
use bid_notifier::domain::{AuthToken, EventBus};
use bid_notifier::persistence::StorageProvider;
use bid_notifier::service::NotificationService;

/// Scripted backend responses and recorded calls.
#[derive(Debug)]
pub struct MockState {
    pub bidding: Value,
    pub owned: Value,
    pub notifications: Value,
    pub reject_all: bool,
    pub fail_mark_all_read: bool,
    pub mark_calls: usize,
    pub last_auth: Option<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            bidding: json!([]),
            owned: json!([]),
            notifications: json!([]),
            reject_all: false,
            fail_mark_all_read: false,
            mark_calls: 0,
            last_auth: None,
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

/// Handle to a running mock backend.
#[derive(Debug, Clone)]
pub struct MockBackend {
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    /// Binds `127.0.0.1:0` and serves the mock in a background task.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new()
            .route("/api/Profile/bidding", get(bidding))
            .route("/api/Profile/auctions", get(owned))
            .route("/api/Notifications", get(notifications))
            .route("/api/Notifications/mark-all-read", post(mark_all_read))
            .with_state(Arc::clone(&state));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("failed to bind mock backend");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("mock backend has no local address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Mutates the scripted state.
    pub fn update(&self, f: impl FnOnce(&mut MockState)) {
        let Ok(mut state) = self.state.lock() else {
            panic!("mock state poisoned");
        };
        f(&mut *state);
    }

    /// Reads a value out of the scripted state.
    pub fn read<T>(&self, f: impl FnOnce(&MockState) -> T) -> T {
        let Ok(state) = self.state.lock() else {
            panic!("mock state poisoned");
        };
        f(&*state)
    }

    /// A reqwest backend pointed at this mock.
    pub fn http_backend(&self) -> HttpBackend {
        let Ok(backend) = HttpBackend::new(&self.base_url, Duration::from_secs(5)) else {
            panic!("http backend should build");
        };
        backend
    }

    /// A service over this mock with the given storage and a long poll
    /// interval, so only explicit ticks run. The `"default"` list is shown
    /// until a session names another key.
    pub fn service(
        &self,
        storage: Arc<dyn StorageProvider>,
    ) -> Arc<NotificationService<HttpBackend>> {
        self.service_for(storage, "default")
    }

    /// Like [`MockBackend::service`], restoring `session_key`'s list at boot.
    pub fn service_for(
        &self,
        storage: Arc<dyn StorageProvider>,
        session_key: &str,
    ) -> Arc<NotificationService<HttpBackend>> {
        Arc::new(NotificationService::new(
            Arc::new(self.http_backend()),
            storage,
            session_key,
            EventBus::new(64),
            Duration::from_secs(3600),
        ))
    }
}

/// An auction row as the backend serializes it.
pub fn auction(id: i64, state: &str) -> Value {
    json!({
        "auctionId": id,
        "title": format!("Lot {id}"),
        "description": "mock",
        "auctionState": state,
        "endDateTime": "2030-01-01T12:00:00",
    })
}

/// A server notification row.
pub fn server_notification(id: i64, auction_id: i64, kind: &str, is_read: bool) -> Value {
    json!({
        "notificationId": id,
        "auctionId": auction_id,
        "kind": kind,
        "title": format!("Lot {auction_id}"),
        "timestamp": "2030-01-01T12:00:00Z",
        "isRead": is_read,
    })
}

pub fn token() -> AuthToken {
    let Some(token) = AuthToken::new("secret") else {
        panic!("token should be valid");
    };
    token
}

fn respond(state: &Shared, headers: &HeaderMap, pick: impl FnOnce(&MockState) -> Value) -> Response {
    let Ok(mut state) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    state.last_auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if state.reject_all {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(pick(&*state)).into_response()
}

async fn bidding(State(state): State<Shared>, headers: HeaderMap) -> Response {
    respond(&state, &headers, |s| s.bidding.clone())
}

async fn owned(State(state): State<Shared>, headers: HeaderMap) -> Response {
    respond(&state, &headers, |s| s.owned.clone())
}

async fn notifications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    respond(&state, &headers, |s| s.notifications.clone())
}

async fn mark_all_read(State(state): State<Shared>) -> Response {
    let Ok(mut state) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    state.mark_calls += 1;
    if state.reject_all {
        StatusCode::UNAUTHORIZED.into_response()
    } else if state.fail_mark_all_read {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
