//! Notification handlers: list, unread count, mark-all-read, refresh.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    MarkAllReadResponse, NotificationListResponse, RefreshResponse, UnreadCountResponse,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, NotifierError};

/// `GET /notifications` — Current notification list.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "Notifications",
    summary = "List notifications",
    description = "Returns every stored notification, newest first, together with the unread count.",
    responses(
        (status = 200, description = "Notification list", body = NotificationListResponse),
    )
)]
pub async fn list_notifications(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.service.list().await;
    let unread_count = data.iter().filter(|r| !r.is_read()).count();
    Json(NotificationListResponse { data, unread_count })
}

/// `GET /notifications/unread-count` — Badge count.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    tag = "Notifications",
    summary = "Unread count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
    )
)]
pub async fn unread_count(State(state): State<AppState>) -> impl IntoResponse {
    Json(UnreadCountResponse {
        unread_count: state.service.unread_count().await,
    })
}

/// `POST /notifications/mark-all-read` — Mark everything read.
///
/// The local list changes immediately; the backend is told afterwards and a
/// failure there does not undo the local change.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/mark-all-read",
    tag = "Notifications",
    summary = "Mark all notifications read",
    description = "Marks every notification read locally, then forwards the request to the backend. Backend failures are logged, never surfaced.",
    responses(
        (status = 200, description = "Notifications marked read", body = MarkAllReadResponse),
    )
)]
pub async fn mark_all_read(State(state): State<AppState>) -> impl IntoResponse {
    let marked = state.service.mark_all_read().await;
    Json(MarkAllReadResponse {
        marked,
        unread_count: state.service.unread_count().await,
    })
}

/// `POST /notifications/refresh` — Run one detection tick now.
///
/// # Errors
///
/// Returns [`NotifierError::Unauthorized`] when no session is active.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/refresh",
    tag = "Notifications",
    summary = "Refresh now",
    description = "Fetches all categories once, runs change detection and merges the result without waiting for the next polling tick.",
    responses(
        (status = 200, description = "Tick completed", body = RefreshResponse),
        (status = 401, description = "No active session", body = ErrorResponse),
    )
)]
pub async fn refresh(State(state): State<AppState>) -> Result<impl IntoResponse, NotifierError> {
    let report = state.service.tick().await;
    if report.skipped {
        return Err(NotifierError::Unauthorized);
    }
    let unread_count = state.service.unread_count().await;
    Ok(Json(RefreshResponse::from_report(report, unread_count)))
}

/// Notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/mark-all-read", post(mark_all_read))
        .route("/notifications/refresh", post(refresh))
}
