//! Session handlers: install a token (login) and end the session (logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::put;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{SessionRequest, SessionResponse};
use crate::app_state::AppState;
use crate::domain::AuthToken;
use crate::error::{ErrorResponse, NotifierError};

/// `PUT /session` — Install a bearer token and (re)start polling.
///
/// # Errors
///
/// Returns [`NotifierError::InvalidRequest`] for a blank token or a blank
/// session key.
#[utoipa::path(
    put,
    path = "/api/v1/session",
    tag = "Session",
    summary = "Start a session",
    description = "Installs the bearer token used for backend calls. Any previous session is ended and polling restarts with an immediate first tick. The notification list shown is the one stored under `session_key`, which defaults to a fingerprint of the token.",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Session active", body = SessionResponse),
        (status = 400, description = "Blank token or session key", body = ErrorResponse),
    )
)]
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<impl IntoResponse, NotifierError> {
    let token = AuthToken::new(req.token)
        .ok_or_else(|| NotifierError::InvalidRequest("token must not be blank".to_string()))?;
    let session_key = match req.session_key {
        Some(key) if key.trim().is_empty() => {
            return Err(NotifierError::InvalidRequest(
                "session_key must not be blank".to_string(),
            ));
        }
        Some(key) => key,
        None => token.fingerprint(),
    };

    // Polling runs detached; the handle is not needed here.
    drop(state.service.start_session(token, session_key.clone()).await);

    Ok(Json(SessionResponse {
        status: "active".to_string(),
        session_key,
        poll_interval_secs: state.service.poll_interval().as_secs(),
        updated_at: Utc::now(),
    }))
}

/// `DELETE /session` — Logout.
#[utoipa::path(
    delete,
    path = "/api/v1/session",
    tag = "Session",
    summary = "End the session",
    description = "Stops polling and discards responses still in flight. Stored notifications are kept.",
    responses(
        (status = 200, description = "Session ended", body = SessionResponse),
    )
)]
pub async fn end_session(State(state): State<AppState>) -> impl IntoResponse {
    state.service.end_session().await;
    (
        StatusCode::OK,
        Json(SessionResponse {
            status: "ended".to_string(),
            session_key: state.service.session_key().await,
            poll_interval_secs: state.service.poll_interval().as_secs(),
            updated_at: Utc::now(),
        }),
    )
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/session", put(start_session).delete(end_session))
}
