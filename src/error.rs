//! Notifier error types with HTTP status code mapping.
//!
//! [`NotifierError`] is the central error type of the crate. The engine
//! itself absorbs backend and persistence failures (they are logged, never
//! shown to the user); the variants still carry enough detail for the logs
//! and for the local API, which maps each variant to a status code and a
//! structured JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: token must not be blank",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Crate-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status               |
/// |-----------|-------------------|---------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request           |
/// | 2000–2999 | Session           | 401 Unauthorized          |
/// | 3000–3999 | Local / internal  | 500 Internal Server Error |
/// | 5000–5999 | Upstream backend  | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// No session token is installed, or the backend rejected it (401).
    #[error("unauthorized")]
    Unauthorized,

    /// The backend could not be reached or answered with a non-success
    /// status.
    #[error("backend error: {0}")]
    Backend(String),

    /// The backend answered with a body that could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Reading or writing the persisted notification list failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NotifierError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Config(_) => 1002,
            Self::Unauthorized => 2001,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Backend(_) => 5001,
            Self::Decode(_) => 5002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Config(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Backend(_) | Self::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for NotifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            Self::Unauthorized
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Backend(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl IntoResponse for NotifierError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
