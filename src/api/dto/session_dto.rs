//! Session (login / logout) DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `PUT /api/v1/session`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SessionRequest {
    /// Bearer token issued by the marketplace backend.
    pub token: String,
    /// Names the notification list to show. Defaults to a stable
    /// fingerprint of the token, so each token keeps its own list.
    #[serde(default)]
    pub session_key: Option<String>,
}

/// Response for the session endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    /// `"active"` or `"ended"`.
    pub status: String,
    /// Key of the notification list now shown.
    pub session_key: String,
    /// Seconds between polling ticks.
    pub poll_interval_secs: u64,
    /// When the change took effect.
    pub updated_at: DateTime<Utc>,
}
