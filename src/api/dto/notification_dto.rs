//! Notification list and read-state DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::NotificationRecord;
use crate::service::TickReport;

/// Response for `GET /api/v1/notifications`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationListResponse {
    /// Records, newest first.
    pub data: Vec<NotificationRecord>,
    /// Number of unread records in `data`.
    pub unread_count: usize,
}

/// Response for `GET /api/v1/notifications/unread-count`.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    /// Badge count.
    pub unread_count: usize,
}

/// Response for `POST /api/v1/notifications/mark-all-read`.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    /// Records that went from unread to read.
    pub marked: usize,
    /// Unread count afterwards (always 0).
    pub unread_count: usize,
}

/// Response for `POST /api/v1/notifications/refresh`.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct RefreshResponse {
    /// Records added from the bidding category.
    pub bidding_added: usize,
    /// Records added from the owned category.
    pub owned_added: usize,
    /// Records added from the server history.
    pub server_added: usize,
    /// Unread count after the tick.
    pub unread_count: usize,
}

impl RefreshResponse {
    /// Combines a tick report with the resulting unread count.
    #[must_use]
    pub const fn from_report(report: TickReport, unread_count: usize) -> Self {
        Self {
            bidding_added: report.bidding_added,
            owned_added: report.owned_added,
            server_added: report.server_added,
            unread_count,
        }
    }
}
