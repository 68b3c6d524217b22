//! OpenAPI document for the local API.

use utoipa::OpenApi;

use crate::api::dto::{
    MarkAllReadResponse, NotificationListResponse, RefreshResponse, SessionRequest,
    SessionResponse, UnreadCountResponse,
};
use crate::api::handlers::{notifications, session, system};
use crate::domain::{
    AuctionId, AuctionState, NotificationId, NotificationKind, NotificationRecord,
    NotificationSource,
};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "bid-notifier", description = "Auction notification engine, local UI API"),
    paths(
        system::health_handler,
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_all_read,
        notifications::refresh,
        session::start_session,
        session::end_session,
    ),
    components(schemas(
        system::HealthResponse,
        NotificationListResponse,
        UnreadCountResponse,
        MarkAllReadResponse,
        RefreshResponse,
        SessionRequest,
        SessionResponse,
        NotificationRecord,
        NotificationId,
        NotificationKind,
        NotificationSource,
        AuctionId,
        AuctionState,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Liveness"),
        (name = "Notifications", description = "Notification list and read state"),
        (name = "Session", description = "Login and logout"),
    )
)]
pub struct ApiDoc;
