//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::backend::HttpBackend;
use crate::domain::EventBus;
use crate::service::NotificationService;

/// The notification service as wired in the running binary.
pub type AppService = NotificationService<HttpBackend>;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Notification service for the current session.
    pub service: Arc<AppService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds state around `service`, sharing its event bus.
    #[must_use]
    pub fn new(service: Arc<AppService>) -> Self {
        let event_bus = service.event_bus().clone();
        Self { service, event_bus }
    }
}
