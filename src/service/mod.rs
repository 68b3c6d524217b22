//! Service layer: fetch, detect, merge and publish.
//!
//! [`SnapshotFetcher`] turns backend reads into best-effort lists,
//! [`NotificationService`] drives the detection cycle for one session and
//! emits events through the [`super::domain::EventBus`].

pub mod notification_service;
pub mod snapshot_fetcher;

pub use notification_service::{NotificationService, TickReport};
pub use snapshot_fetcher::SnapshotFetcher;
