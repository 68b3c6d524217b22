//! Domain layer: auction snapshots, notification records, the state-change
//! detector, the notification store and the event system.
//!
//! Everything here is free of network I/O. The detector is pure; the store
//! only touches its injected [`crate::persistence::RecordStorage`].

pub mod auction_id;
pub mod auction_snapshot;
pub mod auction_state;
pub mod auth_token;
pub mod detector;
pub mod event_bus;
pub mod notification;
pub mod notification_store;
pub mod notifier_event;

pub use auction_id::AuctionId;
pub use auction_snapshot::AuctionSnapshot;
pub use auction_state::AuctionState;
pub use auth_token::AuthToken;
pub use detector::{SnapshotCategory, StateChangeDetector};
pub use event_bus::EventBus;
pub use notification::{NotificationId, NotificationKind, NotificationRecord, NotificationSource};
pub use notification_store::NotificationStore;
pub use notifier_event::NotifierEvent;
