//! Events emitted by the notification engine.
//!
//! Every change to the notification list publishes a [`NotifierEvent`]
//! through the [`super::EventBus`]. WebSocket clients receive them as push
//! updates so the UI can refresh its list and badge without polling.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::NotificationRecord;

/// Engine event broadcast to UI subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum NotifierEvent {
    /// New records entered the store.
    NotificationsAdded {
        /// The records that were added, newest first.
        records: Vec<NotificationRecord>,
        /// Unread count after the merge.
        unread_count: usize,
        /// Merge time.
        timestamp: DateTime<Utc>,
    },

    /// The user marked everything read.
    AllRead {
        /// How many records changed from unread to read.
        marked: usize,
        /// Unread count after the operation (always 0).
        unread_count: usize,
        /// Operation time.
        timestamp: DateTime<Utc>,
    },

    /// A session started. If it uses a different session key than before,
    /// the list was swapped and the UI should reload it.
    SessionStarted {
        /// Key of the session's notification store.
        session_key: String,
        /// Unread count of that store.
        unread_count: usize,
        /// Time the session started.
        timestamp: DateTime<Utc>,
    },

    /// The session ended and polling stopped.
    SessionEnded {
        /// Time the session ended.
        timestamp: DateTime<Utc>,
    },
}

impl NotifierEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::NotificationsAdded { .. } => "notifications_added",
            Self::AllRead { .. } => "all_read",
            Self::SessionStarted { .. } => "session_started",
            Self::SessionEnded { .. } => "session_ended",
        }
    }

    /// Returns the time the event was produced.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::NotificationsAdded { timestamp, .. }
            | Self::AllRead { timestamp, .. }
            | Self::SessionStarted { timestamp, .. }
            | Self::SessionEnded { timestamp } => *timestamp,
        }
    }
}
