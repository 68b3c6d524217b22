//! Notification records shown to the user.
//!
//! A [`NotificationRecord`] is an immutable fact about an auction event,
//! either synthesized locally by the [`super::StateChangeDetector`] or
//! reported by the backend's notification history. The read flag is the
//! only mutable field and it only ever moves from unread to read.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AuctionId;

/// Identifier of a notification record.
///
/// Locally synthesized records derive it from the auction id; server
/// records carry the server-assigned id. The two namespaces are kept apart
/// by [`NotificationSource`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Wraps a raw id.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Id used for records synthesized from a transition of `auction_id`.
    #[must_use]
    pub fn for_auction(auction_id: AuctionId) -> Self {
        Self(auction_id.to_string())
    }

    /// Returns the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happened to the subject auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// Someone placed a higher bid on an auction the user is bidding on.
    Outbid,
    /// An auction the user is bidding on has finished.
    BidFinished,
    /// An auction the user created has finished.
    MyFinished,
}

impl NotificationKind {
    /// Returns the wire string for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outbid => "outbid",
            Self::BidFinished => "bid-finished",
            Self::MyFinished => "my-finished",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSource {
    /// Synthesized by the state-change detector on this client.
    Local,
    /// Fetched from the backend's notification history.
    Server,
}

/// A single notification as stored, persisted and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    notification_id: NotificationId,
    source: NotificationSource,
    auction_id: AuctionId,
    kind: NotificationKind,
    title: String,
    timestamp: DateTime<Utc>,
    is_read: bool,
}

impl NotificationRecord {
    /// Creates an unread record for a transition detected at `detected_at`.
    #[must_use]
    pub fn synthesized(
        auction_id: AuctionId,
        kind: NotificationKind,
        title: impl Into<String>,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            notification_id: NotificationId::for_auction(auction_id),
            source: NotificationSource::Local,
            auction_id,
            kind,
            title: title.into(),
            timestamp: detected_at,
            is_read: false,
        }
    }

    /// Creates a record from the backend's notification history.
    #[must_use]
    pub fn from_server(
        notification_id: NotificationId,
        auction_id: AuctionId,
        kind: NotificationKind,
        title: impl Into<String>,
        timestamp: DateTime<Utc>,
        is_read: bool,
    ) -> Self {
        Self {
            notification_id,
            source: NotificationSource::Server,
            auction_id,
            kind,
            title: title.into(),
            timestamp,
            is_read,
        }
    }

    /// Record id.
    #[must_use]
    pub const fn notification_id(&self) -> &NotificationId {
        &self.notification_id
    }

    /// Record origin.
    #[must_use]
    pub const fn source(&self) -> NotificationSource {
        self.source
    }

    /// Subject auction.
    #[must_use]
    pub const fn auction_id(&self) -> AuctionId {
        self.auction_id
    }

    /// Event kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Auction title captured when the event was detected.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Detection or report time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether the user has acknowledged the record.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Marks the record read. Returns `true` if it was unread before.
    pub fn mark_read(&mut self) -> bool {
        let was_unread = !self.is_read;
        self.is_read = true;
        was_unread
    }

    /// Takes over the identity of `server`, a backend copy of the same
    /// event. Read state, title and timestamp stay as they are, so later
    /// fetches of that server record are recognized as already stored.
    pub fn adopt_identity(&mut self, server: &Self) {
        self.source = server.source;
        self.notification_id = server.notification_id.clone();
    }

    /// `(source, id)` pair that identifies the record across merges.
    #[must_use]
    pub fn identity(&self) -> (NotificationSource, &NotificationId) {
        (self.source, &self.notification_id)
    }

    /// `(auction, kind)` pair describing the event the record is about.
    #[must_use]
    pub const fn subject(&self) -> (AuctionId, NotificationKind) {
        (self.auction_id, self.kind)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn synthesized_record_is_unread_and_keyed_by_auction() {
        let record =
            NotificationRecord::synthesized(AuctionId::new(7), NotificationKind::Outbid, "Lamp", at());
        assert!(!record.is_read());
        assert_eq!(record.notification_id().as_str(), "7");
        assert_eq!(record.source(), NotificationSource::Local);
        assert_eq!(record.title(), "Lamp");
    }

    #[test]
    fn mark_read_is_one_way() {
        let mut record =
            NotificationRecord::synthesized(AuctionId::new(1), NotificationKind::BidFinished, "x", at());
        assert!(record.mark_read());
        assert!(record.is_read());
        assert!(!record.mark_read());
        assert!(record.is_read());
    }

    #[test]
    fn kind_wire_names() {
        let json = serde_json::to_string(&NotificationKind::MyFinished).unwrap_or_default();
        assert_eq!(json, "\"my-finished\"");
        let Ok(kind) = serde_json::from_str::<NotificationKind>("\"bid-finished\"") else {
            panic!("kind should parse");
        };
        assert_eq!(kind, NotificationKind::BidFinished);
    }

    #[test]
    fn record_serializes_camel_case() {
        let record =
            NotificationRecord::synthesized(AuctionId::new(9), NotificationKind::Outbid, "Vase", at());
        let Ok(value) = serde_json::to_value(&record) else {
            panic!("serialization failed");
        };
        assert_eq!(value["notificationId"], "9");
        assert_eq!(value["auctionId"], 9);
        assert_eq!(value["kind"], "outbid");
        assert_eq!(value["isRead"], false);
        assert_eq!(value["source"], "local");
    }

    #[test]
    fn server_and_local_identities_differ() {
        let local =
            NotificationRecord::synthesized(AuctionId::new(5), NotificationKind::Outbid, "a", at());
        let server = NotificationRecord::from_server(
            NotificationId::new("5"),
            AuctionId::new(5),
            NotificationKind::Outbid,
            "a",
            at(),
            false,
        );
        assert_ne!(local.identity(), server.identity());
        assert_eq!(local.subject(), server.subject());
    }
}
