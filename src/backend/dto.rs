//! Wire shapes of the marketplace backend's JSON responses.
//!
//! Field names follow the backend's camelCase DTOs. Unknown fields are
//! ignored. Conversions into domain types live here so the rest of the
//! crate never sees raw backend strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::domain::{
    AuctionId, AuctionSnapshot, AuctionState, NotificationId, NotificationKind, NotificationRecord,
};

/// One row of `GET /api/Profile/bidding` or `GET /api/Profile/auctions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionDto {
    /// Backend auction id.
    pub auction_id: i64,
    /// Display title; missing or `null` means empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Raw state; normalized on deserialization, missing or `null` means in
    /// progress.
    #[serde(default = "default_state")]
    pub auction_state: AuctionState,
    /// Scheduled end, ISO-8601 with or without offset (naive means UTC).
    #[serde(deserialize_with = "lenient_datetime")]
    pub end_date_time: DateTime<Utc>,
}

impl From<AuctionDto> for AuctionSnapshot {
    fn from(dto: AuctionDto) -> Self {
        Self::new(
            AuctionId::new(dto.auction_id),
            dto.title,
            dto.auction_state,
            dto.end_date_time,
        )
    }
}

/// Server notification ids may arrive as numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNotificationId {
    /// Numeric id.
    Number(i64),
    /// String id.
    Text(String),
}

impl From<RawNotificationId> for NotificationId {
    fn from(raw: RawNotificationId) -> Self {
        match raw {
            RawNotificationId::Number(n) => Self::new(n.to_string()),
            RawNotificationId::Text(s) => Self::new(s),
        }
    }
}

/// One row of `GET /api/Notifications`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    /// Server-assigned id.
    pub notification_id: RawNotificationId,
    /// Subject auction.
    pub auction_id: i64,
    /// Raw kind string (`outbid`, `bid-finished`, `my-finished`).
    pub kind: String,
    /// Auction title at report time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Report time.
    #[serde(deserialize_with = "lenient_datetime")]
    pub timestamp: DateTime<Utc>,
    /// Server-side read flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read: bool,
}

impl NotificationDto {
    /// Converts into a server-sourced record. Returns `None` for a kind this
    /// client does not know.
    #[must_use]
    pub fn into_record(self) -> Option<NotificationRecord> {
        let kind = match self.kind.as_str() {
            "outbid" => NotificationKind::Outbid,
            "bid-finished" => NotificationKind::BidFinished,
            "my-finished" => NotificationKind::MyFinished,
            _ => return None,
        };
        Some(NotificationRecord::from_server(
            self.notification_id.into(),
            AuctionId::new(self.auction_id),
            kind,
            self.title,
            self.timestamp,
            self.is_read,
        ))
    }
}

const fn default_state() -> AuctionState {
    AuctionState::InProgress
}

/// Decodes a JSON array row by row. Rows that do not decode are skipped and
/// counted instead of failing the whole list.
#[must_use]
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<serde_json::Value>) -> (Vec<T>, usize) {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();
    let skipped = total - decoded.len();
    (decoded, skipped)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 timestamps and offset-less ISO-8601 ones (read as UTC).
fn lenient_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Parses a backend timestamp string.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn auction_row_with_extra_fields_parses() {
        let json = r#"{
            "auctionId": 7,
            "title": "Desk lamp",
            "description": "brass",
            "startingPrice": 10,
            "auctionState": "outbid",
            "endDateTime": "2025-06-01T18:00:00Z",
            "createdBy": "someone"
        }"#;
        let Ok(dto) = serde_json::from_str::<AuctionDto>(json) else {
            panic!("row should parse");
        };
        let snapshot = AuctionSnapshot::from(dto);
        assert_eq!(snapshot.auction_id, AuctionId::new(7));
        assert_eq!(snapshot.state, AuctionState::Outbid);
        assert_eq!(snapshot.end_time.hour(), 18);
    }

    #[test]
    fn unknown_or_missing_state_is_in_progress() {
        let json = r#"[
            {"auctionId": 1, "title": "a", "auctionState": "Active", "endDateTime": "2025-06-01T18:00:00"},
            {"auctionId": 2, "title": "b", "endDateTime": "2025-06-01T18:00:00"}
        ]"#;
        let Ok(rows) = serde_json::from_str::<Vec<AuctionDto>>(json) else {
            panic!("rows should parse");
        };
        assert!(rows.iter().all(|r| r.auction_state == AuctionState::InProgress));
    }

    #[test]
    fn null_state_and_title_do_not_fail_the_list() {
        let json = r#"[
            {"auctionId": 1, "title": "a", "auctionState": "winning", "endDateTime": "2025-06-01T18:00:00"},
            {"auctionId": 2, "title": null, "auctionState": null, "endDateTime": "2025-06-01T18:00:00"}
        ]"#;
        let Ok(rows) = serde_json::from_str::<Vec<AuctionDto>>(json) else {
            panic!("rows should parse");
        };
        let Some(second) = rows.get(1) else {
            panic!("expected two rows");
        };
        assert_eq!(second.auction_state, AuctionState::InProgress);
        assert!(second.title.is_empty());
    }

    #[test]
    fn undecodable_rows_are_skipped_individually() {
        let json = r#"[
            {"auctionId": 1, "title": "a", "auctionState": "outbid", "endDateTime": "2025-06-01T18:00:00"},
            {"auctionId": "not-a-number", "endDateTime": "2025-06-01T18:00:00"},
            {"auctionId": 3, "auctionState": "done", "endDateTime": null}
        ]"#;
        let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(json) else {
            panic!("array should parse");
        };
        let (rows, skipped) = decode_rows::<AuctionDto>(values);
        assert_eq!(skipped, 2);
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r.auction_id == 1));
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let Some(dt) = parse_timestamp("2025-02-03T04:05:06.789") else {
            panic!("should parse");
        };
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 2, 3));
        assert_eq!(dt.second(), 6);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn offset_timestamps_are_converted() {
        let Some(dt) = parse_timestamp("2025-02-03T04:00:00+02:00") else {
            panic!("should parse");
        };
        assert_eq!(dt.hour(), 2);
    }

    #[test]
    fn notification_row_with_numeric_id() {
        let json = r#"{
            "notificationId": 55,
            "auctionId": 7,
            "kind": "bid-finished",
            "title": "Desk lamp",
            "timestamp": "2025-06-01T18:00:00Z",
            "isRead": true
        }"#;
        let Ok(dto) = serde_json::from_str::<NotificationDto>(json) else {
            panic!("row should parse");
        };
        let Some(record) = dto.into_record() else {
            panic!("kind should be known");
        };
        assert_eq!(record.notification_id().as_str(), "55");
        assert_eq!(record.kind(), NotificationKind::BidFinished);
        assert!(record.is_read());
    }

    #[test]
    fn unknown_notification_kind_is_dropped() {
        let json = r#"{
            "notificationId": "n-1",
            "auctionId": 7,
            "kind": "price-drop",
            "timestamp": "2025-06-01T18:00:00Z"
        }"#;
        let Ok(dto) = serde_json::from_str::<NotificationDto>(json) else {
            panic!("row should parse");
        };
        assert!(dto.into_record().is_none());
    }
}
