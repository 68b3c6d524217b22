//! Point-in-time view of an auction's bidding-relevant fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuctionId, AuctionState};

/// One auction as returned by a single poll of the backend.
///
/// Snapshots are value objects: a fresh list replaces the previous one on
/// every detection pass, nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionSnapshot {
    /// Backend auction id.
    pub auction_id: AuctionId,
    /// Display title.
    pub title: String,
    /// State relative to the signed-in user.
    pub state: AuctionState,
    /// Scheduled end of the auction.
    pub end_time: DateTime<Utc>,
}

impl AuctionSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(
        auction_id: AuctionId,
        title: impl Into<String>,
        state: AuctionState,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            auction_id,
            title: title.into(),
            state,
            end_time,
        }
    }
}
