//! Bidding-relevant auction state as seen by the current user.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// One of the four states the backend reports for an auction, relative to
/// the signed-in user.
///
/// Deserialization is lenient: `null` and any string other than `winning`,
/// `outbid` or `done` normalize to [`AuctionState::InProgress`].
/// An unexpected value therefore never looks like a transition into
/// `outbid` or `done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AuctionState {
    /// Another bidder holds the highest bid.
    Outbid,
    /// Auction is running and the user is neither winning nor outbid
    /// (also the fallback for unrecognized values).
    InProgress,
    /// The user currently holds the highest bid.
    Winning,
    /// The auction has ended.
    Done,
}

impl AuctionState {
    /// Maps a raw backend state string onto one of the four states.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "winning" => Self::Winning,
            "outbid" => Self::Outbid,
            "done" => Self::Done,
            _ => Self::InProgress,
        }
    }

    /// Returns the wire string for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outbid => "outbid",
            Self::InProgress => "inProgress",
            Self::Winning => "winning",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AuctionState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or(Self::InProgress, |raw| Self::normalize(&raw)))
    }
}
