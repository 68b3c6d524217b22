//! Snapshot diffing: turns consecutive auction snapshots into notifications.
//!
//! [`StateChangeDetector`] keeps the previous snapshot list for each
//! [`SnapshotCategory`] and compares every fresh list against it. A
//! transition is only recognized between two *known* states: an auction
//! that was absent from the previous list never fires, whatever its state.
//!
//! Diffing is single-step. If an auction moves `outbid → done` between two
//! polls, only the finished event fires because the previous state was
//! already `outbid`; intermediate states are never inferred.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AuctionId, AuctionSnapshot, AuctionState, NotificationKind, NotificationRecord};

/// Which of the user's auction lists a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotCategory {
    /// Auctions the user has placed bids on.
    Bidding,
    /// Auctions the user created.
    Mine,
}

impl SnapshotCategory {
    /// Label used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bidding => "bidding",
            Self::Mine => "mine",
        }
    }
}

/// Previous-snapshot cache plus the transition rules.
///
/// Performs no I/O and cannot fail. Detection time is passed in by the
/// caller.
#[derive(Debug, Default)]
pub struct StateChangeDetector {
    bidding: CacheSlot,
    mine: CacheSlot,
}

/// Cached list of one category plus the sequence number of the fetch it
/// came from.
#[derive(Debug, Default)]
struct CacheSlot {
    snapshots: Vec<AuctionSnapshot>,
    sequence: u64,
}

impl StateChangeDetector {
    /// Creates a detector with both caches empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs `current` against the cached list for `category`, then replaces
    /// the cache with `current`.
    ///
    /// The cache is replaced even when `current` is empty: an empty result
    /// means "no auctions in this category".
    pub fn detect(
        &mut self,
        category: SnapshotCategory,
        current: Vec<AuctionSnapshot>,
        detected_at: DateTime<Utc>,
    ) -> Vec<NotificationRecord> {
        let slot = self.slot(category);
        let records = diff(category, &slot.snapshots, &current, detected_at);
        slot.snapshots = current;
        records
    }

    /// Like [`StateChangeDetector::detect`], for a fetch numbered
    /// `sequence`. Returns `None` and leaves the cache alone if a fetch with
    /// the same or a higher number was already applied to `category`.
    pub fn detect_sequenced(
        &mut self,
        category: SnapshotCategory,
        sequence: u64,
        current: Vec<AuctionSnapshot>,
        detected_at: DateTime<Utc>,
    ) -> Option<Vec<NotificationRecord>> {
        if sequence <= self.slot(category).sequence {
            return None;
        }
        self.slot(category).sequence = sequence;
        Some(self.detect(category, current, detected_at))
    }

    /// Forgets both previous snapshots. Sequence numbers are kept, so a
    /// fetch issued before the reset can still not overwrite a newer one.
    pub fn reset(&mut self) {
        self.bidding.snapshots.clear();
        self.mine.snapshots.clear();
    }

    fn slot(&mut self, category: SnapshotCategory) -> &mut CacheSlot {
        match category {
            SnapshotCategory::Bidding => &mut self.bidding,
            SnapshotCategory::Mine => &mut self.mine,
        }
    }
}

/// Computes the notifications fired by moving from `previous` to `current`.
#[must_use]
pub fn diff(
    category: SnapshotCategory,
    previous: &[AuctionSnapshot],
    current: &[AuctionSnapshot],
    detected_at: DateTime<Utc>,
) -> Vec<NotificationRecord> {
    let previous_states: HashMap<AuctionId, AuctionState> = previous
        .iter()
        .map(|snapshot| (snapshot.auction_id, snapshot.state))
        .collect();

    current
        .iter()
        .filter_map(|snapshot| {
            let before = previous_states.get(&snapshot.auction_id)?;
            let kind = transition(category, *before, snapshot.state)?;
            Some(NotificationRecord::synthesized(
                snapshot.auction_id,
                kind,
                snapshot.title.clone(),
                detected_at,
            ))
        })
        .collect()
}

/// Event fired by a single known-to-known state change, if any.
fn transition(
    category: SnapshotCategory,
    before: AuctionState,
    after: AuctionState,
) -> Option<NotificationKind> {
    match category {
        SnapshotCategory::Bidding => {
            if before != AuctionState::Outbid && after == AuctionState::Outbid {
                Some(NotificationKind::Outbid)
            } else if before != AuctionState::Done && after == AuctionState::Done {
                Some(NotificationKind::BidFinished)
            } else {
                None
            }
        }
        SnapshotCategory::Mine => {
            (before != AuctionState::Done && after == AuctionState::Done)
                .then_some(NotificationKind::MyFinished)
        }
    }
}
