//! Snapshot fetcher: best-effort reads from the backend.

use std::sync::Arc;

use crate::backend::AuctionBackend;
use crate::domain::{AuctionSnapshot, AuthToken, NotificationRecord, SnapshotCategory};
use crate::error::NotifierError;

/// Wraps an [`AuctionBackend`] and absorbs read failures.
///
/// Every read returns a plain list. A network error, non-2xx status, 401 or
/// undecodable body is logged and turned into an empty list; the next poll
/// tick simply tries again. The fetcher never touches the store.
#[derive(Debug)]
pub struct SnapshotFetcher<B> {
    backend: Arc<B>,
}

impl<B: AuctionBackend> SnapshotFetcher<B> {
    /// Creates a fetcher over `backend`.
    #[must_use]
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Auctions the user is bidding on, or an empty list on failure.
    pub async fn fetch_bidding_auctions(&self, token: &AuthToken) -> Vec<AuctionSnapshot> {
        absorb(
            SnapshotCategory::Bidding.as_str(),
            self.backend.bidding_auctions(token).await,
        )
    }

    /// Auctions the user created, or an empty list on failure.
    pub async fn fetch_owned_auctions(&self, token: &AuthToken) -> Vec<AuctionSnapshot> {
        absorb(
            SnapshotCategory::Mine.as_str(),
            self.backend.owned_auctions(token).await,
        )
    }

    /// The backend's notification history, or an empty list on failure.
    pub async fn fetch_server_notifications(&self, token: &AuthToken) -> Vec<NotificationRecord> {
        absorb("notifications", self.backend.notifications(token).await)
    }

    /// Forwards mark-all-read to the backend. Unlike the reads, the result
    /// is returned so the caller can log it.
    ///
    /// # Errors
    ///
    /// Propagates the backend error unchanged.
    pub async fn mark_all_read(&self, token: &AuthToken) -> Result<(), NotifierError> {
        self.backend.mark_all_read(token).await
    }
}

fn absorb<T>(source: &'static str, result: Result<Vec<T>, NotifierError>) -> Vec<T> {
    match result {
        Ok(items) => {
            tracing::debug!(source, count = items.len(), "fetched");
            items
        }
        Err(NotifierError::Unauthorized) => {
            tracing::warn!(source, "backend rejected the session token (unauthorized)");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(source, error = %e, "fetch failed, treating as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_passes_through_success() {
        let items = absorb("test", Ok(vec![1, 2, 3]));
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn absorb_turns_errors_into_empty() {
        let items: Vec<u8> = absorb("test", Err(NotifierError::Unauthorized));
        assert!(items.is_empty());
        let items: Vec<u8> = absorb("test", Err(NotifierError::Backend("503".to_string())));
        assert!(items.is_empty());
    }
}
