//! Backend layer: the marketplace REST API as seen by the engine.
//!
//! [`AuctionBackend`] is the seam between the engine and its transport.
//! [`HttpBackend`] talks to the real REST API with `reqwest`; a push-based
//! transport or a test double can implement the same trait without the
//! detector or store noticing.

pub mod dto;
pub mod http;

use std::fmt;
use std::future::Future;

pub use http::HttpBackend;

use crate::domain::{AuctionSnapshot, AuthToken, NotificationRecord};
use crate::error::NotifierError;

/// Read and acknowledge operations the engine needs from the backend.
///
/// Implementations report failures; absorbing them into empty results is
/// the job of [`crate::service::SnapshotFetcher`].
pub trait AuctionBackend: Send + Sync + fmt::Debug + 'static {
    /// Auctions the user has placed bids on.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Unauthorized`] on 401,
    /// [`NotifierError::Backend`] on transport or status failures and
    /// [`NotifierError::Decode`] on an undecodable body.
    fn bidding_auctions(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<Vec<AuctionSnapshot>, NotifierError>> + Send;

    /// Auctions the user created.
    ///
    /// # Errors
    ///
    /// Same as [`AuctionBackend::bidding_auctions`].
    fn owned_auctions(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<Vec<AuctionSnapshot>, NotifierError>> + Send;

    /// The backend's notification history for the user.
    ///
    /// # Errors
    ///
    /// Same as [`AuctionBackend::bidding_auctions`].
    fn notifications(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<Vec<NotificationRecord>, NotifierError>> + Send;

    /// Marks every notification of the user read on the server. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Unauthorized`] on 401 and
    /// [`NotifierError::Backend`] on any other failure.
    fn mark_all_read(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<(), NotifierError>> + Send;
}
