//! `reqwest` implementation of [`AuctionBackend`].

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::AuctionBackend;
use super::dto::{AuctionDto, NotificationDto, decode_rows};
use crate::domain::{AuctionSnapshot, AuthToken, NotificationRecord};
use crate::error::NotifierError;

const BIDDING_PATH: &str = "/api/Profile/bidding";
const OWNED_PATH: &str = "/api/Profile/auctions";
const NOTIFICATIONS_PATH: &str = "/api/Notifications";
const MARK_ALL_READ_PATH: &str = "/api/Notifications/mark-all-read";

/// REST client for the marketplace backend.
///
/// Every request carries `Authorization: Bearer <token>` and is bounded by
/// the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client for `base_url` (e.g. `https://localhost:7056`).
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NotifierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bid-notifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NotifierError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
    ) -> Result<T, NotifierError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token.expose())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn auctions(
        &self,
        path: &str,
        token: &AuthToken,
    ) -> Result<Vec<AuctionSnapshot>, NotifierError> {
        let rows: Vec<serde_json::Value> = self.get_json(path, token).await?;
        let (rows, skipped) = decode_rows::<AuctionDto>(rows);
        if skipped > 0 {
            tracing::warn!(path, skipped, "ignored undecodable auction rows");
        }
        Ok(rows.into_iter().map(AuctionSnapshot::from).collect())
    }
}

impl AuctionBackend for HttpBackend {
    async fn bidding_auctions(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<AuctionSnapshot>, NotifierError> {
        self.auctions(BIDDING_PATH, token).await
    }

    async fn owned_auctions(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<AuctionSnapshot>, NotifierError> {
        self.auctions(OWNED_PATH, token).await
    }

    async fn notifications(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<NotificationRecord>, NotifierError> {
        let rows: Vec<serde_json::Value> = self.get_json(NOTIFICATIONS_PATH, token).await?;
        let (rows, skipped) = decode_rows::<NotificationDto>(rows);
        if skipped > 0 {
            tracing::warn!(skipped, "ignored undecodable notification rows");
        }
        let total = rows.len();
        let records: Vec<NotificationRecord> =
            rows.into_iter().filter_map(NotificationDto::into_record).collect();
        if records.len() != total {
            tracing::debug!(
                skipped = total - records.len(),
                "ignored server notifications of unknown kind"
            );
        }
        Ok(records)
    }

    async fn mark_all_read(&self, token: &AuthToken) -> Result<(), NotifierError> {
        self.client
            .post(self.url(MARK_ALL_READ_PATH))
            .bearer_auth(token.expose())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
