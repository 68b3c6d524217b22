//! Notification service: one controller per active session.
//!
//! [`NotificationService`] owns the fetcher, the detector, the store and the
//! session token, and wires them: fetch → detect → merge → publish.
//!
//! # Concurrency
//!
//! - The three fetches of a tick run concurrently and each completion is
//!   applied on its own, so a slow or failing category never holds back the
//!   others.
//! - A category's read-cache / diff / replace-cache step runs under the
//!   detector mutex without awaiting in between.
//! - Bidding and owned fetches are numbered. A fetch that completes after
//!   a later fetch of the same category was applied is dropped, so the
//!   cache never moves back in time.
//! - Every session gets a generation number. Completions that arrive after
//!   the generation changed (logout, new token) or after shutdown are dropped
//!   before they touch the detector or the store. In-flight requests are
//!   never aborted.
//!
//! # Sessions
//!
//! Each session names a session key. The notification list is stored per
//! key; starting a session with a different key swaps in that key's list,
//! so one user's notifications never show up for another.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::SnapshotFetcher;
use crate::backend::AuctionBackend;
use crate::domain::{
    AuctionSnapshot, AuthToken, EventBus, NotificationRecord, NotificationStore, NotifierEvent,
    SnapshotCategory, StateChangeDetector,
};
use crate::persistence::StorageProvider;

/// Outcome of one detection tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Records added from the bidding category.
    pub bidding_added: usize,
    /// Records added from the owned category.
    pub owned_added: usize,
    /// Records added from the server history.
    pub server_added: usize,
    /// `true` if the tick did not run because there was no current session.
    pub skipped: bool,
}

impl TickReport {
    const fn skipped() -> Self {
        Self {
            bidding_added: 0,
            owned_added: 0,
            server_added: 0,
            skipped: true,
        }
    }

    /// Total records added by the tick.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.bidding_added + self.owned_added + self.server_added
    }
}

/// The notification list of one session key.
#[derive(Debug)]
struct SessionStore {
    key: String,
    records: NotificationStore,
}

impl SessionStore {
    fn open(storage: &dyn StorageProvider, key: String) -> Self {
        let records = NotificationStore::restore(storage.open(&key));
        Self { key, records }
    }
}

/// Session-scoped notification controller.
#[derive(Debug)]
pub struct NotificationService<B> {
    fetcher: SnapshotFetcher<B>,
    detector: Mutex<StateChangeDetector>,
    storage: Arc<dyn StorageProvider>,
    store: RwLock<SessionStore>,
    fetch_sequence: AtomicU64,
    event_bus: EventBus,
    token: RwLock<Option<AuthToken>>,
    generation: watch::Sender<u64>,
    shutdown: watch::Sender<bool>,
    poll_interval: Duration,
}

impl<B: AuctionBackend> NotificationService<B> {
    /// Creates a service with no session. The list stored under
    /// `session_key` is restored right away so the UI has something to show
    /// before the first fetch completes.
    #[must_use]
    pub fn new(
        backend: Arc<B>,
        storage: Arc<dyn StorageProvider>,
        session_key: impl Into<String>,
        event_bus: EventBus,
        poll_interval: Duration,
    ) -> Self {
        let (generation, _) = watch::channel(0);
        let (shutdown, _) = watch::channel(false);
        let store = SessionStore::open(storage.as_ref(), session_key.into());
        Self {
            fetcher: SnapshotFetcher::new(backend),
            detector: Mutex::new(StateChangeDetector::new()),
            storage,
            store: RwLock::new(store),
            fetch_sequence: AtomicU64::new(0),
            event_bus,
            token: RwLock::new(None),
            generation,
            shutdown,
            poll_interval: poll_interval.max(Duration::from_secs(1)),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Interval between polling ticks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Installs `token` as the current session and spawns its polling loop.
    ///
    /// Any previous session's loop stops on its own once it sees the new
    /// generation. The first tick runs immediately.
    pub async fn start_session(
        self: &Arc<Self>,
        token: AuthToken,
        session_key: impl Into<String>,
    ) -> JoinHandle<()> {
        let generation = self.open_session(token, session_key).await;
        let service = Arc::clone(self);
        tokio::spawn(async move { service.run_polling(generation).await })
    }

    /// Installs `token` as the current session without a polling loop.
    /// Ticks then only run through [`NotificationService::tick`].
    pub async fn open_session(&self, token: AuthToken, session_key: impl Into<String>) -> u64 {
        let session_key = session_key.into();
        let generation = self
            .install_session(Some((token, session_key.clone())))
            .await;
        let unread_count = self.unread_count().await;
        tracing::info!(generation, session_key = %session_key, unread_count, "session started");
        let _ = self.event_bus.publish(NotifierEvent::SessionStarted {
            session_key,
            unread_count,
            timestamp: Utc::now(),
        });
        generation
    }

    /// Ends the current session (logout). Its polling loop stops and late
    /// responses are ignored. The notification list is kept.
    pub async fn end_session(&self) {
        let generation = self.install_session(None).await;
        tracing::info!(generation, "session ended");
        let _ = self.event_bus.publish(NotifierEvent::SessionEnded {
            timestamp: Utc::now(),
        });
    }

    /// Key of the notification list currently shown.
    pub async fn session_key(&self) -> String {
        self.store.read().await.key.clone()
    }

    /// Returns `true` if a session token is installed.
    pub async fn has_session(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Stops every polling loop for good (the hosting view went away).
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
        tracing::info!("notification service shutting down");
    }

    /// Runs one fetch → detect → merge cycle for the current session.
    pub async fn tick(&self) -> TickReport {
        match self.current_session().await {
            Some((token, generation)) => self.tick_with(&token, generation).await,
            None => {
                tracing::debug!("no session, tick skipped");
                TickReport::skipped()
            }
        }
    }

    /// Marks every record read, then tells the backend.
    ///
    /// The local update is applied first and is never rolled back: if the
    /// backend call fails the failure is only logged. Returns how many
    /// records changed.
    pub async fn mark_all_read(&self) -> usize {
        let (marked, unread_count) = {
            let mut store = self.store.write().await;
            let marked = store.records.mark_all_read();
            (marked, store.records.unread_count())
        };
        tracing::info!(marked, "marked all notifications read");
        let _ = self.event_bus.publish(NotifierEvent::AllRead {
            marked,
            unread_count,
            timestamp: Utc::now(),
        });

        let token = self.token.read().await.clone();
        match token {
            Some(token) => {
                if let Err(e) = self.fetcher.mark_all_read(&token).await {
                    tracing::warn!(error = %e, "backend mark-all-read failed, local state kept");
                }
            }
            None => tracing::debug!("no session, server read state not updated"),
        }
        marked
    }

    /// Records in display order.
    pub async fn list(&self) -> Vec<NotificationRecord> {
        self.store.read().await.records.list().to_vec()
    }

    /// Number of unread records.
    pub async fn unread_count(&self) -> usize {
        self.store.read().await.records.unread_count()
    }

    /// Polls on the configured interval until `generation` is no longer
    /// current or the service shuts down.
    async fn run_polling(self: Arc<Self>, generation: u64) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut generation_rx = self.generation.subscribe();
        let mut shutdown_rx = self.shutdown.subscribe();

        while self.is_current(generation) {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(token) = self.token.read().await.clone() else {
                        break;
                    };
                    let report = self.tick_with(&token, generation).await;
                    tracing::debug!(
                        generation,
                        bidding = report.bidding_added,
                        owned = report.owned_added,
                        server = report.server_added,
                        "poll tick finished"
                    );
                }
                changed = generation_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!(generation, "polling stopped");
    }

    async fn tick_with(&self, token: &AuthToken, generation: u64) -> TickReport {
        if !self.is_current(generation) {
            return TickReport::skipped();
        }
        let (bidding_added, owned_added, server_added) = tokio::join!(
            async {
                let sequence = self.next_fetch_sequence();
                let snapshots = self.fetcher.fetch_bidding_auctions(token).await;
                self.apply_snapshots(generation, SnapshotCategory::Bidding, sequence, snapshots)
                    .await
            },
            async {
                let sequence = self.next_fetch_sequence();
                let snapshots = self.fetcher.fetch_owned_auctions(token).await;
                self.apply_snapshots(generation, SnapshotCategory::Mine, sequence, snapshots)
                    .await
            },
            async {
                let records = self.fetcher.fetch_server_notifications(token).await;
                self.merge(generation, records, Vec::new()).await
            },
        );
        TickReport {
            bidding_added,
            owned_added,
            server_added,
            skipped: false,
        }
    }

    async fn apply_snapshots(
        &self,
        generation: u64,
        category: SnapshotCategory,
        sequence: u64,
        snapshots: Vec<AuctionSnapshot>,
    ) -> usize {
        let detected = {
            let mut detector = self.detector.lock().await;
            if !self.is_current(generation) {
                tracing::debug!(category = category.as_str(), "stale snapshot dropped");
                return 0;
            }
            let Some(detected) =
                detector.detect_sequenced(category, sequence, snapshots, Utc::now())
            else {
                tracing::debug!(
                    category = category.as_str(),
                    sequence,
                    "out-of-order snapshot dropped"
                );
                return 0;
            };
            detected
        };
        for record in &detected {
            tracing::info!(
                category = category.as_str(),
                auction_id = %record.auction_id(),
                kind = %record.kind(),
                "state change detected"
            );
        }
        self.merge(generation, Vec::new(), detected).await
    }

    async fn merge(
        &self,
        generation: u64,
        server_records: Vec<NotificationRecord>,
        local_records: Vec<NotificationRecord>,
    ) -> usize {
        let (added, unread_count) = {
            let mut store = self.store.write().await;
            if !self.is_current(generation) {
                tracing::debug!("stale merge dropped");
                return 0;
            }
            let added = store.records.merge(server_records, local_records);
            (added, store.records.unread_count())
        };
        let count = added.len();
        if count > 0 {
            let _ = self.event_bus.publish(NotifierEvent::NotificationsAdded {
                records: added,
                unread_count,
                timestamp: Utc::now(),
            });
        }
        count
    }

    async fn current_session(&self) -> Option<(AuthToken, u64)> {
        let token = self.token.read().await;
        let generation = *self.generation.borrow();
        token.clone().map(|t| (t, generation))
    }

    /// Swaps the session token and starts a new generation. The store swap,
    /// the detector reset and the generation bump all happen under the store
    /// and detector locks, so no in-flight pass can mix two sessions.
    /// Ending a session (`None`) keeps the current list.
    async fn install_session(&self, session: Option<(AuthToken, String)>) -> u64 {
        let mut slot = self.token.write().await;
        let mut store = self.store.write().await;
        let mut detector = self.detector.lock().await;
        *slot = match session {
            Some((token, key)) => {
                if key != store.key {
                    tracing::info!(from = %store.key, to = %key, "switching notification store");
                    *store = SessionStore::open(self.storage.as_ref(), key);
                }
                Some(token)
            }
            None => None,
        };
        detector.reset();
        let mut next = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            next = *g;
        });
        next
    }

    fn next_fetch_sequence(&self) -> u64 {
        self.fetch_sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        *self.generation.borrow() == generation && !*self.shutdown.borrow()
    }
}
