//! Canonical, UI-facing notification list for one session.
//!
//! [`NotificationStore`] merges server-reported and locally synthesized
//! records into a single most-recent-first list, persists it after every
//! change, and answers unread-count / list / mark-all-read.
//!
//! # Merge policy
//!
//! Merging is idempotent:
//! - a record whose `(source, id)` is already present is skipped, so the
//!   server history fetched on every tick is stored once and a server copy
//!   never resurrects a record the user already read;
//! - a record is skipped while an *unread* record about the same
//!   `(auction, kind)` exists. After the user reads it, a later transition
//!   of the same kind on the same auction is stored again;
//! - a server record skipped that way because of a local record hands its
//!   `(source, id)` to that local record, so once the user has read it the
//!   next fetch of the server copy is a plain duplicate.

use std::sync::Arc;

use super::{NotificationRecord, NotificationSource};
use crate::error::NotifierError;
use crate::persistence::RecordStorage;

/// Ordered notification list backed by a [`RecordStorage`].
#[derive(Debug)]
pub struct NotificationStore {
    records: Vec<NotificationRecord>,
    storage: Arc<dyn RecordStorage>,
}

impl NotificationStore {
    /// Creates an empty store that persists into `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn RecordStorage>) -> Self {
        Self {
            records: Vec::new(),
            storage,
        }
    }

    /// Creates a store pre-populated from `storage`.
    ///
    /// An unreadable or corrupt storage is logged and yields an empty store;
    /// the next persist overwrites it.
    #[must_use]
    pub fn restore(storage: Arc<dyn RecordStorage>) -> Self {
        let records = match storage.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "could not restore notifications, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = records.len(), "notification store restored");
        Self { records, storage }
    }

    /// Merges new records into the store and persists the result.
    ///
    /// Accepted records are placed by timestamp so the list stays newest
    /// first; on equal timestamps new records go above older ones. Returns
    /// the records that were actually added.
    pub fn merge(
        &mut self,
        server_records: Vec<NotificationRecord>,
        local_records: Vec<NotificationRecord>,
    ) -> Vec<NotificationRecord> {
        let mut added: Vec<NotificationRecord> = Vec::new();
        for record in local_records.into_iter().chain(server_records) {
            if has_identity(&self.records, &record) || has_identity(&added, &record) {
                continue;
            }
            let blocking = self
                .records
                .iter_mut()
                .chain(added.iter_mut())
                .find(|r| !r.is_read() && r.subject() == record.subject());
            if let Some(blocking) = blocking {
                if record.source() == NotificationSource::Server
                    && blocking.source() == NotificationSource::Local
                {
                    tracing::debug!(
                        auction_id = %record.auction_id(),
                        kind = %record.kind(),
                        notification_id = %record.notification_id(),
                        "server notification folded into local record"
                    );
                    blocking.adopt_identity(&record);
                }
                continue;
            }
            added.push(record);
        }
        added.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        if !added.is_empty() {
            let mut next = Vec::with_capacity(added.len() + self.records.len());
            next.extend(added.iter().cloned());
            next.append(&mut self.records);
            next.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
            self.records = next;
        }

        self.persist_or_log();
        added
    }

    /// Writes the full list to storage.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Persistence`] if the storage write fails.
    pub fn persist(&self) -> Result<(), NotifierError> {
        self.storage.save(&self.records)
    }

    /// Number of unread records, computed on every call.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_read()).count()
    }

    /// Marks every record read and persists. Returns how many records
    /// changed.
    pub fn mark_all_read(&mut self) -> usize {
        let marked = self
            .records
            .iter_mut()
            .map(NotificationRecord::mark_read)
            .filter(|changed| *changed)
            .count();
        self.persist_or_log();
        marked
    }

    /// Records in store order (most recent first).
    #[must_use]
    pub fn list(&self) -> &[NotificationRecord] {
        &self.records
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            tracing::error!(error = %e, "failed to persist notifications");
        }
    }
}

fn has_identity(existing: &[NotificationRecord], candidate: &NotificationRecord) -> bool {
    existing.iter().any(|r| r.identity() == candidate.identity())
}
