//! Persistence layer: durable storage for the notification list.
//!
//! The [`RecordStorage`] trait abstracts over where the serialized
//! `NotificationRecord[]` lives. [`JsonFileStorage`] keeps one JSON file per
//! session key; [`MemoryStorage`] is used when persistence is disabled and in
//! tests. A [`StorageProvider`] hands out the storage for a given session
//! key, so each session reads and writes only its own list.

pub mod json_file;
pub mod memory;

use std::fmt;
use std::sync::Arc;

pub use json_file::{JsonFileProvider, JsonFileStorage};
pub use memory::{MemoryProvider, MemoryStorage};

use crate::domain::NotificationRecord;
use crate::error::NotifierError;

/// Durable home of a session's notification list.
///
/// `save` always receives the complete list and overwrites whatever was
/// stored before.
pub trait RecordStorage: Send + Sync + fmt::Debug {
    /// Loads the stored list. A storage that holds nothing yet returns an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Persistence`] if the stored data cannot be
    /// read or decoded.
    fn load(&self) -> Result<Vec<NotificationRecord>, NotifierError>;

    /// Replaces the stored list with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Persistence`] if the data cannot be written.
    fn save(&self, records: &[NotificationRecord]) -> Result<(), NotifierError>;
}

/// Opens the [`RecordStorage`] belonging to a session key.
pub trait StorageProvider: Send + Sync + fmt::Debug {
    /// Storage for `session_key`. Opening the same key twice yields storage
    /// over the same persisted list.
    fn open(&self, session_key: &str) -> Arc<dyn RecordStorage>;
}
