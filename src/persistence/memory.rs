//! In-memory storage used when persistence is disabled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{RecordStorage, StorageProvider};
use crate::domain::NotificationRecord;
use crate::error::NotifierError;

/// Keeps the last saved list in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<Vec<NotificationRecord>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<NotificationRecord>, NotifierError> {
        self.records
            .lock()
            .map(|records| records.clone())
            .map_err(|_| NotifierError::Persistence("memory storage poisoned".to_string()))
    }

    fn save(&self, records: &[NotificationRecord]) -> Result<(), NotifierError> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| NotifierError::Persistence("memory storage poisoned".to_string()))?;
        *stored = records.to_vec();
        Ok(())
    }
}

/// One [`MemoryStorage`] per session key, kept for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    sessions: Mutex<HashMap<String, Arc<MemoryStorage>>>,
}

impl MemoryProvider {
    /// Creates a provider with no sessions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for MemoryProvider {
    fn open(&self, session_key: &str) -> Arc<dyn RecordStorage> {
        let Ok(mut sessions) = self.sessions.lock() else {
            tracing::warn!(session_key, "memory provider poisoned, using a fresh storage");
            return Arc::new(MemoryStorage::new());
        };
        let storage = sessions
            .entry(session_key.to_string())
            .or_insert_with(|| Arc::new(MemoryStorage::new()));
        Arc::clone(storage) as Arc<dyn RecordStorage>
    }
}
