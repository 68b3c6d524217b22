//! JSON file storage, one file per session key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use std::sync::Arc;

use super::{RecordStorage, StorageProvider};
use crate::domain::NotificationRecord;
use crate::error::NotifierError;

/// Stores the notification list as a JSON array in
/// `{dir}/notifications-{session_key}.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage backed by an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage for `session_key` inside `dir`.
    ///
    /// Characters other than ASCII alphanumerics, `-` and `_` are replaced
    /// with `_` so the key cannot escape `dir`.
    #[must_use]
    pub fn for_session(dir: impl AsRef<Path>, session_key: &str) -> Self {
        let key: String = session_key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self::new(dir.as_ref().join(format!("notifications-{key}.json")))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Hands out one [`JsonFileStorage`] per session key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    /// Provider rooted at `dir`; the directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl StorageProvider for JsonFileProvider {
    fn open(&self, session_key: &str) -> Arc<dyn RecordStorage> {
        let storage = JsonFileStorage::for_session(&self.dir, session_key);
        tracing::debug!(path = %storage.path().display(), "opened notification file");
        Arc::new(storage)
    }
}

impl RecordStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<NotificationRecord>, NotifierError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(NotifierError::Persistence(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            NotifierError::Persistence(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    fn save(&self, records: &[NotificationRecord]) -> Result<(), NotifierError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                NotifierError::Persistence(format!(
                    "failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| {
            NotifierError::Persistence(format!("failed to write {}: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            NotifierError::Persistence(format!(
                "failed to move {} into place: {e}",
                self.path.display()
            ))
        })
    }
}
