//! PendingStore - the single JSON record on disk

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{BroadcastError, BroadcastResult};

/// File-backed store for the one pending record.
///
/// No locking: two processes pointed at the same file can race between
/// `load` and `delete`.
#[derive(Debug, Clone)]
pub struct PendingStore {
    path: PathBuf,
}

impl PendingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    pub fn exists(&self) -> bool { self.path.is_file() }

    /// Read the record as untyped JSON. Shape checks belong to the validator.
    pub fn load(&self) -> BroadcastResult<Value> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BroadcastError::MissingRecord(self.path.display().to_string()));
            }
            Err(e) => return Err(BroadcastError::MalformedRecord(format!("read {}: {}", self.path.display(), e))),
        };
        let value = serde_json::from_str(&contents).map_err(|e| BroadcastError::MalformedRecord(e.to_string()))?;
        debug!(path = %self.path.display(), "Loaded pending transaction");
        Ok(value)
    }

    /// Remove the record. Best effort: failures are logged and dropped.
    pub fn delete(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "Removed pending file"),
            Err(e) => {
                let err = BroadcastError::Cleanup(e.to_string());
                debug!(path = %self.path.display(), error = %err, "Ignoring cleanup failure");
            }
        }
    }
}
