//! JSON file backend
//!
//! The whole store is one JSON document. Every mutation rewrites it through a
//! sibling temp file followed by a rename, so a crash never leaves a torn file.

use crate::core::error::Result;
use crate::core::types::{NewReminder, Reminder, ReminderId};
use crate::store::{MemoryStore, ReminderStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// On-disk layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    last_id: i64,
    reminders: Vec<Reminder>,
}

/// Reminder store persisted to a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let file: StoreFile = serde_json::from_str(&content)?;
            MemoryStore::from_parts(file.reminders, file.last_id)
        } else {
            MemoryStore::new()
        };

        tracing::debug!(
            "Opened reminder store {:?} ({} records)",
            path,
            inner.records().len()
        );
        Ok(Self { path, inner })
    }

    /// Write `snapshot` to disk; the caller adopts it only on success
    fn save(&self, snapshot: &MemoryStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = StoreFile {
            last_id: snapshot.last_id(),
            reminders: snapshot.records().to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ReminderStore for JsonFileStore {
    fn insert(&mut self, reminder: NewReminder) -> Result<ReminderId> {
        let mut next = self.inner.clone();
        let id = next.insert(reminder)?;
        self.save(&next)?;
        self.inner = next;
        Ok(id)
    }

    fn find_by_title(&self, pattern: &str) -> Result<Option<Reminder>> {
        self.inner.find_by_title(pattern)
    }

    fn all(&self) -> Result<Vec<Reminder>> {
        self.inner.all()
    }

    fn delete(&mut self, id: ReminderId) -> Result<bool> {
        let mut next = self.inner.clone();
        if !next.delete(id)? {
            return Ok(false);
        }
        self.save(&next)?;
        self.inner = next;
        Ok(true)
    }
}
