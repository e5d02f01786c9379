use std::sync::Arc;

use serde_json::Value;

use crate::domain::{HistoryEntry, LastEmailSnapshot};

use super::{KeyValueStore, StorageError};

pub const LAST_EMAIL_KEY: &str = "pg_last_email";
pub const HISTORY_KEY: &str = "pg_history";
pub const HISTORY_LIMIT: usize = 25;

/// Typed view over the two keys the scan form persists.
#[derive(Clone)]
pub struct LocalHistory {
    store: Arc<dyn KeyValueStore>,
}

impl LocalHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save_last_email(&self, snapshot: &LastEmailSnapshot) -> Result<(), StorageError> {
        self.store
            .set(LAST_EMAIL_KEY, &serde_json::to_string(snapshot)?)
    }

    pub fn last_email(&self) -> Result<Option<LastEmailSnapshot>, StorageError> {
        match self.store.get(LAST_EMAIL_KEY)? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    /// Newest first. Stored items that are not scan entries are skipped.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        Ok(self
            .raw_entries()?
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<HistoryEntry>(item) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(target: "storage", error = %err, "skipping unreadable history item");
                    None
                }
            })
            .collect())
    }

    /// Prepends `entry` and drops whatever falls past [`HISTORY_LIMIT`].
    /// Items already stored are carried over untouched, whatever their shape.
    pub fn record(&self, entry: HistoryEntry) -> Result<(), StorageError> {
        let mut items = self.raw_entries()?;
        items.insert(0, serde_json::to_value(entry)?);
        items.truncate(HISTORY_LIMIT);
        self.store.set(HISTORY_KEY, &serde_json::to_string(&items)?)
    }

    fn raw_entries(&self) -> Result<Vec<Value>, StorageError> {
        match self.store.get(HISTORY_KEY)? {
            Some(raw) if !raw.is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }
}
