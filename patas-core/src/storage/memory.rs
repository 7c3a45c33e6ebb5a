//! In-memory implementation of [`KeyValueStore`].
//!
//! Nothing is persisted; useful for tests, previews and hosts that do not
//! want the session to survive a restart.

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::{StorageError, StorageResult};
use super::traits::{KeyValueEntry, KeyValueStore};

/// In-memory key-value store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::KeyValueStore("lock poisoned".to_string())
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: String) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(&key).cloned())
    }

    fn apply(&self, batch: Vec<KeyValueEntry>) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        for entry in batch {
            match entry.value {
                Some(value) => {
                    entries.insert(entry.key, value);
                }
                None => {
                    entries.remove(&entry.key);
                }
            }
        }
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.entries.write().map_err(|_| poisoned())?.clear();
        Ok(())
    }
}
