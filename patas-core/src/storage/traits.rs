//! Platform interfaces for credential storage.

use super::error::StorageResult;

/// A single change inside a [`KeyValueStore::apply`] batch.
///
/// A `value` of `None` removes the key.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct KeyValueEntry {
    /// Key inside the store namespace.
    pub key: String,
    /// New value, or `None` to remove the key.
    pub value: Option<String>,
}

impl KeyValueEntry {
    /// Creates an entry that writes `value` under `key`.
    #[must_use]
    pub fn put(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value.into()),
        }
    }

    /// Creates an entry that removes `key`.
    #[must_use]
    pub fn remove(key: &str) -> Self {
        Self {
            key: key.to_string(),
            value: None,
        }
    }
}

/// App-private string key-value namespace provided by the host platform.
///
/// On Android this maps to `SharedPreferences` opened with `MODE_PRIVATE`;
/// on iOS to a Keychain or `UserDefaults` suite. The namespace is chosen by the
/// host when it creates the store.
#[uniffi::export(with_foreign)]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get(&self, key: String) -> StorageResult<Option<String>>;

    /// Applies every entry of `batch` atomically: either all changes are
    /// persisted or none are.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn apply(&self, batch: Vec<KeyValueEntry>) -> StorageResult<()>;

    /// Removes every key in the namespace atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn clear(&self) -> StorageResult<()>;
}
