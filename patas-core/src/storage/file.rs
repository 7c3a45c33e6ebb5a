//! File-backed implementation of [`KeyValueStore`].
//!
//! The namespace is a single JSON object at `<root>/<namespace>.json`. Every
//! batch rewrites the whole file through a temporary sibling followed by a
//! rename, so readers see either the old or the new contents.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::{StorageError, StorageResult};
use super::traits::{KeyValueEntry, KeyValueStore};

type Entries = BTreeMap<String, String>;

/// Key-value namespace persisted as a JSON file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Opens (or lazily creates) the namespace `namespace` under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be created.
    pub fn open(root: impl AsRef<Path>, namespace: &str) -> StorageResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|err| map_io_err(&err))?;
        Ok(Self {
            path: root.join(format!("{namespace}.json")),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<Entries> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| StorageError::Serialization(err.to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(map_io_err(&err)),
        }
    }

    fn write_entries(&self, entries: &Entries) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp).map_err(|err| map_io_err(&err))?;
            file.write_all(&bytes).map_err(|err| map_io_err(&err))?;
            file.sync_all().map_err(|err| map_io_err(&err))?;
        }
        fs::rename(&tmp, &self.path).map_err(|err| map_io_err(&err))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: String) -> StorageResult<Option<String>> {
        Ok(self.read_entries()?.remove(&key))
    }

    fn apply(&self, batch: Vec<KeyValueEntry>) -> StorageResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::KeyValueStore("lock poisoned".to_string()))?;
        let mut entries = self.read_entries()?;
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
        self.write_entries(&entries)
    }

    fn clear(&self) -> StorageResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::KeyValueStore("lock poisoned".to_string()))?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(map_io_err(&err)),
        }
    }
}

fn map_io_err(err: &std::io::Error) -> StorageError {
    StorageError::Io(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path(), "prefs").unwrap();
        store
            .apply(vec![
                KeyValueEntry::put("a", "1"),
                KeyValueEntry::put("b", "2"),
            ])
            .unwrap();
        drop(store);

        let reopened = FileKeyValueStore::open(dir.path(), "prefs").unwrap();
        assert_eq!(reopened.get("a".to_string()).unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b".to_string()).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_remove_entry_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path(), "prefs").unwrap();
        store.apply(vec![KeyValueEntry::put("a", "1")]).unwrap();
        store.apply(vec![KeyValueEntry::remove("a")]).unwrap();
        assert_eq!(store.get("a".to_string()).unwrap(), None);

        store.apply(vec![KeyValueEntry::put("b", "2")]).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupted_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path(), "prefs").unwrap();
        fs::write(store.path(), b"not json").unwrap();

        let err = store.get("a".to_string()).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
