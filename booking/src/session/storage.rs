//! Key-value persistence for the session.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Key of the bearer token
pub const TOKEN_KEY: &str = "cgv_token";

/// Key of the cached profile (JSON)
pub const USER_KEY: &str = "cgv_user";

/// Storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("session storage I/O failed at {path}: {message}")]
    Io {
        /// Backing file
        path: PathBuf,
        /// OS error
        message: String,
    },

    /// The backing file is not a JSON object of strings
    #[error("session storage at {path} is corrupt: {message}")]
    Corrupt {
        /// Backing file
        path: PathBuf,
        /// Parser error
        message: String,
    },
}

/// Synchronous string store, in the manner of browser local storage.
pub trait TokenStorage: Send + Sync {
    /// Value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage; forgotten on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values().remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object in a file.
///
/// The file is re-read on every access so separate processes see each
/// other's writes; a missing file reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Storage at `path`; the file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, error: &io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            message: error.to_string(),
        }
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(&e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(&e))?;
        }
        let raw = serde_json::to_string_pretty(values).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, raw).map_err(|e| self.io_error(&e))
    }

    /// Read-modify-write under the lock.
    ///
    /// A corrupt file holds nothing worth keeping, so writes replace it with
    /// a fresh map instead of failing forever.
    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = match self.read() {
            Ok(values) => values,
            Err(StorageError::Corrupt { message, .. }) => {
                tracing::warn!(path = %self.path.display(), %message, "Replacing corrupt session storage");
                BTreeMap::new()
            },
            Err(e) => return Err(e),
        };
        f(&mut values);
        self.write(&values)
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cineplex-storage-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

        storage.set(TOKEN_KEY, "tok").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));

        storage.remove(TOKEN_KEY).unwrap();
        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn file_storage_survives_reopening() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);

        FileStorage::new(&path).set(TOKEN_KEY, "tok-9").unwrap();
        FileStorage::new(&path).set(USER_KEY, "{}").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-9"));
        assert_eq!(reopened.get(USER_KEY).unwrap().as_deref(), Some("{}"));

        reopened.remove(TOKEN_KEY).unwrap();
        assert_eq!(FileStorage::new(&path).get(TOKEN_KEY).unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let storage = FileStorage::new(temp_path("missing"));
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_reported_then_replaced_on_write() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2").unwrap();

        let storage = FileStorage::new(&path);
        let error = storage.get(TOKEN_KEY).unwrap_err();
        assert!(matches!(error, StorageError::Corrupt { .. }));

        storage.remove(USER_KEY).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");

        storage.set(TOKEN_KEY, "tok-2").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-2"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
