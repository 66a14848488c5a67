//! Local storage
//!
//! Key/value persistence for opaque JSON blobs. Every caller treats storage
//! as best-effort: reads that fail or do not parse come back as "nothing
//! stored", and failed writes are logged and otherwise ignored.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use mockall::automock;
use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem error
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// The key cannot be mapped to a storage location
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Storage is not usable (e.g. a poisoned lock or quota exhaustion)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key/value store.
#[automock]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir)?;

        // Stage then rename: readers never observe a partially written blob.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }
}

/// In-process store, used when no data directory is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|error| StorageError::Unavailable(error.to_string()))?;

        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|error| StorageError::Unavailable(error.to_string()))?;

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Read and decode a JSON blob. Absence, read failure and parse failure all
/// yield `None`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            warn!(key, %error, "failed to read from storage");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(key, %error, "discarding unparsable stored value");
            None
        }
    }
}

/// Encode and store a JSON blob. Returns whether the write succeeded; failures
/// are logged, never raised.
pub fn save_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) -> bool {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(error) => {
            warn!(key, %error, "failed to encode value for storage");
            return false;
        }
    };

    match storage.write(key, &encoded) {
        Ok(()) => {
            debug!(key, bytes = encoded.len(), "persisted");
            true
        }
        Err(error) => {
            warn!(key, %error, "failed to persist; continuing in memory");
            false
        }
    }
}
