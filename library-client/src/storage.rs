//! Persistent key/value storage for the bearer credential
//!
//! The session keeps exactly one entry here: the raw credential string. It is
//! written on every successful login/registration, removed on logout or when
//! the credential turns out to be invalid, and read once when the session
//! store is created.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StorageError;

/// String key/value store (browser-storage semantics)
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// JSON file store: `{ "key": "value", ... }`
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: RwLock<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.read();
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read storage: {}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.write();
        // a corrupt file is replaced rather than blocking every write
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.write();
        let mut entries = self.read_entries().unwrap_or_default();
        if entries.remove(key).is_some() || self.path.exists() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Credential slot inside a key/value store
#[derive(Clone)]
pub struct CredentialStorage {
    backend: Arc<dyn KeyValueStorage>,
    key: String,
}

impl std::fmt::Debug for CredentialStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStorage")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CredentialStorage {
    pub fn new(backend: impl KeyValueStorage + 'static, key: &str) -> Self {
        Self::from_shared(Arc::new(backend), key)
    }

    /// Use a backend that is also shared with other parts of the application
    pub fn from_shared(backend: Arc<dyn KeyValueStorage>, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
        }
    }

    /// In-memory credential slot under the default key
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new(), crate::config::DEFAULT_TOKEN_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored credential; empty strings count as absent
    pub fn load(&self) -> Option<String> {
        self.backend.get(&self.key).filter(|t| !t.is_empty())
    }

    pub fn save(&self, token: &str) -> Result<(), StorageError> {
        self.backend.set(&self.key, token)
    }

    pub fn delete(&self) -> Result<(), StorageError> {
        self.backend.remove(&self.key)
    }

    pub fn exists(&self) -> bool {
        self.load().is_some()
    }
}
