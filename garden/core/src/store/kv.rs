//! Key-Value Substrate
//!
//! The entry store only needs string values under a handful of keys. The
//! file-backed store keeps one `<key>.json` file per key in the data
//! directory; the memory store backs tests and headless runs.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of the durable key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading a key failed
    #[error("failed to read {key}: {source}")]
    Read {
        /// Key being read
        key: String,
        /// Underlying IO error
        source: io::Error,
    },

    /// Writing a key failed
    #[error("failed to write {key}: {source}")]
    Write {
        /// Key being written
        key: String,
        /// Underlying IO error
        source: io::Error,
    },
}

/// Durable string storage keyed by name
pub trait KeyValueStore: Send {
    /// Value stored under `key`, `None` if the key was never written
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the substrate cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite `key` with `value`, durably, before returning
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the value could not be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`; deleting a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the key exists but cannot be removed.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// One JSON file per key inside a directory
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Stage beside the target, then rename over it
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value).map_err(write_err)?;
        fs::rename(&staging, &target).map_err(write_err)?;

        tracing::trace!(key, bytes = value.len(), "Persisted key");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-process store; optionally refuses writes to exercise failure paths
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `values`
    #[must_use]
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            read_only: false,
        }
    }

    /// Make every subsequent write fail with a permission error
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Raw value under `key`, bypassing the trait
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn refuse(&self, key: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Write {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "store is read-only"),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.refuse(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.refuse(key)?;
        self.values.remove(key);
        Ok(())
    }
}

/// Memory store that refuses writes to one key while switched on
#[cfg(test)]
pub(crate) struct FlakyKeyStore {
    pub(crate) inner: MemoryStore,
    pub(crate) key: &'static str,
    pub(crate) failing: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(test)]
impl FlakyKeyStore {
    pub(crate) fn new(key: &'static str) -> (Self, std::sync::Arc<std::sync::atomic::AtomicBool>) {
        let failing = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let store = Self {
            inner: MemoryStore::new(),
            key,
            failing: std::sync::Arc::clone(&failing),
        };
        (store, failing)
    }
}

#[cfg(test)]
impl KeyValueStore for FlakyKeyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if key == self.key && self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Write {
                key: key.to_string(),
                source: io::Error::other("disk full"),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}
