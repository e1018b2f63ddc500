//! Key-value storage backends
//!
//! The history store persists a single blob under a fixed key. [`BlobStore`]
//! is the seam: [`SledBlobStore`] keeps data on disk in an embedded `sled`
//! database, [`MemoryBlobStore`] keeps it in process for tests and dry runs.

use crate::error::{Result, ReelscriptError};
use anyhow::Context;
use directories::ProjectDirs;
use sled::Db;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod types;
pub use types::{input_preview, HistoryItem};

/// Minimal byte-oriented key-value store
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Default location of the history database
///
/// `<data_dir>/history.sled` under the platform's application data directory.
pub fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "reelscript", "reelscript")
        .ok_or_else(|| ReelscriptError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().join("history.sled"))
}

/// On-disk store backed by `sled`
pub struct SledBlobStore {
    db: Db,
    path: PathBuf,
}

impl SledBlobStore {
    /// Open or create a database at `path`
    ///
    /// # Errors
    ///
    /// Returns `ReelscriptError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use reelscript::storage::{BlobStore, SledBlobStore};
    ///
    /// # fn main() -> reelscript::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledBlobStore::open(dir.path().join("history.sled"))?;
    /// store.put("k", b"v")?;
    /// assert_eq!(store.get("k")?, Some(b"v".to_vec()));
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for database")
                    .map_err(|e| ReelscriptError::Storage(e.to_string()))?;
            }
        }

        let db = sled::open(&path)
            .map_err(|e| ReelscriptError::Storage(format!("Failed to open database: {}", e)))?;

        tracing::debug!("Opened history database at {}", path.display());
        Ok(Self { db, path })
    }

    /// Open the database at `path`, or at [`default_db_path`] when `None`
    pub fn open_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::open(path),
            None => Self::open(default_db_path()?),
        }
    }

    /// Location of the database on disk
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlobStore for SledBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| ReelscriptError::Storage(format!("Get failed: {}", e)))?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value)
            .map_err(|e| ReelscriptError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ReelscriptError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| ReelscriptError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ReelscriptError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| ReelscriptError::Storage("Memory store lock poisoned".to_string()).into())
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
