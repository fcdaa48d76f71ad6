//! Key/value persistence for composition documents.
//!
//! A [`Storage`] holds one string value per key. The store reads its key
//! once at startup and rewrites it after every committed action.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised when reading or writing persisted documents.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage key {0:?} is not a valid file name")]
    InvalidKey(String),

    #[error("storage is unavailable")]
    Unavailable,
}

/// String key/value persistence.
pub trait Storage {
    /// Reads the value stored under `key`, or `None` if nothing was stored.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ============================================================================
// FileStorage
// ============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = path.with_extension("json.tmp");
        write_atomic(&tmp, &path, value.as_bytes()).map_err(io_err)
    }
}

/// Writes `bytes` to `tmp` and renames it over `path`.
///
/// On any failure the temporary file is removed, so `path` either holds the
/// new content or whatever it held before.
pub(crate) fn write_atomic(tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let written = fs::File::create(tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(tmp, path)
    });
    if written.is_err() {
        if let Err(err) = fs::remove_file(tmp) {
            if err.kind() != io::ErrorKind::NotFound {
                log::warn!("failed to remove {}: {err}", tmp.display());
            }
        }
    }
    written
}

// ============================================================================
// MemoryStorage
// ============================================================================

/// In-memory storage, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.values.insert(key.into(), value.into());
        storage
    }

    /// Makes every subsequent write fail with [`StorageError::Unavailable`].
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Returns the raw stored value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable);
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
