//! Local key-value storage
//!
//! String keys to string values, single writer, no conflict detection.
//! Two backends:
//! - [`MemoryStorage`]: in-process map
//! - [`FileStorage`]: one file per key under a root directory

use crate::error::StorageError;
use dashmap::DashMap;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Browser-style local storage
pub trait LocalStorage: Send + Sync + Debug {
    /// Read an entry
    ///
    /// # Errors
    /// Backend failures; a missing key is `Ok(None)`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write an entry, replacing any previous value
    ///
    /// # Errors
    /// Backend failures.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove an entry; removing a missing key is not an error
    ///
    /// # Errors
    /// Backend failures.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// All stored keys, sorted
    ///
    /// # Errors
    /// Backend failures.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}

/// Hex characters per path component of a file entry
const SEGMENT_LEN: usize = 200;

/// Suffix of the directories that hold the continuation of a long name
const SHARD_SUFFIX: &str = ".d";

/// File-backed storage
///
/// Each entry is stored under its hex-encoded key, so scenario names may
/// contain any character. Names longer than [`SEGMENT_LEN`] are split into
/// nested `{segment}.d` directories to stay below file-name limits:
///
/// ```text
/// {root}/{hex(key)}                      short keys
/// {root}/{hex[..200]}.d/{hex[200..]}     long keys
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::io_error(&root, e))?;
        Ok(Self { root })
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let encoded = hex::encode(key);
        let mut path = self.root.clone();
        let mut rest = encoded.as_str();
        while rest.len() > SEGMENT_LEN {
            let (segment, tail) = rest.split_at(SEGMENT_LEN);
            path.push(format!("{segment}{SHARD_SUFFIX}"));
            rest = tail;
        }
        path.push(rest);
        path
    }
}

fn collect_keys(dir: &Path, prefix: &str, keys: &mut Vec<String>) -> Result<(), StorageError> {
    let entries = std::fs::read_dir(dir).map_err(|e| StorageError::io_error(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io_error(dir, e))?;
        let path = entry.path();
        // Foreign files in the root are not entries.
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        match name.strip_suffix(SHARD_SUFFIX) {
            Some(segment) if path.is_dir() => {
                collect_keys(&path, &format!("{prefix}{segment}"), keys)?;
            }
            Some(_) => {}
            None => {
                if let Some(key) = hex::decode(format!("{prefix}{name}"))
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
                {
                    keys.push(key);
                }
            }
        }
    }
    Ok(())
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.entry_path(key);
        match std::fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StorageError::InvalidUtf8 {
                    key: key.to_string(),
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io_error(path, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent().filter(|p| *p != self.root.as_path()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io_error(parent, e))?;
        }
        std::fs::write(&path, value).map_err(|e| StorageError::io_error(path, e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(StorageError::io_error(path, e)),
            _ => Ok(()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        collect_keys(&self.root, "", &mut keys)?;
        keys.sort();
        Ok(keys)
    }
}
