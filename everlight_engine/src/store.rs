//! Durable key-value storage for save records.
//!
//! The persistence layer only needs `read`, `write` and `keys`. [`FileStore`] keeps one JSON
//! file per key in a directory; [`MemoryStore`] keeps records in a map for tests and tools.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

/// Failures of a save store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid save key '{0}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidKey(String),
    #[error("i/o error for save key '{key}'")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// A durable string store keyed by save-slot name.
pub trait SaveStore {
    /// Returns the stored value, or `None` if nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Replace whatever is stored under `key`. Readers never observe a partial value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Every key that currently holds a value, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.records.keys().cloned().collect())
    }
}

/// One `<key>.json` file per record under `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SaveStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!("read save '{key}' from '{}'", path.display());
                Ok(Some(raw))
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        info!("wrote save '{key}' to '{}'", path.display());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    key: String::new(),
                    source,
                });
            },
        };
        let mut keys: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let key = name.strip_suffix(".json")?;
                check_key(key).ok().map(|()| key.to_string())
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}
