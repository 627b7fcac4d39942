//! Durable client-side state: the last searched city.
//!
//! The store is a flat JSON object of string keys to string values, so other
//! front-end preferences can share the file without a format change.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Key under which the last searched city is stored.
pub const LAST_CITY_KEY: &str = "airsight:lastCity";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {path} is not a JSON object of strings: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persists the last successfully searched city.
pub trait LastCityStore {
    /// Overwrite the stored city.
    fn save(&self, city: &str) -> Result<(), StoreError>;

    /// Read the stored city, if any.
    fn load(&self) -> Result<Option<String>, StoreError>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        // Serializing a map of strings cannot fail.
        let json = serde_json::to_string_pretty(entries).unwrap_or_else(|_| "{}".to_string());
        // Write then rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl LastCityStore for FileStore {
    fn save(&self, city: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking the save.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(LAST_CITY_KEY.to_string(), city.to_string());
        self.write_all(&entries)
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(LAST_CITY_KEY))
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps the city for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    city: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(city: &str) -> Self {
        Self {
            city: Mutex::new(Some(city.to_string())),
        }
    }
}

impl LastCityStore for MemoryStore {
    fn save(&self, city: &str) -> Result<(), StoreError> {
        *self.city.lock().unwrap_or_else(|e| e.into_inner()) = Some(city.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.city.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }
}
