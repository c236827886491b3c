//! String key-value storage for user preferences.
//!
//! The site keeps favorites and the hemisphere choice in browser
//! `localStorage`. [`KeyValueStore`] is that interface: string keys, string
//! values. [`JsonFileStore`] persists it as one JSON file so the CLI can act
//! on the same state; [`MemoryStore`] backs tests.
//!
//! The state file is versioned like a cache manifest: a missing, corrupt or
//! older-version file loads as an empty store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Version of the state file format.
const STATE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// Store persisted to a JSON file, written through on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. Unreadable or outdated files start empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<StateFile>(&content) {
                Ok(state) if state.version == STATE_VERSION => state.entries,
                Ok(state) => {
                    log::warn!(
                        "state file {} has version {}, starting empty",
                        path.display(),
                        state.version
                    );
                    BTreeMap::new()
                }
                Err(e) => {
                    log::warn!("state file {} is corrupt ({e}), starting empty", path.display());
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let state = StateFile {
            version: STATE_VERSION,
            entries: self.entries.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&state)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_basics() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
    }

    #[test]
    fn file_store_persists_across_opens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state/prefs.json");
        {
            let mut store = JsonFileStore::open(&path);
            store.set("calendar-hemisphere", "southern").unwrap();
        }
        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("calendar-hemisphere").as_deref(), Some("southern"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::open(&path);
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn other_version_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        std::fs::write(&path, r#"{"version": 99, "entries": {"a": "b"}}"#).unwrap();
        assert!(JsonFileStore::open(&path).get("a").is_none());
    }

    #[test]
    fn remove_missing_key_does_not_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        let mut store = JsonFileStore::open(&path);
        store.remove("nothing").unwrap();
        assert!(!path.exists());
    }
}
