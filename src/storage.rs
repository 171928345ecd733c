//! Local key-value store for the cameo registry and the API credential.
//!
//! Each key is one JSON file in the data directory. Reads that fail are logged
//! and treated as "nothing stored"; writes go through a temp file and rename.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cameo::{CameoRegistry, SavedCameo};

pub const CAMEOS_KEY: &str = "savedCameos";
pub const API_KEY_KEY: &str = "geminiApiKey";

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read a key. Missing or unreadable entries yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!(key, "Nothing stored");
            return None;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(key, error = %e, "Failed to read {} from local store", key);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Failed to parse {} from local store", key);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {:?}", self.dir))?;

        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {}", key))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {:?}", self.dir))?;
        tmp.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write {}", key))?;

        let path = self.path_for(key);
        tmp.persist(&path)
            .with_context(|| format!("Failed to save {} to {:?}", key, path))?;
        debug!(key, path = %path.display(), "Stored");
        Ok(())
    }

    /// Saved cameos, or an empty registry when nothing usable is stored.
    pub fn load_cameos(&self) -> CameoRegistry {
        self.get::<Vec<SavedCameo>>(CAMEOS_KEY)
            .map(|entries| entries.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn save_cameos(&self, registry: &CameoRegistry) -> Result<()> {
        self.set(CAMEOS_KEY, registry)
    }

    pub fn load_api_key(&self) -> Option<String> {
        self.get::<String>(API_KEY_KEY)
            .filter(|key| !key.trim().is_empty())
    }

    /// Store the credential. Returns false for a blank key, which is ignored.
    pub fn save_api_key(&self, key: &str) -> Result<bool> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }
        self.set(API_KEY_KEY, &key)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_registry_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.load_cameos().is_empty());
        assert!(store.load_api_key().is_none());
    }

    #[test]
    fn cameos_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("nested"));

        let mut registry = CameoRegistry::new();
        registry.add(SavedCameo::new("@pheem.tha", "Pheem", "ชาย", "25"));
        store.save_cameos(&registry).unwrap();

        assert_eq!(store.load_cameos(), registry);
    }

    #[test]
    fn corrupt_registry_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("savedCameos.json"), "{not json").unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.load_cameos().is_empty());
    }

    #[test]
    fn duplicate_entries_on_disk_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("savedCameos.json"),
            r#"[{"id":"@a","identifier":"@a","name":"A"},{"id":"@a","identifier":"@a","name":"B"}]"#,
        )
        .unwrap();
        let store = LocalStore::new(dir.path());
        let registry = store.load_cameos();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("@a").unwrap().name, "A");
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(!store.save_api_key("  ").unwrap());
        assert!(store.load_api_key().is_none());

        assert!(store.save_api_key(" abc123 ").unwrap());
        assert_eq!(store.load_api_key().as_deref(), Some("abc123"));
    }
}
