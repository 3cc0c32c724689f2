use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};

use super::KeyedStore;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// All keys live in one JSON object on disk, cached in memory and rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<Map<String, Value>>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store from {}", path.display()))?;
            match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(map) => map,
                Err(err) => {
                    log_warn!(
                        "Store file {} is corrupt, starting empty: {err}",
                        path.display()
                    );
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        log_info!("JSON store opened at {} ({} keys)", path.display(), data.len());

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes to a sibling temp file and renames it over the old one.
    fn persist(&self, data: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let serialized = serde_json::to_vec_pretty(data)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;

        if let Err(rename_err) = fs::rename(&tmp_path, &self.path) {
            if !self.path.exists() {
                return Err(rename_err).with_context(|| {
                    format!("Failed to move store into {}", self.path.display())
                });
            }
            fs::remove_file(&self.path)?;
            fs::rename(&tmp_path, &self.path)
                .with_context(|| format!("Failed to move store into {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl KeyedStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let guard = self.data.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut guard = self.data.write().map_err(|_| anyhow!("store lock poisoned"))?;
        let mut next = guard.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self.data.write().map_err(|_| anyhow!("store lock poisoned"))?;
        if !guard.contains_key(key) {
            return Ok(());
        }
        let mut next = guard.clone();
        next.remove(key);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let guard = self.data.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(guard.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::new(path.clone()).unwrap();
        store.set("settings_inventory_urls", json!([{"url": "https://example.com"}])).unwrap();
        store.set("kpi_2024", json!({"fiscalYear": 2024})).unwrap();
        drop(store);

        let reopened = JsonFileStore::new(path).unwrap();
        assert_eq!(
            reopened.get("kpi_2024").unwrap(),
            Some(json!({"fiscalYear": 2024}))
        );
        assert_eq!(reopened.keys().unwrap().len(), 2);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(path).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn remove_deletes_key_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::new(path.clone()).unwrap();
        store.set("a", json!(1)).unwrap();
        store.remove("a").unwrap();
        store.remove("never-set").unwrap();

        let reopened = JsonFileStore::new(path).unwrap();
        assert_eq!(reopened.get("a").unwrap(), None);
    }

    #[test]
    fn failed_write_leaves_cache_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json")).unwrap();
        store.set("kept", json!(1)).unwrap();

        // Parent is a regular file, so every write fails.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let broken = JsonFileStore {
            path: blocker.join("store.json"),
            data: RwLock::new(store.data.read().unwrap().clone()),
        };

        assert!(broken.set("k", json!(1)).is_err());
        assert_eq!(broken.get("k").unwrap(), None);

        assert!(broken.remove("kept").is_err());
        assert_eq!(broken.get("kept").unwrap(), Some(json!(1)));
    }
}
