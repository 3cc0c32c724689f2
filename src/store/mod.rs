//! Keyed JSON persistence shared by chat history, settings and KPI sheets.
//!
//! Call sites only see [`KeyedStore`]; the backend (single JSON file, SQLite,
//! or memory) is picked once in [`crate::AppState`]. Reads never fail loudly:
//! an absent or unreadable value degrades to the type's default.

mod json_file;
mod memory;

pub mod keys;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::log_warn;

const ENABLE_LOGS: bool = true;

/// Last write wins; there are no transactions across keys.
pub trait KeyedStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Typed read. `None` when the key is absent, unreadable, or has the wrong shape.
pub fn load<T: DeserializeOwned>(store: &dyn KeyedStore, key: &str) -> Option<T> {
    let value = match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(err) => {
            log_warn!("Failed to read '{key}', treating as empty: {err:#}");
            return None;
        }
    };

    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log_warn!("Stored value for '{key}' has an unexpected shape, ignoring it: {err}");
            None
        }
    }
}

pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyedStore, key: &str) -> T {
    load(store, key).unwrap_or_default()
}

pub fn save<T: Serialize + ?Sized>(store: &dyn KeyedStore, key: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value)
        .with_context(|| format!("failed to serialize value for '{key}'"))?;
    store.set(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Entry {
        name: String,
    }

    #[test]
    fn absent_key_defaults() {
        let store = MemoryStore::new();
        let entries: Vec<Entry> = load_or_default(&store, "missing");
        assert!(entries.is_empty());
    }

    #[test]
    fn wrong_shape_defaults() {
        let store = MemoryStore::new();
        store.set("entries", json!({"not": "a list"})).unwrap();
        let entries: Vec<Entry> = load_or_default(&store, "entries");
        assert!(entries.is_empty());
    }

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        let entries = vec![Entry { name: "a".into() }, Entry { name: "b".into() }];
        save(&store, "entries", &entries).unwrap();
        let loaded: Vec<Entry> = load_or_default(&store, "entries");
        assert_eq!(loaded, entries);
    }
}
