use std::{collections::BTreeMap, sync::RwLock};

use anyhow::{anyhow, Result};
use serde_json::Value;

use super::KeyedStore;

/// Process-local store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyedStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let guard = self.data.read().map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut guard = self.data.write().map_err(|_| anyhow!("memory store lock poisoned"))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self.data.write().map_err(|_| anyhow!("memory store lock poisoned"))?;
        guard.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let guard = self.data.read().map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(guard.keys().cloned().collect())
    }
}
