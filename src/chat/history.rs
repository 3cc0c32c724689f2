use std::sync::Arc;

use anyhow::Result;

use super::models::ChatHistoryEntry;
use crate::store::{self, KeyedStore};

/// One advisor's saved conversations, stored as a single list under `key`.
#[derive(Clone)]
pub struct ChatHistoryStore {
    store: Arc<dyn KeyedStore>,
    key: String,
}

impl ChatHistoryStore {
    pub fn new(store: Arc<dyn KeyedStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Most recently updated first.
    pub fn list(&self) -> Vec<ChatHistoryEntry> {
        let mut entries: Vec<ChatHistoryEntry> =
            store::load_or_default(self.store.as_ref(), &self.key);
        sort_recent_first(&mut entries);
        entries
    }

    pub fn get(&self, id: &str) -> Option<ChatHistoryEntry> {
        self.list().into_iter().find(|entry| entry.id == id)
    }

    /// Inserts or replaces by id.
    pub fn upsert(&self, entry: ChatHistoryEntry) -> Result<()> {
        let mut entries = self.list();
        match entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        sort_recent_first(&mut entries);
        self.save(&entries)
    }

    /// Returns whether an entry was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)
    }

    pub fn save(&self, entries: &[ChatHistoryEntry]) -> Result<()> {
        store::save(self.store.as_ref(), &self.key, entries)
    }
}

fn sort_recent_first(entries: &mut [ChatHistoryEntry]) {
    entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
