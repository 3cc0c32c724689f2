pub mod commands;
mod models;

pub use models::{validation, CompetitorEntry, CustomChatConfig, CustomChatInput, InventoryUrl};

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    log_info,
    store::{self, keys, KeyedStore},
};

const ENABLE_LOGS: bool = true;

/// Registered URLs, competitors and custom advisors, each list under its own key.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn KeyedStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn KeyedStore>) -> Self {
        Self { store }
    }

    pub fn inventory_urls(&self) -> Vec<InventoryUrl> {
        store::load_or_default(self.store.as_ref(), keys::INVENTORY_URLS)
    }

    pub fn add_inventory_url(&self, url: &str, label: &str) -> Result<InventoryUrl> {
        let url = validation::validate_url(url)?;
        let mut urls = self.inventory_urls();
        if urls.iter().any(|existing| existing.url == url) {
            bail!("URL is already registered: {url}");
        }

        let entry = InventoryUrl {
            id: Uuid::new_v4().to_string(),
            url,
            label: label.trim().to_string(),
            created_at: Utc::now(),
        };
        urls.push(entry.clone());
        store::save(self.store.as_ref(), keys::INVENTORY_URLS, &urls)?;
        log_info!("Registered inventory URL {}", entry.url);
        Ok(entry)
    }

    pub fn remove_inventory_url(&self, id: &str) -> Result<()> {
        let mut urls = self.inventory_urls();
        let before = urls.len();
        urls.retain(|entry| entry.id != id);
        if urls.len() == before {
            bail!("Inventory URL not found: {id}");
        }
        store::save(self.store.as_ref(), keys::INVENTORY_URLS, &urls)
    }

    pub fn competitors(&self) -> Vec<CompetitorEntry> {
        store::load_or_default(self.store.as_ref(), keys::COMPETITORS)
    }

    pub fn add_competitor(&self, name: &str, url: &str) -> Result<CompetitorEntry> {
        let name = validation::validate_name(name)?;
        let url = validation::validate_url(url)?;
        let mut competitors = self.competitors();
        if competitors.iter().any(|existing| existing.url == url) {
            bail!("Competitor URL is already registered: {url}");
        }

        let entry = CompetitorEntry {
            id: Uuid::new_v4().to_string(),
            name,
            url,
            created_at: Utc::now(),
        };
        competitors.push(entry.clone());
        store::save(self.store.as_ref(), keys::COMPETITORS, &competitors)?;
        Ok(entry)
    }

    pub fn remove_competitor(&self, id: &str) -> Result<()> {
        let mut competitors = self.competitors();
        let before = competitors.len();
        competitors.retain(|entry| entry.id != id);
        if competitors.len() == before {
            bail!("Competitor not found: {id}");
        }
        store::save(self.store.as_ref(), keys::COMPETITORS, &competitors)
    }

    pub fn custom_chats(&self) -> Vec<CustomChatConfig> {
        store::load_or_default(self.store.as_ref(), keys::CUSTOM_CHATS)
    }

    pub fn custom_chat(&self, id: &str) -> Result<CustomChatConfig> {
        self.custom_chats()
            .into_iter()
            .find(|config| config.id == id)
            .ok_or_else(|| anyhow!("Custom chat not found: {id}"))
    }

    pub fn create_custom_chat(&self, input: CustomChatInput) -> Result<CustomChatConfig> {
        let now = Utc::now();
        let config = CustomChatConfig {
            id: Uuid::new_v4().to_string(),
            name: validation::validate_name(&input.name)?,
            description: input.description.trim().to_string(),
            instructions: validation::validate_instructions(&input.instructions)?,
            created_at: now,
            updated_at: now,
        };

        let mut configs = self.custom_chats();
        configs.push(config.clone());
        store::save(self.store.as_ref(), keys::CUSTOM_CHATS, &configs)?;
        log_info!("Created custom chat '{}' ({})", config.name, config.id);
        Ok(config)
    }

    pub fn update_custom_chat(&self, id: &str, input: CustomChatInput) -> Result<CustomChatConfig> {
        let name = validation::validate_name(&input.name)?;
        let instructions = validation::validate_instructions(&input.instructions)?;

        let mut configs = self.custom_chats();
        let config = configs
            .iter_mut()
            .find(|config| config.id == id)
            .ok_or_else(|| anyhow!("Custom chat not found: {id}"))?;
        config.name = name;
        config.description = input.description.trim().to_string();
        config.instructions = instructions;
        config.updated_at = Utc::now();
        let updated = config.clone();

        store::save(self.store.as_ref(), keys::CUSTOM_CHATS, &configs)?;
        Ok(updated)
    }

    /// Deletes the config together with its chat history.
    pub fn delete_custom_chat(&self, id: &str) -> Result<()> {
        let mut configs = self.custom_chats();
        let before = configs.len();
        configs.retain(|config| config.id != id);
        if configs.len() == before {
            bail!("Custom chat not found: {id}");
        }
        store::save(self.store.as_ref(), keys::CUSTOM_CHATS, &configs)?;
        self.store.remove(&keys::custom_chat_history(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn settings() -> (Settings, Arc<dyn KeyedStore>) {
        let store: Arc<dyn KeyedStore> = Arc::new(MemoryStore::new());
        (Settings::new(Arc::clone(&store)), store)
    }

    #[test]
    fn inventory_urls_add_list_remove() {
        let (settings, _) = settings();
        let first = settings
            .add_inventory_url("https://example.com/stock", "本店")
            .unwrap();
        settings
            .add_inventory_url("https://example.com/outlet", "アウトレット")
            .unwrap();

        let urls = settings.inventory_urls();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].label, "本店");

        settings.remove_inventory_url(&first.id).unwrap();
        assert_eq!(settings.inventory_urls().len(), 1);
        assert!(settings.remove_inventory_url(&first.id).is_err());
    }

    #[test]
    fn duplicate_inventory_url_is_rejected() {
        let (settings, _) = settings();
        settings.add_inventory_url("https://example.com/a", "").unwrap();
        assert!(settings.add_inventory_url("https://example.com/a", "").is_err());
    }

    #[test]
    fn competitors_require_name_and_valid_url() {
        let (settings, _) = settings();
        assert!(settings.add_competitor("", "https://rival.example").is_err());
        assert!(settings.add_competitor("ライバル", "rival").is_err());
        let entry = settings
            .add_competitor("ライバル", "https://rival.example")
            .unwrap();
        assert_eq!(settings.competitors(), vec![entry]);
    }

    #[test]
    fn custom_chat_lifecycle_drops_history() {
        let (settings, store) = settings();
        let config = settings
            .create_custom_chat(CustomChatInput {
                name: "店長アシスタント".into(),
                description: "店長向け".into(),
                instructions: "短く答える".into(),
            })
            .unwrap();

        let updated = settings
            .update_custom_chat(
                &config.id,
                CustomChatInput {
                    name: "店長AI".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "店長AI");
        assert!(updated.updated_at >= config.updated_at);
        assert_eq!(settings.custom_chat(&config.id).unwrap().name, "店長AI");

        let history_key = keys::custom_chat_history(&config.id);
        store.set(&history_key, json!([])).unwrap();
        settings.delete_custom_chat(&config.id).unwrap();
        assert!(settings.custom_chats().is_empty());
        assert_eq!(store.get(&history_key).unwrap(), None);
    }

    #[test]
    fn corrupt_list_reads_as_empty() {
        let (settings, store) = settings();
        store.set(keys::COMPETITORS, json!("garbage")).unwrap();
        assert!(settings.competitors().is_empty());
    }
}
