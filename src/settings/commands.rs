use crate::AppState;

use super::{CompetitorEntry, CustomChatConfig, CustomChatInput, InventoryUrl};

pub fn add_inventory_url(state: &AppState, url: &str, label: &str) -> Result<InventoryUrl, String> {
    state
        .settings
        .add_inventory_url(url, label)
        .map_err(|e| e.to_string())
}

pub fn list_inventory_urls(state: &AppState) -> Vec<InventoryUrl> {
    state.settings.inventory_urls()
}

pub fn remove_inventory_url(state: &AppState, id: &str) -> Result<(), String> {
    state
        .settings
        .remove_inventory_url(id)
        .map_err(|e| e.to_string())
}

pub fn add_competitor(state: &AppState, name: &str, url: &str) -> Result<CompetitorEntry, String> {
    state
        .settings
        .add_competitor(name, url)
        .map_err(|e| e.to_string())
}

pub fn list_competitors(state: &AppState) -> Vec<CompetitorEntry> {
    state.settings.competitors()
}

pub fn remove_competitor(state: &AppState, id: &str) -> Result<(), String> {
    state
        .settings
        .remove_competitor(id)
        .map_err(|e| e.to_string())
}

pub fn create_custom_chat(
    state: &AppState,
    input: CustomChatInput,
) -> Result<CustomChatConfig, String> {
    state
        .settings
        .create_custom_chat(input)
        .map_err(|e| e.to_string())
}

pub fn list_custom_chats(state: &AppState) -> Vec<CustomChatConfig> {
    state.settings.custom_chats()
}

pub fn update_custom_chat(
    state: &AppState,
    id: &str,
    input: CustomChatInput,
) -> Result<CustomChatConfig, String> {
    state
        .settings
        .update_custom_chat(id, input)
        .map_err(|e| e.to_string())
}

pub fn delete_custom_chat(state: &AppState, id: &str) -> Result<(), String> {
    state
        .settings
        .delete_custom_chat(id)
        .map_err(|e| e.to_string())
}
