//! Fixed store keys, one per feature.

pub const CHAT_HISTORY_SALES: &str = "chat_history_sales";
pub const CHAT_HISTORY_MARKETING: &str = "chat_history_marketing";
const CHAT_HISTORY_CUSTOM_PREFIX: &str = "chat_history_custom_";

pub const INVENTORY_URLS: &str = "settings_inventory_urls";
pub const COMPETITORS: &str = "settings_competitors";
pub const CUSTOM_CHATS: &str = "settings_custom_chats";

const KPI_PREFIX: &str = "kpi_";

pub fn custom_chat_history(config_id: &str) -> String {
    format!("{CHAT_HISTORY_CUSTOM_PREFIX}{config_id}")
}

pub fn kpi(fiscal_year: i32) -> String {
    format!("{KPI_PREFIX}{fiscal_year}")
}
