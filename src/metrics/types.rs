use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    /// Monthly revenue in yen.
    pub revenue: u64,
    pub sales_volume: u64,
    pub avg_inventory: u64,
    /// Annualised inventory turns.
    pub turnover_rate: f64,
    pub inventory_days: u64,
    /// Percent change against the previous period.
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub revenue: u64,
    pub sales_volume: u64,
    pub avg_inventory: u64,
    pub turnover_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorMetrics {
    pub name: String,
    pub area: String,
    pub avg_price: u64,
    pub inventory_count: u64,
    pub avg_days_listed: u64,
    pub monthly_sales: u64,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEntry {
    pub name: String,
    pub monthly_sales: u64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorComparison {
    pub competitors: Vec<CompetitorMetrics>,
    pub market_share: Vec<ShareEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingVehicle {
    pub rank: u32,
    pub model: String,
    pub body_type: String,
    pub avg_price: u64,
    /// Month-over-month growth in inquiries, percent.
    pub growth_rate: f64,
    pub inquiries: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryVehicle {
    pub id: String,
    pub model: String,
    pub year: u32,
    pub mileage_km: u64,
    pub purchase_price: u64,
    pub list_price: u64,
    pub days_on_lot: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PricingReason {
    AtMarket,
    AboveMarket,
    BelowMarket,
    Aging,
    MarginFloor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSuggestion {
    pub vehicle_id: String,
    pub model: String,
    pub current_price: u64,
    pub market_avg: u64,
    pub suggested_price: u64,
    /// Signed difference between the suggestion and the current price.
    pub adjustment: i64,
    pub reasons: Vec<PricingReason>,
}
