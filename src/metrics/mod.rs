pub mod commands;
pub mod pricing;
mod types;

pub use types::{
    CompetitorComparison, CompetitorMetrics, InventoryVehicle, MarketOverview, MonthlyPoint,
    PricingReason, PricingSuggestion, ShareEntry, TrendingVehicle,
};

use serde::{Deserialize, Serialize};

use crate::rng::{round_1dp, SeededRng};

/// Fiscal months, April first.
const MONTH_LABELS: [&str; 12] = [
    "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月", "1月", "2月", "3月",
];

const COMPETITORS: &[(&str, &str)] = &[
    ("カープラザ中央", "中央区"),
    ("オートネクスト湾岸", "江東区"),
    ("マイカーステーション北", "北区"),
    ("ドライブワン南", "大田区"),
    ("ユーズドガレージ西", "杉並区"),
];

/// Fixed ranking order; only the figures are seeded.
const TRENDING_MODELS: &[(&str, &str)] = &[
    ("トヨタ プリウス", "ハイブリッド"),
    ("ホンダ N-BOX", "軽自動車"),
    ("トヨタ アクア", "コンパクト"),
    ("日産 ノート", "コンパクト"),
    ("トヨタ アルファード", "ミニバン"),
    ("スズキ ジムニー", "SUV"),
    ("マツダ CX-5", "SUV"),
    ("ホンダ フィット", "コンパクト"),
];

pub const OWN_DEALER_NAME: &str = "自社";

impl MarketOverview {
    pub fn generate(seed: i64) -> Self {
        let mut r = SeededRng::new(seed);
        Self {
            revenue: r.range_u64(80_000_000, 50_000_000),
            sales_volume: r.range_u64(20, 300),
            avg_inventory: r.range_u64(80, 150),
            turnover_rate: r.range_f64_1dp(2.0, 4.0),
            inventory_days: r.range_u64(25, 60),
            change: r.range_f64_1dp(-10.0, 30.0),
        }
    }
}

/// One point per fiscal month; month i draws from a fresh generator at `seed + i`.
pub fn monthly_trend(seed: i64, months: usize) -> Vec<MonthlyPoint> {
    (0..months)
        .map(|i| {
            let mut r = SeededRng::new(seed.wrapping_add(i as i64));
            MonthlyPoint {
                month: MONTH_LABELS[i % MONTH_LABELS.len()].to_string(),
                revenue: r.range_u64(60_000_000, 40_000_000),
                sales_volume: r.range_u64(60, 200),
                avg_inventory: r.range_u64(90, 100),
                turnover_rate: r.range_f64_1dp(2.5, 3.0),
            }
        })
        .collect()
}

pub fn competitor_table(seed: i64) -> Vec<CompetitorMetrics> {
    COMPETITORS
        .iter()
        .enumerate()
        .map(|(i, &(name, area))| {
            let mut r = SeededRng::new(seed.wrapping_add(i as i64));
            CompetitorMetrics {
                name: name.to_string(),
                area: area.to_string(),
                avg_price: r.range_u64(1_200_000, 1_500_000),
                inventory_count: r.range_u64(40, 200),
                avg_days_listed: r.range_u64(20, 50),
                monthly_sales: r.range_u64(15, 120),
                rating: r.range_f64_1dp(3.5, 1.5),
            }
        })
        .collect()
}

/// Share of combined monthly sales, own dealer first, then competitors in table order.
pub fn market_share(own_sales: u64, competitors: &[CompetitorMetrics]) -> Vec<ShareEntry> {
    let total: u64 = own_sales + competitors.iter().map(|c| c.monthly_sales).sum::<u64>();
    let share = |sales: u64| {
        if total == 0 {
            0.0
        } else {
            round_1dp(sales as f64 / total as f64 * 100.0)
        }
    };

    std::iter::once((OWN_DEALER_NAME.to_string(), own_sales))
        .chain(competitors.iter().map(|c| (c.name.clone(), c.monthly_sales)))
        .map(|(name, monthly_sales)| ShareEntry {
            name,
            monthly_sales,
            share_percent: share(monthly_sales),
        })
        .collect()
}

pub fn trending_vehicles(seed: i64) -> Vec<TrendingVehicle> {
    TRENDING_MODELS
        .iter()
        .enumerate()
        .map(|(i, &(model, body_type))| {
            let mut r = SeededRng::new(seed.wrapping_add(i as i64));
            TrendingVehicle {
                rank: i as u32 + 1,
                model: model.to_string(),
                body_type: body_type.to_string(),
                avg_price: r.range_u64(900_000, 2_000_000),
                growth_rate: r.range_f64_1dp(5.0, 40.0),
                inquiries: r.range_u64(50, 400),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetSeeds {
    pub overview: i64,
    pub trend: i64,
    pub competitors: i64,
    pub trending: i64,
    pub pricing: i64,
}

impl Default for DatasetSeeds {
    fn default() -> Self {
        Self {
            overview: 777,
            trend: 777,
            competitors: 42,
            trending: 2024,
            pricing: 99,
        }
    }
}

/// Every mock table the dashboard shows, generated once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub overview: MarketOverview,
    pub trend: Vec<MonthlyPoint>,
    pub competitors: Vec<CompetitorMetrics>,
    pub trending: Vec<TrendingVehicle>,
    pub inventory: Vec<InventoryVehicle>,
    pub pricing: Vec<PricingSuggestion>,
}

impl Dataset {
    pub fn generate(seeds: &DatasetSeeds) -> Self {
        let inventory = pricing::sample_inventory();
        let suggestions = pricing::suggest_all(&inventory, seeds.pricing);
        Self {
            overview: MarketOverview::generate(seeds.overview),
            trend: monthly_trend(seeds.trend, MONTH_LABELS.len()),
            competitors: competitor_table(seeds.competitors),
            trending: trending_vehicles(seeds.trending),
            inventory,
            pricing: suggestions,
        }
    }

    pub fn comparison(&self) -> CompetitorComparison {
        CompetitorComparison {
            competitors: self.competitors.clone(),
            market_share: market_share(self.overview.sales_volume, &self.competitors),
        }
    }
}
