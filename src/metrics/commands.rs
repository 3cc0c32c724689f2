use crate::AppState;

use super::{CompetitorComparison, MarketOverview, MonthlyPoint, PricingSuggestion, TrendingVehicle};

pub fn get_market_overview(state: &AppState) -> MarketOverview {
    state.dataset.overview.clone()
}

pub fn get_monthly_trend(state: &AppState) -> Vec<MonthlyPoint> {
    state.dataset.trend.clone()
}

pub fn get_competitor_comparison(state: &AppState) -> CompetitorComparison {
    state.dataset.comparison()
}

pub fn get_trending_vehicles(state: &AppState, limit: Option<usize>) -> Vec<TrendingVehicle> {
    let trending = &state.dataset.trending;
    let limit = limit.unwrap_or(trending.len()).min(trending.len());
    trending[..limit].to_vec()
}

pub fn get_pricing_suggestions(state: &AppState) -> Vec<PricingSuggestion> {
    state.dataset.pricing.clone()
}
