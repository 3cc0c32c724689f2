use crate::AppState;

use super::{KpiMetric, KpiSheet, KpiSummary};

pub fn get_kpi_sheet(state: &AppState, fiscal_year: i32) -> KpiSheet {
    state.kpi.sheet(fiscal_year)
}

pub fn get_kpi_summary(state: &AppState, fiscal_year: i32) -> Vec<KpiSummary> {
    state.kpi.summaries(fiscal_year)
}

pub fn set_kpi_target(
    state: &AppState,
    fiscal_year: i32,
    metric: KpiMetric,
    month: u32,
    value: f64,
) -> Result<KpiSheet, String> {
    state
        .kpi
        .set_target(fiscal_year, metric, month, value)
        .map_err(|e| e.to_string())
}

pub fn set_kpi_actual(
    state: &AppState,
    fiscal_year: i32,
    metric: KpiMetric,
    month: u32,
    value: f64,
) -> Result<KpiSheet, String> {
    state
        .kpi
        .set_actual(fiscal_year, metric, month, value)
        .map_err(|e| e.to_string())
}
