use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: usize = 12;
/// Japanese fiscal years start in April.
const FISCAL_YEAR_START_MONTH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiMetric {
    SalesUnits,
    Revenue,
    GrossProfit,
    Inquiries,
}

impl KpiMetric {
    pub const ALL: [KpiMetric; 4] = [
        KpiMetric::SalesUnits,
        KpiMetric::Revenue,
        KpiMetric::GrossProfit,
        KpiMetric::Inquiries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KpiMetric::SalesUnits => "salesUnits",
            KpiMetric::Revenue => "revenue",
            KpiMetric::GrossProfit => "grossProfit",
            KpiMetric::Inquiries => "inquiries",
        }
    }
}

impl FromStr for KpiMetric {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized: String = value
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "salesunits" | "units" => Ok(KpiMetric::SalesUnits),
            "revenue" => Ok(KpiMetric::Revenue),
            "grossprofit" | "profit" => Ok(KpiMetric::GrossProfit),
            "inquiries" => Ok(KpiMetric::Inquiries),
            _ => bail!("unknown KPI metric '{value}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRow {
    pub metric: KpiMetric,
    /// Fiscal order: index 0 is April, index 11 is March.
    pub targets: [f64; MONTHS_PER_YEAR],
    pub actuals: [f64; MONTHS_PER_YEAR],
}

impl KpiRow {
    pub fn empty(metric: KpiMetric) -> Self {
        Self {
            metric,
            targets: [0.0; MONTHS_PER_YEAR],
            actuals: [0.0; MONTHS_PER_YEAR],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSheet {
    pub fiscal_year: i32,
    pub rows: Vec<KpiRow>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub metric: KpiMetric,
    pub target_total: f64,
    pub actual_total: f64,
    /// Percent; `None` when no target has been set.
    pub achievement: Option<f64>,
    pub monthly_achievement: Vec<Option<f64>>,
}

impl KpiSheet {
    pub fn new(fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            rows: KpiMetric::ALL.iter().copied().map(KpiRow::empty).collect(),
            updated_at: None,
        }
    }

    pub fn row(&self, metric: KpiMetric) -> Option<&KpiRow> {
        self.rows.iter().find(|row| row.metric == metric)
    }

    fn row_mut(&mut self, metric: KpiMetric) -> &mut KpiRow {
        if let Some(index) = self.rows.iter().position(|row| row.metric == metric) {
            return &mut self.rows[index];
        }
        self.rows.push(KpiRow::empty(metric));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// `month` is a calendar month (1 = January).
    pub fn set_target(&mut self, metric: KpiMetric, month: u32, value: f64) -> Result<()> {
        let index = fiscal_index(month)?;
        validate_value(value)?;
        self.row_mut(metric).targets[index] = value;
        Ok(())
    }

    pub fn set_actual(&mut self, metric: KpiMetric, month: u32, value: f64) -> Result<()> {
        let index = fiscal_index(month)?;
        validate_value(value)?;
        self.row_mut(metric).actuals[index] = value;
        Ok(())
    }

    /// Actual over target in percent, `None` without a target.
    pub fn achievement(&self, metric: KpiMetric, month: u32) -> Result<Option<f64>> {
        let index = fiscal_index(month)?;
        Ok(self
            .row(metric)
            .and_then(|row| achievement_rate(row.actuals[index], row.targets[index])))
    }

    pub fn summary(&self, metric: KpiMetric) -> KpiSummary {
        let empty = KpiRow::empty(metric);
        let row = self.row(metric).unwrap_or(&empty);
        let target_total: f64 = row.targets.iter().sum();
        let actual_total: f64 = row.actuals.iter().sum();
        KpiSummary {
            metric,
            target_total,
            actual_total,
            achievement: achievement_rate(actual_total, target_total),
            monthly_achievement: row
                .actuals
                .iter()
                .zip(row.targets.iter())
                .map(|(&actual, &target)| achievement_rate(actual, target))
                .collect(),
        }
    }
}

fn achievement_rate(actual: f64, target: f64) -> Option<f64> {
    if target <= 0.0 {
        None
    } else {
        Some((actual / target * 1000.0).round() / 10.0)
    }
}

fn validate_value(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("KPI values must be non-negative numbers, got {value}");
    }
    Ok(())
}

/// Calendar month (1..=12) to fiscal position (April = 0).
pub fn fiscal_index(month: u32) -> Result<usize> {
    if !(1..=12).contains(&month) {
        bail!("Month must be between 1 and 12, got {month}");
    }
    Ok(((month + 12 - FISCAL_YEAR_START_MONTH) % 12) as usize)
}

pub fn fiscal_year_of(date: NaiveDate) -> i32 {
    if date.month() >= FISCAL_YEAR_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    }
}
