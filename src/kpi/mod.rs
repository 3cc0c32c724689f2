pub mod commands;
mod models;

pub use models::{
    fiscal_index, fiscal_year_of, KpiMetric, KpiRow, KpiSheet, KpiSummary, MONTHS_PER_YEAR,
};

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;

use crate::store::{self, keys, KeyedStore};

/// KPI sheets, one store key per fiscal year.
#[derive(Clone)]
pub struct KpiBook {
    store: Arc<dyn KeyedStore>,
}

impl KpiBook {
    pub fn new(store: Arc<dyn KeyedStore>) -> Self {
        Self { store }
    }

    /// A blank sheet when the year has never been saved or its data is unreadable.
    pub fn sheet(&self, fiscal_year: i32) -> KpiSheet {
        store::load::<KpiSheet>(self.store.as_ref(), &keys::kpi(fiscal_year))
            .filter(|sheet| sheet.fiscal_year == fiscal_year)
            .unwrap_or_else(|| KpiSheet::new(fiscal_year))
    }

    pub fn save(&self, sheet: &mut KpiSheet) -> Result<()> {
        if !(2000..=2100).contains(&sheet.fiscal_year) {
            bail!("Unsupported fiscal year {}", sheet.fiscal_year);
        }
        sheet.updated_at = Some(Utc::now());
        store::save(self.store.as_ref(), &keys::kpi(sheet.fiscal_year), &*sheet)
    }

    pub fn set_target(
        &self,
        fiscal_year: i32,
        metric: KpiMetric,
        month: u32,
        value: f64,
    ) -> Result<KpiSheet> {
        let mut sheet = self.sheet(fiscal_year);
        sheet.set_target(metric, month, value)?;
        self.save(&mut sheet)?;
        Ok(sheet)
    }

    pub fn set_actual(
        &self,
        fiscal_year: i32,
        metric: KpiMetric,
        month: u32,
        value: f64,
    ) -> Result<KpiSheet> {
        let mut sheet = self.sheet(fiscal_year);
        sheet.set_actual(metric, month, value)?;
        self.save(&mut sheet)?;
        Ok(sheet)
    }

    pub fn summaries(&self, fiscal_year: i32) -> Vec<KpiSummary> {
        let sheet = self.sheet(fiscal_year);
        KpiMetric::ALL
            .iter()
            .map(|&metric| sheet.summary(metric))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn book() -> (KpiBook, Arc<dyn KeyedStore>) {
        let store: Arc<dyn KeyedStore> = Arc::new(MemoryStore::new());
        (KpiBook::new(Arc::clone(&store)), store)
    }

    #[test]
    fn unsaved_year_is_blank() {
        let (book, _) = book();
        let sheet = book.sheet(2024);
        assert_eq!(sheet.fiscal_year, 2024);
        assert_eq!(sheet.rows.len(), KpiMetric::ALL.len());
        assert!(sheet.updated_at.is_none());
    }

    #[test]
    fn years_are_stored_separately() {
        let (book, store) = book();
        book.set_target(2024, KpiMetric::SalesUnits, 4, 30.0).unwrap();
        book.set_actual(2025, KpiMetric::SalesUnits, 4, 25.0).unwrap();

        assert!(store.get("kpi_2024").unwrap().is_some());
        assert!(store.get("kpi_2025").unwrap().is_some());

        let sheet_2024 = book.sheet(2024);
        assert_eq!(sheet_2024.row(KpiMetric::SalesUnits).unwrap().targets[0], 30.0);
        assert_eq!(sheet_2024.row(KpiMetric::SalesUnits).unwrap().actuals[0], 0.0);
        assert!(sheet_2024.updated_at.is_some());
    }

    #[test]
    fn corrupt_sheet_reads_as_blank() {
        let (book, store) = book();
        store.set("kpi_2024", json!({"fiscalYear": "oops"})).unwrap();
        assert_eq!(book.sheet(2024), KpiSheet::new(2024));
    }

    #[test]
    fn summaries_cover_every_metric() {
        let (book, _) = book();
        book.set_target(2024, KpiMetric::Inquiries, 10, 200.0).unwrap();
        book.set_actual(2024, KpiMetric::Inquiries, 10, 150.0).unwrap();

        let summaries = book.summaries(2024);
        assert_eq!(summaries.len(), 4);
        let inquiries = summaries
            .iter()
            .find(|s| s.metric == KpiMetric::Inquiries)
            .unwrap();
        assert_eq!(inquiries.achievement, Some(75.0));
    }

    #[test]
    fn rejects_out_of_range_year() {
        let (book, _) = book();
        assert!(book.set_target(1900, KpiMetric::Revenue, 4, 1.0).is_err());
    }
}
