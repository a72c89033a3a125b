//! Reporting service for the dashboard and financial reports
//!
//! Figures are computed from full scans of the stored records; the arithmetic
//! itself lives in `shared::reports` so the browser can reproduce it.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use shared::reports::{DashboardStats, ExpenseMonthRule, ProfitLossReport, VatReport};
use shared::DateRange;

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    storage: Arc<dyn Storage>,
    month_rule: ExpenseMonthRule,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub format: ReportFormat,
}

impl ReportFilter {
    pub fn range(&self) -> AppResult<DateRange> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(AppError::validation("from", "Start date must not be after end date"));
            }
        }
        Ok(DateRange::new(self.from, self.to))
    }
}

impl ReportingService {
    pub fn new(storage: Arc<dyn Storage>, month_rule: ExpenseMonthRule) -> Self {
        Self {
            storage,
            month_rule,
        }
    }

    /// Dashboard figures as of now, in the server's local time zone
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        self.dashboard_at(&Local::now()).await
    }

    pub async fn dashboard_at<Tz>(&self, now: &DateTime<Tz>) -> AppResult<DashboardStats>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send + Sync,
    {
        let sales = self.storage.list_sales().await?;
        let expenses = self.storage.list_expenses().await?;
        let products = self.storage.list_products().await?;
        let total_customers = self.storage.count_customers().await?;

        Ok(DashboardStats::compute(
            &sales,
            &expenses,
            &products,
            total_customers,
            now,
            self.month_rule,
        ))
    }

    pub async fn profit_loss(&self, range: DateRange) -> AppResult<ProfitLossReport> {
        let sales = self.storage.list_sales().await?;
        let purchases = self.storage.list_purchases().await?;
        let expenses = self.storage.list_expenses().await?;
        Ok(ProfitLossReport::compute(&sales, &purchases, &expenses, range))
    }

    pub async fn vat(&self, range: DateRange) -> AppResult<VatReport> {
        let sales = self.storage.list_sales().await?;
        let purchases = self.storage.list_purchases().await?;
        let expenses = self.storage.list_expenses().await?;
        Ok(VatReport::compute(&sales, &purchases, &expenses, range))
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
