//! Common types used across the platform

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// VAT rate applied to a line when the caller does not supply one (percent)
pub const DEFAULT_VAT_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 0);

/// Largest money figure accepted from a client (one trillion NPR)
pub const MAX_MONEY_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Reorder level used when a product has no minimum stock level configured
pub const DEFAULT_MIN_STOCK_LEVEL: i32 = 5;

/// Default unit of measure for new products
pub const DEFAULT_UNIT: &str = "pcs";

/// Payment status shared by sales invoices and purchase bills
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "document_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Paid => "paid",
            DocumentStatus::Overdue => "overdue",
            DocumentStatus::Cancelled => "cancelled",
        }
    }

    /// Money the counterparty still owes (or is owed) on this document
    pub fn is_outstanding(&self) -> bool {
        matches!(self, DocumentStatus::Pending | DocumentStatus::Overdue)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "staff_role", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    #[default]
    Staff,
    Accountant,
}

/// Signed adjustment of a counterparty's outstanding balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub delta: Decimal,
}

/// Result of a clamped adjustment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentOutcome {
    pub id: uuid::Uuid,
    pub applied: bool,
}

/// Inclusive date range used to filter reports
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Whether the UTC calendar date of `at` falls inside the range
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Treat `""` (what browser forms send for untouched optional inputs) as absent
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
