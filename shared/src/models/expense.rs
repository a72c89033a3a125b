//! Business expenses

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::empty_string_as_none;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub category: String,
    pub expense_date: DateTime<Utc>,
    pub receipt_path: Option<String>,
    pub is_vat_applicable: bool,
    pub vat_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseInput {
    #[validate(length(min = 1, max = 200, message = "Expense title is required"))]
    pub title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 100, message = "Expense category is required"))]
    pub category: String,
    pub expense_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub receipt_path: Option<String>,
    pub is_vat_applicable: Option<bool>,
    pub vat_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseInput {
    #[validate(length(min = 1, max = 200, message = "Expense title cannot be empty"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    #[validate(length(min = 1, max = 100, message = "Expense category cannot be empty"))]
    pub category: Option<String>,
    pub expense_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub receipt_path: Option<String>,
    pub is_vat_applicable: Option<bool>,
    pub vat_amount: Option<Decimal>,
}

impl Expense {
    pub fn new(input: CreateExpenseInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            amount: input.amount,
            category: input.category,
            expense_date: input.expense_date.unwrap_or(now),
            receipt_path: input.receipt_path,
            is_vat_applicable: input.is_vat_applicable.unwrap_or(false),
            vat_amount: input.vat_amount.unwrap_or(Decimal::ZERO),
            created_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateExpenseInput) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(expense_date) = update.expense_date {
            self.expense_date = expense_date;
        }
        if let Some(receipt_path) = update.receipt_path {
            self.receipt_path = Some(receipt_path);
        }
        if let Some(flag) = update.is_vat_applicable {
            self.is_vat_applicable = flag;
        }
        if let Some(vat_amount) = update.vat_amount {
            self.vat_amount = vat_amount;
        }
    }

    /// VAT that counts towards input tax; zero unless the expense is flagged
    pub fn claimable_vat(&self) -> Decimal {
        if self.is_vat_applicable {
            self.vat_amount
        } else {
            Decimal::ZERO
        }
    }
}
