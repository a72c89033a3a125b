//! Purchase bills and their line items

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::pricing::{price_document, DocumentError, LineItemInput};
use crate::types::{empty_string_as_none, DocumentStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub bill_number: String,
    pub supplier_id: Uuid,
    pub purchase_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total_amount: Decimal,
    pub status: DocumentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
}

/// A bill together with its lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseWithItems {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub items: Vec<PurchaseItem>,
}

/// Composite create request: header fields plus the ordered line items
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseInput {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 64, message = "Bill number must be at most 64 characters"))]
    pub bill_number: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub subtotal: Option<Decimal>,
    pub vat_amount: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub status: Option<DocumentStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// Header-only update. Amounts and lines are fixed once the bill exists.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseInput {
    pub status: Option<DocumentStatus>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
}

impl PurchaseWithItems {
    /// Validate and price a create request.
    ///
    /// `next_number` is only called when the caller did not bring its own
    /// bill number.
    pub fn build(
        input: CreatePurchaseInput,
        next_number: impl FnOnce() -> String,
    ) -> Result<Self, DocumentError> {
        let supplier_id = input.supplier_id.ok_or(DocumentError::Header {
            field: "supplierId",
            message: "Supplier is required",
        })?;
        let (lines, totals) = price_document(
            &input.items,
            input.subtotal,
            input.vat_amount,
            input.total_amount,
        )?;

        let now = Utc::now();
        let purchase = Purchase {
            id: Uuid::new_v4(),
            bill_number: input.bill_number.unwrap_or_else(next_number),
            supplier_id,
            purchase_date: input.purchase_date.unwrap_or(now),
            due_date: input.due_date,
            subtotal: totals.subtotal,
            vat_amount: totals.vat_amount,
            total_amount: totals.total_amount,
            status: input.status.unwrap_or_default(),
            notes: input.notes,
            created_at: now,
        };
        let items = lines
            .into_iter()
            .map(|line| PurchaseItem {
                id: Uuid::new_v4(),
                purchase_id: purchase.id,
                product_id: line.product_id,
                quantity: line.amounts.quantity,
                unit_price: line.amounts.unit_price,
                total_price: line.amounts.total_price,
                vat_rate: line.amounts.vat_rate,
                vat_amount: line.amounts.vat_amount,
            })
            .collect();

        Ok(Self { purchase, items })
    }
}

impl Purchase {
    pub fn apply(&mut self, update: UpdatePurchaseInput) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(purchase_date) = update.purchase_date {
            self.purchase_date = purchase_date;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
    }
}
