//! Product catalogue and stock models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::{empty_string_as_none, DEFAULT_MIN_STOCK_LEVEL, DEFAULT_UNIT};

/// A stocked product.
///
/// `stock_quantity` is never negative; it moves only through sale and purchase
/// line items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub cost_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub min_stock_level: Option<i32>,
    pub unit: String,
    pub vat_applicable: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,
    pub sku: String,
    pub category_id: Option<Uuid>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub cost_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Opening stock cannot be negative"))]
    pub stock_quantity: Option<i32>,
    #[validate(range(min = 0, message = "Minimum stock level cannot be negative"))]
    pub min_stock_level: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub unit: Option<String>,
    pub vat_applicable: Option<bool>,
    pub is_active: Option<bool>,
}

/// Partial product update. Stock is deliberately absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 200, message = "Product name cannot be empty"))]
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Minimum stock level cannot be negative"))]
    pub min_stock_level: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub unit: Option<String>,
    pub vat_applicable: Option<bool>,
    pub is_active: Option<bool>,
}

impl Product {
    pub fn new(input: CreateProductInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            sku: input.sku,
            category_id: input.category_id,
            description: input.description,
            unit_price: input.unit_price,
            cost_price: input.cost_price,
            stock_quantity: input.stock_quantity.unwrap_or(0),
            min_stock_level: Some(input.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL)),
            unit: input.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            vat_applicable: input.vat_applicable.unwrap_or(true),
            is_active: input.is_active.unwrap_or(true),
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: UpdateProductInput) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(sku) = update.sku {
            self.sku = sku;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(unit_price) = update.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(cost_price) = update.cost_price {
            self.cost_price = Some(cost_price);
        }
        if let Some(level) = update.min_stock_level {
            self.min_stock_level = Some(level);
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(vat_applicable) = update.vat_applicable {
            self.vat_applicable = vat_applicable;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }

    /// Stock level at or below which the product counts as low stock.
    /// An unset or zero minimum falls back to the default level.
    pub fn reorder_level(&self) -> i32 {
        self.min_stock_level
            .filter(|level| *level > 0)
            .unwrap_or(DEFAULT_MIN_STOCK_LEVEL)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.reorder_level()
    }
}

/// Apply a signed delta to a stock level, flooring at zero
pub fn clamp_stock(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).max(0)
}
