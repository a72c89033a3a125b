//! Line and document arithmetic for invoices and bills
//!
//! `totalPrice = quantity × unitPrice`, `vatAmount = totalPrice × rate / 100`,
//! header `subtotal = Σ totalPrice`, `vatAmount = Σ line vatAmount`,
//! `totalAmount = subtotal + vatAmount`. All amounts are rounded to cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::money::{calculate_vat, round_money};
use crate::types::DEFAULT_VAT_RATE;
use crate::validation::{validate_amount, validate_quantity, validate_unit_price, validate_vat_rate};

/// A line item as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub vat_rate: Option<Decimal>,
}

/// Computed amounts for one line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
}

impl LineAmounts {
    /// `None` when the line total does not fit in a `Decimal`
    pub fn compute(quantity: i32, unit_price: Decimal, vat_rate: Decimal) -> Option<Self> {
        let total_price = round_money(Decimal::from(quantity).checked_mul(unit_price)?);
        Some(Self {
            quantity,
            unit_price,
            total_price,
            vat_rate,
            vat_amount: calculate_vat(total_price, vat_rate)?,
        })
    }
}

/// A validated line bound to its product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub amounts: LineAmounts,
}

/// Header totals of an invoice or bill
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total_amount: Decimal,
}

impl DocumentTotals {
    /// Sum the lines; `None` on overflow
    pub fn from_lines<'a, I>(lines: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LineAmounts>,
    {
        let (subtotal, vat_amount) = lines.into_iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(sub, vat), line| {
                Some((
                    sub.checked_add(line.total_price)?,
                    vat.checked_add(line.vat_amount)?,
                ))
            },
        )?;
        Self::from_parts(subtotal, vat_amount)
    }

    pub fn from_parts(subtotal: Decimal, vat_amount: Decimal) -> Option<Self> {
        Some(Self {
            subtotal,
            vat_amount,
            total_amount: subtotal.checked_add(vat_amount)?,
        })
    }
}

/// A line item that broke a validation rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("items[{index}].{field}: {message}")]
pub struct LineItemError {
    pub index: usize,
    pub field: &'static str,
    pub message: &'static str,
}

/// Validate and price every line, failing on the first broken rule
pub fn price_items(items: &[LineItemInput]) -> Result<Vec<PricedLine>, LineItemError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let fail = |field, message| LineItemError {
                index,
                field,
                message,
            };

            let product_id = item
                .product_id
                .ok_or_else(|| fail("productId", "Product is required"))?;
            validate_quantity(item.quantity).map_err(|m| fail("quantity", m))?;
            let unit_price = item
                .unit_price
                .ok_or_else(|| fail("unitPrice", "Unit price is required"))?;
            validate_unit_price(unit_price).map_err(|m| fail("unitPrice", m))?;
            let vat_rate = item.vat_rate.unwrap_or(DEFAULT_VAT_RATE);
            validate_vat_rate(vat_rate).map_err(|m| fail("vatRate", m))?;

            let amounts = LineAmounts::compute(item.quantity, unit_price, vat_rate)
                .ok_or_else(|| fail("unitPrice", "Line total is too large"))?;

            Ok(PricedLine {
                product_id,
                amounts,
            })
        })
        .collect()
}

/// A create request for an invoice or bill that cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("{field}: {message}")]
    Header {
        field: &'static str,
        message: &'static str,
    },
    #[error(transparent)]
    Line(#[from] LineItemError),
}

impl DocumentError {
    /// JSON path of the offending input
    pub fn field(&self) -> String {
        match self {
            DocumentError::Header { field, .. } => (*field).to_string(),
            DocumentError::Line(e) => format!("items[{}].{}", e.index, e.field),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DocumentError::Header { message, .. } => message,
            DocumentError::Line(e) => e.message,
        }
    }
}

/// Price the lines of a document and settle its header totals.
///
/// With lines present the totals are derived from them and any caller-supplied
/// figures are ignored. Without lines the caller's subtotal and total are
/// required; a missing VAT amount counts as zero.
pub fn price_document(
    items: &[LineItemInput],
    subtotal: Option<Decimal>,
    vat_amount: Option<Decimal>,
    total_amount: Option<Decimal>,
) -> Result<(Vec<PricedLine>, DocumentTotals), DocumentError> {
    if !items.is_empty() {
        let lines = price_items(items)?;
        let totals = DocumentTotals::from_lines(lines.iter().map(|l| &l.amounts)).ok_or(
            DocumentError::Header {
                field: "totalAmount",
                message: "Document total is too large",
            },
        )?;
        return Ok((lines, totals));
    }

    let header = |field, message| DocumentError::Header { field, message };
    let subtotal = subtotal.ok_or_else(|| header("subtotal", "Subtotal is required"))?;
    let total_amount =
        total_amount.ok_or_else(|| header("totalAmount", "Total amount is required"))?;
    let vat_amount = vat_amount.unwrap_or(Decimal::ZERO);

    for (field, value) in [
        ("subtotal", subtotal),
        ("vatAmount", vat_amount),
        ("totalAmount", total_amount),
    ] {
        validate_amount(value).map_err(|m| header(field, m))?;
    }

    Ok((
        Vec::new(),
        DocumentTotals {
            subtotal: round_money(subtotal),
            vat_amount: round_money(vat_amount),
            total_amount: round_money(total_amount),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(qty: i32, price: &str) -> LineItemInput {
        LineItemInput {
            product_id: Some(Uuid::new_v4()),
            quantity: qty,
            unit_price: Some(dec(price)),
            vat_rate: None,
        }
    }

    #[test]
    fn two_line_invoice_totals() {
        let lines = price_items(&[item(2, "100"), item(1, "50")]).unwrap();
        assert_eq!(lines[0].amounts.total_price, dec("200"));
        assert_eq!(lines[0].amounts.vat_amount, dec("26"));
        assert_eq!(lines[1].amounts.vat_amount, dec("6.5"));

        let totals = DocumentTotals::from_lines(lines.iter().map(|l| &l.amounts)).unwrap();
        assert_eq!(totals.subtotal, dec("250"));
        assert_eq!(totals.vat_amount, dec("32.5"));
        assert_eq!(totals.total_amount, dec("282.5"));
    }

    #[test]
    fn explicit_rate_overrides_default() {
        let mut zero_rated = item(3, "10");
        zero_rated.vat_rate = Some(Decimal::ZERO);
        let lines = price_items(&[zero_rated]).unwrap();
        assert_eq!(lines[0].amounts.vat_amount, Decimal::ZERO);
        assert_eq!(lines[0].amounts.total_price, dec("30"));
    }

    #[test]
    fn reports_index_and_rule() {
        let mut missing = item(1, "5");
        missing.product_id = None;
        let err = price_items(&[item(1, "5"), missing]).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.field, "productId");
        assert_eq!(err.to_string(), "items[1].productId: Product is required");

        let err = price_items(&[item(0, "5")]).unwrap_err();
        assert_eq!(err.field, "quantity");
        assert_eq!(err.message, "Quantity must be at least 1");
    }

    #[test]
    fn document_totals_come_from_lines_when_present() {
        let (lines, totals) = price_document(
            &[item(2, "100"), item(1, "50")],
            Some(dec("1")),
            Some(dec("1")),
            Some(dec("1")),
        )
        .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(totals.total_amount, dec("282.5"));
    }

    #[test]
    fn itemless_document_needs_caller_totals() {
        let err = price_document(&[], None, None, Some(dec("10"))).unwrap_err();
        assert_eq!(err.field(), "subtotal");

        let (lines, totals) =
            price_document(&[], Some(dec("100")), None, Some(dec("100"))).unwrap();
        assert!(lines.is_empty());
        assert_eq!(totals.vat_amount, Decimal::ZERO);
        assert_eq!(totals.total_amount, dec("100"));
    }

    #[test]
    fn line_errors_carry_item_path() {
        let err = price_document(&[item(1, "-5")], None, None, None).unwrap_err();
        assert_eq!(err.field(), "items[0].unitPrice");
    }

    #[test]
    fn empty_document_totals_are_zero() {
        let totals = DocumentTotals::from_lines(std::iter::empty());
        assert_eq!(totals, Some(DocumentTotals::default()));
    }

    #[test]
    fn oversized_line_is_rejected_not_panicking() {
        assert_eq!(
            LineAmounts::compute(3, dec("30000000000000000000000000000"), Decimal::ZERO),
            None
        );
        assert_eq!(LineAmounts::compute(2, Decimal::MAX, Decimal::ZERO), None);

        let err = price_items(&[item(3, "30000000000000000000000000000")]).unwrap_err();
        assert_eq!(err.field, "unitPrice");

        let err = price_document(&[item(3, "30000000000000000000000000000")], None, None, None)
            .unwrap_err();
        assert_eq!(err.field(), "items[0].unitPrice");
    }

    #[test]
    fn totals_overflow_is_none() {
        let huge = LineAmounts {
            quantity: 1,
            unit_price: Decimal::MAX,
            total_price: Decimal::MAX,
            vat_rate: Decimal::ZERO,
            vat_amount: Decimal::ZERO,
        };
        assert_eq!(DocumentTotals::from_lines([&huge, &huge]), None);
        assert_eq!(DocumentTotals::from_parts(Decimal::MAX, Decimal::ONE), None);
    }
}
