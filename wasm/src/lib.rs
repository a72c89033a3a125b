//! WebAssembly module for Khata
//!
//! Provides client-side computation for:
//! - Invoice and bill line totals with VAT
//! - Document number generation
//! - NPR currency formatting
//! - Form validation before submit

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{
    calculate_vat, document_number, format_npr, parse_money, DocumentKind, DocumentTotals,
    LineAmounts, VatPosition,
};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("khata-wasm ready"));
}

/// A line being edited in an invoice or bill form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftLine {
    quantity: i32,
    unit_price: Decimal,
    vat_rate: Option<Decimal>,
}

impl DraftLine {
    fn amounts(&self) -> Result<LineAmounts, String> {
        LineAmounts::compute(
            self.quantity,
            self.unit_price,
            self.vat_rate.unwrap_or(DEFAULT_VAT_RATE),
        )
        .ok_or_else(|| "Line total is too large".to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftTotals {
    lines: Vec<LineAmounts>,
    #[serde(flatten)]
    totals: DocumentTotals,
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn from_f64(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn price_line(line_json: &str) -> Result<String, String> {
    let line: DraftLine =
        serde_json::from_str(line_json).map_err(|e| format!("Invalid line JSON: {}", e))?;
    serde_json::to_string(&line.amounts()?).map_err(|e| e.to_string())
}

fn price_draft(lines_json: &str) -> Result<String, String> {
    let drafts: Vec<DraftLine> =
        serde_json::from_str(lines_json).map_err(|e| format!("Invalid lines JSON: {}", e))?;
    let lines = drafts
        .iter()
        .map(DraftLine::amounts)
        .collect::<Result<Vec<_>, _>>()?;
    let totals = DocumentTotals::from_lines(&lines)
        .ok_or_else(|| "Document total is too large".to_string())?;
    serde_json::to_string(&DraftTotals { lines, totals }).map_err(|e| e.to_string())
}

/// Price a single line: returns `{quantity, unitPrice, totalPrice, vatRate, vatAmount}`
#[wasm_bindgen]
pub fn calculate_line(line_json: &str) -> Result<String, JsValue> {
    price_line(line_json).map_err(|e| JsValue::from_str(&e))
}

/// Price every line of a draft document and sum the header totals
#[wasm_bindgen]
pub fn calculate_invoice_totals(lines_json: &str) -> Result<String, JsValue> {
    price_draft(lines_json).map_err(|e| JsValue::from_str(&e))
}

/// VAT due on an amount at a percentage rate, rounded to cents; NaN on overflow
#[wasm_bindgen]
pub fn calculate_vat_amount(amount: f64, rate_percent: f64) -> f64 {
    calculate_vat(from_f64(amount), from_f64(rate_percent)).map_or(f64::NAN, to_f64)
}

/// Format an amount for display, e.g. `NPR 1,234.5`
#[wasm_bindgen]
pub fn format_currency(amount: f64) -> String {
    format_npr(from_f64(amount))
}

/// Parse money typed by a user; garbage parses as zero
#[wasm_bindgen]
pub fn parse_currency(text: &str) -> f64 {
    to_f64(parse_money(text))
}

/// Suggest a fresh number for an `invoice` or a purchase `bill`
#[wasm_bindgen]
pub fn generate_document_number(kind: &str) -> Result<String, JsValue> {
    let kind = match kind {
        "invoice" => DocumentKind::Invoice,
        "bill" => DocumentKind::Bill,
        other => return Err(JsValue::from_str(&format!("Unknown document kind: {}", other))),
    };
    let millis = js_sys::Date::now() as i64;
    let salt = (js_sys::Math::random() * f64::from(u16::MAX)) as u32;
    Ok(document_number(kind, millis, salt))
}

/// `"payable"` or `"refundable"` for a net VAT figure
#[wasm_bindgen]
pub fn vat_position(net_vat: f64) -> String {
    match VatPosition::of(from_f64(net_vat)) {
        VatPosition::Payable => "payable".to_string(),
        VatPosition::Refundable => "refundable".to_string(),
    }
}

/// Check a SKU; returns the error message, or `None` when valid
#[wasm_bindgen]
pub fn check_sku(sku: &str) -> Option<String> {
    validate_sku(sku).err().map(str::to_string)
}

/// Check a PAN number; returns the error message, or `None` when valid
#[wasm_bindgen]
pub fn check_pan_number(pan: &str) -> Option<String> {
    validate_pan_number(pan).err().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_totals() {
        let out = price_draft(
            r#"[{"quantity": 2, "unitPrice": "100"}, {"quantity": 1, "unitPrice": "50"}]"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let amount = |key: &str| -> Decimal { value[key].as_str().unwrap().parse().unwrap() };
        assert_eq!(amount("subtotal"), Decimal::from(250));
        assert_eq!(amount("vatAmount"), "32.5".parse::<Decimal>().unwrap());
        assert_eq!(amount("totalAmount"), "282.5".parse::<Decimal>().unwrap());
        assert_eq!(value["lines"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_line_overflow_is_an_error() {
        let err = price_line(r#"{"quantity": 3, "unitPrice": "30000000000000000000000000000"}"#)
            .unwrap_err();
        assert_eq!(err, "Line total is too large");

        let err = price_draft(
            r#"[{"quantity": 1, "unitPrice": "50000000000000000000000000000", "vatRate": "0"},
                {"quantity": 1, "unitPrice": "50000000000000000000000000000", "vatRate": "0"}]"#,
        )
        .unwrap_err();
        assert_eq!(err, "Document total is too large");
    }

    #[test]
    fn test_single_line() {
        let out = price_line(r#"{"quantity": 2, "unitPrice": "100"}"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let amount = |key: &str| -> Decimal { value[key].as_str().unwrap().parse().unwrap() };
        assert_eq!(amount("totalPrice"), Decimal::from(200));
        assert_eq!(amount("vatAmount"), Decimal::from(26));
    }

    #[test]
    fn test_vat_amount() {
        assert!((calculate_vat_amount(200.0, 13.0) - 26.0).abs() < 0.001);
        assert!((calculate_vat_amount(100.0, 0.0)).abs() < 0.001);
        assert!(calculate_vat_amount(1.0e28, 13.0).is_nan());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "NPR 1,234.5");
    }

    #[test]
    fn test_vat_position() {
        assert_eq!(vat_position(70.0), "payable");
        assert_eq!(vat_position(0.0), "payable");
        assert_eq!(vat_position(-5.0), "refundable");
    }

    #[test]
    fn test_check_sku() {
        assert!(check_sku("").is_some());
    }
}
