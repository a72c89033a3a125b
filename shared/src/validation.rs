//! Validation utilities for Khata
//!
//! Field-level rules shared by the server and the browser. Each rule returns a
//! static message naming what was violated.

use rust_decimal::Decimal;

use crate::types::MAX_MONEY_AMOUNT;

// ============================================================================
// Line Item Validations
// ============================================================================

/// Line quantities are whole units, at least one
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 1 {
        return Err("Quantity must be at least 1");
    }
    Ok(())
}

/// Unit prices may be zero (free items) but never negative
pub fn validate_unit_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    if price > MAX_MONEY_AMOUNT {
        return Err("Unit price is too large");
    }
    Ok(())
}

/// VAT rates are percentages between 0 and 100
pub fn validate_vat_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err("VAT rate must be between 0 and 100");
    }
    Ok(())
}

/// Generic non-negative money amount (expenses, credit limits, header totals)
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    if amount > MAX_MONEY_AMOUNT {
        return Err("Amount is too large");
    }
    Ok(())
}

/// Signed balance adjustment (payments are negative)
pub fn validate_balance_delta(delta: Decimal) -> Result<(), &'static str> {
    if delta.abs() > MAX_MONEY_AMOUNT {
        return Err("Adjustment is too large");
    }
    Ok(())
}

// ============================================================================
// Catalogue Validations
// ============================================================================

/// SKU: 1-64 characters, letters, digits, `-`, `_` or `.`
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("SKU is required");
    }
    if sku.len() > 64 {
        return Err("SKU must be at most 64 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err("SKU may only contain letters, digits, '-', '_' and '.'");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate username: 3-50 characters, lowercase letters, digits, `.` or `_`
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 || username.len() > 50 {
        return Err("Username must be between 3 and 50 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_')
    {
        return Err("Username may only contain lowercase letters, digits, '.' and '_'");
    }
    Ok(())
}

// ============================================================================
// Nepal-Specific Validations
// ============================================================================

/// Validate a Nepal PAN/VAT registration number (9 digits)
pub fn validate_pan_number(pan: &str) -> Result<(), &'static str> {
    if pan.len() != 9 || !pan.chars().all(|c| c.is_ascii_digit()) {
        return Err("PAN/VAT number must be exactly 9 digits");
    }
    Ok(())
}

/// Validate a Bikram Sambat fiscal year label such as `2080-81`
pub fn validate_tax_year(label: &str) -> Result<(), &'static str> {
    let Some((start, end)) = label.split_once('-') else {
        return Err("Tax year must look like 2080-81");
    };
    let (Ok(start), Ok(end)) = (start.parse::<u32>(), end.parse::<u32>()) else {
        return Err("Tax year must look like 2080-81");
    };
    if start < 1000 || end > 99 || (start + 1) % 100 != end {
        return Err("Tax year must span two consecutive years, e.g. 2080-81");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_rule() {
        assert!(validate_quantity(1).is_ok());
        assert_eq!(validate_quantity(0), Err("Quantity must be at least 1"));
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn price_and_rate_rules() {
        assert!(validate_unit_price(Decimal::ZERO).is_ok());
        assert!(validate_unit_price(Decimal::NEGATIVE_ONE).is_err());
        assert!(validate_vat_rate(Decimal::from(13)).is_ok());
        assert!(validate_vat_rate(Decimal::from(101)).is_err());
    }

    #[test]
    fn money_inputs_are_bounded() {
        assert_eq!(MAX_MONEY_AMOUNT, Decimal::from(1_000_000_000_000i64));
        assert!(validate_amount(MAX_MONEY_AMOUNT).is_ok());
        assert_eq!(
            validate_amount(MAX_MONEY_AMOUNT + Decimal::ONE),
            Err("Amount is too large")
        );
        assert!(validate_unit_price(Decimal::MAX).is_err());
        assert!(validate_balance_delta(-MAX_MONEY_AMOUNT).is_ok());
        assert!(validate_balance_delta(Decimal::MAX).is_err());
        assert!(validate_balance_delta(Decimal::MIN).is_err());
    }

    #[test]
    fn sku_rules() {
        assert!(validate_sku("LAP-001").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"X".repeat(65)).is_err());
    }

    #[test]
    fn pan_rules() {
        assert!(validate_pan_number("301234567").is_ok());
        assert!(validate_pan_number("30123456").is_err());
        assert!(validate_pan_number("30123456A").is_err());
    }

    #[test]
    fn tax_year_rules() {
        assert!(validate_tax_year("2080-81").is_ok());
        assert!(validate_tax_year("2099-00").is_ok());
        assert!(validate_tax_year("2080-82").is_err());
        assert!(validate_tax_year("2080").is_err());
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("ram.sharma").is_ok());
        assert!(validate_username("Ra").is_err());
        assert!(validate_username("Ram").is_err());
    }
}
