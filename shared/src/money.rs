//! Money helpers: rounding, VAT arithmetic and NPR display formatting

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency code used for display
pub const CURRENCY_CODE: &str = "NPR";

/// Round to two decimal places, halves away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// VAT due on `amount` at `rate_percent`, `None` when the product overflows
pub fn calculate_vat(amount: Decimal, rate_percent: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(rate_percent)?
        .checked_div(Decimal::ONE_HUNDRED)
        .map(round_money)
}

/// `amount` plus VAT at `rate_percent`
pub fn add_vat(amount: Decimal, rate_percent: Decimal) -> Option<Decimal> {
    amount.checked_add(calculate_vat(amount, rate_percent)?)
}

/// Format an amount as `NPR 1,234.5` (at most two fraction digits, no trailing zeros)
pub fn format_npr(amount: Decimal) -> String {
    let rounded = round_money(amount).normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(CURRENCY_CODE);
    out.push(' ');
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Parse user-entered money text, ignoring currency symbols and separators.
/// Unparseable input yields zero.
pub fn parse_money(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn vat_on_round_amounts() {
        assert_eq!(calculate_vat(dec("250"), dec("13")), Some(dec("32.5")));
        assert_eq!(add_vat(dec("250"), dec("13")), Some(dec("282.5")));
    }

    #[test]
    fn vat_overflow_is_none() {
        assert_eq!(calculate_vat(Decimal::MAX, dec("13")), None);
        assert_eq!(add_vat(Decimal::MAX, Decimal::ZERO), Some(Decimal::MAX));
        assert_eq!(add_vat(Decimal::MAX, dec("1")), None);
    }

    #[test]
    fn vat_rounds_half_away_from_zero() {
        // 0.05 * 13% = 0.0065
        assert_eq!(calculate_vat(dec("0.05"), dec("13")), Some(dec("0.01")));
        assert_eq!(calculate_vat(dec("0.03"), dec("13")), Some(dec("0.00")));
    }

    #[test]
    fn formats_with_grouping() {
        assert_eq!(format_npr(dec("0")), "NPR 0");
        assert_eq!(format_npr(dec("999")), "NPR 999");
        assert_eq!(format_npr(dec("1234.50")), "NPR 1,234.5");
        assert_eq!(format_npr(dec("1234567.891")), "NPR 1,234,567.89");
        assert_eq!(format_npr(dec("-282.5")), "-NPR 282.5");
    }

    #[test]
    fn parses_formatted_text() {
        assert_eq!(parse_money("NPR 1,234.50"), dec("1234.50"));
        assert_eq!(parse_money("abc"), Decimal::ZERO);
    }
}
