//! Utility functions for formatting chart values
//!
//! Centralized formatting so table output renders USD and token amounts
//! consistently.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "$" prefix
    Usd,
    /// No currency symbol (token amounts)
    None,
}

/// Core formatting function with full control over output.
///
/// Rounds half away from zero to `decimals` places and groups the integer
/// part with `,`.
///
/// # Examples
/// ```
/// use yieldline::utils::{format_amount, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(1234.567), 2, CurrencySymbol::Usd), "$1,234.57");
/// assert_eq!(format_amount(dec!(-0.5), 4, CurrencySymbol::None), "-0.5000");
/// ```
pub fn format_amount(value: Decimal, decimals: u32, symbol: CurrencySymbol) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.*}", decimals as usize, rounded.abs());
    let (integer_part, fraction_part) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), Some(fraction.to_string())),
        None => (formatted.clone(), None),
    };

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Usd => "$",
        CurrencySymbol::None => "",
    };

    match fraction_part {
        Some(fraction) => format!("{}{}{}.{}", sign, prefix, with_separators, fraction),
        None => format!("{}{}{}", sign, prefix, with_separators),
    }
}

/// Format as US dollars with cents: "$1,234.56"
///
/// # Examples
/// ```
/// use yieldline::utils::format_usd;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_usd(dec!(1234.56)), "$1,234.56");
/// assert_eq!(format_usd(dec!(-500)), "-$500.00");
/// ```
pub fn format_usd(value: Decimal) -> String {
    format_amount(value, 2, CurrencySymbol::Usd)
}

/// Format a token quantity with 6 decimal places
pub fn format_token(value: Decimal) -> String {
    format_amount(value, 6, CurrencySymbol::None)
}

/// Format a percentage: "12.34%"
pub fn format_pct(value: Decimal) -> String {
    format!("{}%", format_amount(value, 2, CurrencySymbol::None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_usd_basic() {
        assert_eq!(format_usd(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_usd(dec!(0.99)), "$0.99");
        assert_eq!(format_usd(dec!(1000000)), "$1,000,000.00");
    }

    #[test]
    fn test_format_usd_small_values() {
        assert_eq!(format_usd(dec!(0)), "$0.00");
        assert_eq!(format_usd(dec!(0.01)), "$0.01");
        assert_eq!(format_usd(dec!(123)), "$123.00");
        assert_eq!(format_usd(dec!(999.99)), "$999.99");
    }

    #[test]
    fn test_format_usd_negative() {
        assert_eq!(format_usd(dec!(-1234.56)), "-$1,234.56");
        assert_eq!(format_usd(dec!(-0.01)), "-$0.01");
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(format_usd(dec!(1.005)), "$1.01");
        assert_eq!(format_usd(dec!(-1.005)), "-$1.01");
        assert_eq!(format_usd(dec!(1.994)), "$1.99");
    }

    #[test]
    fn test_negative_that_rounds_to_zero_has_no_sign() {
        assert_eq!(format_usd(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_token() {
        assert_eq!(format_token(dec!(1234.5)), "1,234.500000");
        assert_eq!(format_token(dec!(0.0000004)), "0.000000");
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(dec!(12.345)), "12.35%");
        assert_eq!(format_pct(dec!(-3)), "-3.00%");
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(format_amount(dec!(1234567.4), 0, CurrencySymbol::None), "1,234,567");
    }
}
