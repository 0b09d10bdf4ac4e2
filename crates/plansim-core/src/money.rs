//! Money helpers
//!
//! All amounts are integer cents (USD-normalized upstream). Fractional
//! intermediates go through [`Decimal`] so rounding is exact and
//! reproducible across runs.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Amount in the smallest currency unit
pub type Cents = i64;

/// Months in a billing year
pub const MONTHS_PER_YEAR: i64 = 12;

/// Round half up: `floor(x + 0.5)`.
///
/// Matches the historical rounding for negative values as well
/// (`-2.5` rounds to `-2`).
pub fn round_half_up(value: Decimal) -> Cents {
    (value + dec!(0.5)).floor().to_i64().unwrap_or(0)
}

/// `round(amount * rate)`
pub fn apply_rate(amount: Cents, rate: Decimal) -> Cents {
    round_half_up(Decimal::from(amount) * rate)
}

/// `round(numerator / denominator)`; zero denominator yields zero.
pub fn div_round(numerator: i64, denominator: i64) -> i64 {
    if denominator == 0 {
        return 0;
    }
    round_half_up(Decimal::from(numerator) / Decimal::from(denominator))
}

/// Format cents as a dollar string with thousands separators.
///
/// `decimals` controls the number of fraction digits (`0` or `2` in
/// practice). Zero is always rendered as `$0`.
pub fn format_amount(cents: Cents, decimals: u32) -> String {
    if cents == 0 {
        return "$0".to_string();
    }

    let dollars = (Decimal::from(cents) / dec!(100))
        .round_dp_with_strategy(decimals, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    let negative = dollars.is_sign_negative();
    let text = format!("{:.*}", decimals as usize, dollars.abs());

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match fraction {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(dec!(2.5)), 3);
        assert_eq!(round_half_up(dec!(2.49)), 2);
        assert_eq!(round_half_up(dec!(-2.5)), -2);
        assert_eq!(round_half_up(dec!(-2.51)), -3);
    }

    #[test]
    fn test_apply_rate() {
        assert_eq!(apply_rate(10_010, dec!(0.05)), 501); // 500.5
        assert_eq!(apply_rate(1_000, dec!(0.15)), 150);
        assert_eq!(apply_rate(0, dec!(0.15)), 0);
    }

    #[test]
    fn test_div_round() {
        assert_eq!(div_round(30, 12), 3); // 2.5
        assert_eq!(div_round(29, 12), 2);
        assert_eq!(div_round(5, 0), 0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0, 2), "$0");
        assert_eq!(format_amount(1999, 2), "$19.99");
        assert_eq!(format_amount(123_456_700, 0), "$1,234,567");
        assert_eq!(format_amount(4900, 0), "$49");
        assert_eq!(format_amount(-150_000, 0), "-$1,500");
    }
}
