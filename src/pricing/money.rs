//! Rupee amounts and their display format

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest price the catalog accepts, Rs. 1,000,000,000,000
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// A rupee amount that displays as `Rs. 10,500` (or `Rs. 1,050.50`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupees(pub Decimal);

impl fmt::Display for Rupees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.0, "Rs."))
    }
}

impl From<Decimal> for Rupees {
    fn from(amount: Decimal) -> Self {
        Rupees(amount)
    }
}

/// Format an amount the way prices are shown across the storefront
pub fn format_rs(amount: Decimal) -> String {
    Rupees(amount).to_string()
}

/// Format an amount with the given currency label, e.g. `PKR 1,050.50`
///
/// Rounds to two places; the fractional part is only printed when non-zero.
pub fn format_amount(amount: Decimal, label: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let cents = ((abs - whole) * Decimal::from(100)).to_u32().unwrap_or(0);

    let mut out = format!("{}{} {}", sign, label, group_thousands(whole.to_u128().unwrap_or(0)));
    if cents > 0 {
        out.push_str(&format!(".{:02}", cents));
    }
    out
}

/// Round to whole rupees, halves away from zero
pub fn round_rupees(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_whole_amounts() {
        assert_eq!(format_rs(Decimal::from(0)), "Rs. 0");
        assert_eq!(format_rs(Decimal::from(950)), "Rs. 950");
        assert_eq!(format_rs(Decimal::from(10_500)), "Rs. 10,500");
        assert_eq!(format_rs(Decimal::from(1_250_000)), "Rs. 1,250,000");
    }

    #[test]
    fn test_format_fractional_and_negative() {
        assert_eq!(format_rs(Decimal::new(105_050, 2)), "Rs. 1,050.50");
        assert_eq!(format_rs(Decimal::new(-500, 0)), "-Rs. 500");
        assert_eq!(format_rs(Decimal::new(1999, 3)), "Rs. 2");
    }

    #[test]
    fn test_format_amount_uses_label() {
        assert_eq!(format_amount(Decimal::from(9_450), "PKR"), "PKR 9,450");
    }

    #[test]
    fn test_round_rupees() {
        assert_eq!(round_rupees(Decimal::new(10505, 1)), Decimal::from(1051));
        assert_eq!(round_rupees(Decimal::new(10504, 1)), Decimal::from(1050));
    }
}
