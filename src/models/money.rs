//! Money type for representing currency amounts
//!
//! Wraps `rust_decimal::Decimal` so that sums of amounts are exact and never
//! drift the way floating point does. Currency symbols and locale formatting
//! are a presentation concern; this type only carries the decimal value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

/// Largest magnitude accepted for a single amount: one quadrillion units
///
/// Kept far below `Decimal::MAX` so yearly totals and the sums over a
/// year of entries never overflow.
pub const MAX_UNITS: i64 = 1_000_000_000_000_000;

/// An exact decimal monetary quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoneyValue(Decimal);

impl MoneyValue {
    /// Create a zero amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create an amount from a decimal value
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Get the underlying decimal value
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    /// Check if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    /// Check that the magnitude does not exceed [`MAX_UNITS`]
    pub fn is_within_limit(&self) -> bool {
        self.0.abs() <= Decimal::from(MAX_UNITS)
    }

    pub fn checked_add(self, other: MoneyValue) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_mul(self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Divide this amount by `base`, returning `None` for a zero base
    pub fn ratio(&self, base: MoneyValue) -> Option<Decimal> {
        self.0.checked_div(base.0)
    }

    /// Parse an amount written with `.` as decimal separator
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,234.50", "10"
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_with_separator(text, '.')
    }

    /// Parse a locale-formatted amount
    ///
    /// A currency symbol in front of or behind the number is ignored, and so
    /// are grouping characters before the decimal separator. Returns `None`
    /// for anything else that is not a number, and for amounts beyond
    /// [`MAX_UNITS`].
    pub fn parse_with_separator(text: &str, decimal_separator: char) -> Option<Self> {
        Self::parse_unbounded(text, decimal_separator).filter(MoneyValue::is_within_limit)
    }

    fn parse_unbounded(text: &str, decimal_separator: char) -> Option<Self> {
        let is_symbol = |c: char| {
            !(c.is_ascii_digit()
                || c == '-'
                || c == '+'
                || c == decimal_separator
                || is_grouping(c))
        };

        let core = text.trim().trim_matches(is_symbol).trim();
        let (negative, rest) = match core.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, core.strip_prefix('+').unwrap_or(core)),
        };
        let digits = rest.trim_matches(is_symbol).trim();

        let mut normalized = String::with_capacity(digits.len() + 1);
        let mut seen_separator = false;
        for c in digits.chars() {
            if c.is_ascii_digit() {
                normalized.push(c);
            } else if c == decimal_separator {
                if seen_separator {
                    return None;
                }
                seen_separator = true;
                normalized.push('.');
            } else if is_grouping(c) && !seen_separator {
                continue;
            } else {
                return None;
            }
        }

        if !normalized.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        if normalized.starts_with('.') {
            normalized.insert(0, '0');
        }
        if normalized.ends_with('.') {
            normalized.pop();
        }

        let value = Decimal::from_str(&normalized).ok()?;
        Some(Self(if negative { -value } else { value }))
    }

    /// Parse an amount, turning a malformed input into `InvalidAmount` and
    /// one beyond [`MAX_UNITS`] into `AmountOutOfRange`
    pub fn try_parse(text: &str, decimal_separator: char) -> LedgerResult<Self> {
        match Self::parse_unbounded(text, decimal_separator) {
            None => Err(LedgerError::InvalidAmount(text.to_string())),
            Some(amount) if !amount.is_within_limit() => {
                Err(LedgerError::AmountOutOfRange(text.trim().to_string()))
            }
            Some(amount) => Ok(amount),
        }
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{:.2}", symbol, self.0.abs())
        } else {
            format!("{}{:.2}", symbol, self.0)
        }
    }
}

fn is_grouping(c: char) -> bool {
    matches!(c, ',' | '.' | '\'' | ' ' | '\u{a0}' | '\u{202f}')
}

impl Default for MoneyValue {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for MoneyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for MoneyValue {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for MoneyValue {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Add for MoneyValue {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for MoneyValue {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for MoneyValue {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for MoneyValue {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for MoneyValue {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Scalar scaling, e.g. a monthly amount times twelve
impl Mul<Decimal> for MoneyValue {
    type Output = Self;

    fn mul(self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }
}

impl Mul<u32> for MoneyValue {
    type Output = Self;

    fn mul(self, factor: u32) -> Self {
        Self(self.0 * Decimal::from(factor))
    }
}

impl Sum for MoneyValue {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MoneyValue::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a MoneyValue> for MoneyValue {
    fn sum<I: Iterator<Item = &'a MoneyValue>>(iter: I) -> Self {
        iter.fold(MoneyValue::zero(), |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_rejects_amounts_past_the_limit() {
        let huge = "79228162514264337593543950335";
        assert_eq!(MoneyValue::parse(huge), None);
        assert!(matches!(
            MoneyValue::try_parse(huge, '.'),
            Err(LedgerError::AmountOutOfRange(_))
        ));
        assert!(matches!(
            MoneyValue::try_parse("1000000000000000.01", '.'),
            Err(LedgerError::AmountOutOfRange(_))
        ));

        let max = MoneyValue::try_parse("-1000000000000000", '.').unwrap();
        assert!(max.is_within_limit());
        assert_eq!(max.checked_mul(dec!(12)), Some(MoneyValue::new(dec!(-12000000000000000))));
        assert_eq!(MoneyValue::new(Decimal::MAX).checked_add(MoneyValue::from(1)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(MoneyValue::new(dec!(10.5)).to_string(), "10.50");
        assert_eq!(MoneyValue::zero().to_string(), "0.00");
        assert_eq!(MoneyValue::new(dec!(-3)).to_string(), "-3.00");
        assert_eq!(
            MoneyValue::new(dec!(-3)).format_with_symbol("$"),
            "-$3.00"
        );
    }

    #[test]
    fn test_exact_arithmetic() {
        let a = MoneyValue::new(dec!(0.1));
        let b = MoneyValue::new(dec!(0.2));

        assert_eq!(a + b, MoneyValue::new(dec!(0.3)));
        assert_eq!(b - a, MoneyValue::new(dec!(0.1)));
        assert_eq!(-a, MoneyValue::new(dec!(-0.1)));
        assert_eq!(a * 12u32, MoneyValue::new(dec!(1.2)));
        assert_eq!(a * dec!(3), MoneyValue::new(dec!(0.3)));
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            MoneyValue::from(100),
            MoneyValue::new(dec!(0.01)),
            MoneyValue::new(dec!(-20.5)),
        ];
        let borrowed: MoneyValue = amounts.iter().sum();
        let owned: MoneyValue = amounts.into_iter().sum();
        assert_eq!(owned, MoneyValue::new(dec!(79.51)));
        assert_eq!(borrowed, owned);
    }

    #[test]
    fn test_comparison() {
        let a = MoneyValue::from(10);
        let b = MoneyValue::from(5);

        assert!(a > b);
        assert!(b < a);
        assert_eq!(a, MoneyValue::new(dec!(10.00)));
    }

    #[test]
    fn test_sign_checks() {
        assert!(MoneyValue::zero().is_zero());
        assert!(!MoneyValue::zero().is_negative());
        assert!(MoneyValue::from(1).is_positive());
        assert!(MoneyValue::from(-1).is_negative());
        assert_eq!(MoneyValue::from(-7).abs(), MoneyValue::from(7));
    }

    #[test]
    fn test_parse() {
        assert_eq!(MoneyValue::parse("10.50"), Some(MoneyValue::new(dec!(10.50))));
        assert_eq!(MoneyValue::parse("$10.50"), Some(MoneyValue::new(dec!(10.50))));
        assert_eq!(MoneyValue::parse("-$10.50"), Some(MoneyValue::new(dec!(-10.50))));
        assert_eq!(MoneyValue::parse("1,234.5"), Some(MoneyValue::new(dec!(1234.5))));
        assert_eq!(MoneyValue::parse("10"), Some(MoneyValue::from(10)));
        assert_eq!(MoneyValue::parse(".25"), Some(MoneyValue::new(dec!(0.25))));
    }

    #[test]
    fn test_parse_with_comma_separator() {
        assert_eq!(
            MoneyValue::parse_with_separator("1.234,56 €", ','),
            Some(MoneyValue::new(dec!(1234.56)))
        );
        assert_eq!(
            MoneyValue::parse_with_separator("-0,5", ','),
            Some(MoneyValue::new(dec!(-0.5)))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(MoneyValue::parse(""), None);
        assert_eq!(MoneyValue::parse("abc"), None);
        assert_eq!(MoneyValue::parse("12abc34"), None);
        assert_eq!(MoneyValue::parse("1.2.3"), None);
        assert_eq!(MoneyValue::parse("-"), None);
        assert_eq!(MoneyValue::parse("1.000,5"), None);
    }

    #[test]
    fn test_try_parse_error() {
        let err = MoneyValue::try_parse("ten", '.').unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(ref s) if s == "ten"));
    }

    #[test]
    fn test_ratio() {
        let half = MoneyValue::from(50).ratio(MoneyValue::from(100));
        assert_eq!(half, Some(dec!(0.5)));
        assert_eq!(MoneyValue::from(1).ratio(MoneyValue::zero()), None);
    }

    #[test]
    fn test_serialization() {
        let m = MoneyValue::new(dec!(10.50));
        let json = serde_json::to_string(&m).unwrap();
        let deserialized: MoneyValue = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
