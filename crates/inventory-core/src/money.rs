//! # Money Module
//!
//! Provides the `Money` type for the `pricePerUnit` field.
//!
//! ## Decimal, Scale 2
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prices are decimals with exactly two fraction digits.                 │
//! │                                                                         │
//! │  Wire (JSON)          Memory / Database                                │
//! │  ────────────         ─────────────────                                │
//! │  "9.99"      ──────►  Money(999)   (integer cents)                     │
//! │  9.99        ──────►  Money(999)   (numbers are rounded to cents)      │
//! │  "9.999"     ──────►  rejected: more than two fraction digits          │
//! │                                                                         │
//! │  Money(999)  ──────►  "9.99"       (always serialized as a string)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const FIELD: &str = "pricePerUnit";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: the type can hold negatives; validation rejects them
///   for prices
/// - **Single field tuple struct**: zero-cost over i64, stored as INTEGER
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use inventory_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Converts a JSON number to Money, rounding to the nearest cent.
    ///
    /// ```rust
    /// use inventory_core::money::Money;
    ///
    /// assert_eq!(Money::from_f64(9.99).unwrap().cents(), 999);
    /// assert!(Money::from_f64(f64::NAN).is_err());
    /// ```
    pub fn from_f64(value: f64) -> Result<Self, ValidationError> {
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents > i64::MAX as f64 || cents < i64::MIN as f64 {
            return Err(invalid("not a representable amount"));
        }
        Ok(Money(cents as i64))
    }
}

fn invalid(reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: FIELD.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Parsing & Display
// =============================================================================

/// Parses `"9"`, `"9.9"`, `"9.99"` and `"-1.50"`.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a decimal number"));
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("at most two fraction digits are allowed"));
        }

        let whole: i64 = whole.parse().map_err(|_| invalid("amount out of range"))?;
        let frac_cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => frac.parse::<i64>().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or_else(|| invalid("amount out of range"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(invalid("amount out of range")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .ok_or_else(|| E::custom(invalid("amount out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_f64(v).map_err(E::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!("9.99".parse::<Money>().unwrap().cents(), 999);
        assert_eq!("9.9".parse::<Money>().unwrap().cents(), 990);
        assert_eq!("9".parse::<Money>().unwrap().cents(), 900);
        assert_eq!("0.05".parse::<Money>().unwrap().cents(), 5);
        assert_eq!("-1.50".parse::<Money>().unwrap().cents(), -150);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("9.999".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2x".parse::<Money>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(999).to_string(), "9.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-150).to_string(), "-1.50");
    }

    #[test]
    fn test_json_accepts_string_and_number() {
        let from_str: Money = serde_json::from_str("\"497.45\"").unwrap();
        let from_float: Money = serde_json::from_str("9.99").unwrap();
        let from_int: Money = serde_json::from_str("12").unwrap();

        assert_eq!(from_str.cents(), 49745);
        assert_eq!(from_float.cents(), 999);
        assert_eq!(from_int.cents(), 1200);
    }

    #[test]
    fn test_json_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(999)).unwrap();
        assert_eq!(json, "\"9.99\"");
    }
}
