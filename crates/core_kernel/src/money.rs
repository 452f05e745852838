//! Money types with integer minor-unit arithmetic
//!
//! Amounts are held as a signed count of minor currency units (cents).
//! Every constructor and arithmetic operation is checked against
//! [`MAX_SAFE_MINOR`], which keeps values exactly representable by the
//! browser clients that render them.
//!
//! There is no division on [`Money`]. Splitting an amount into parts is the
//! job of the apportionment engine, which guarantees the parts add back up.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use thiserror::Error;

/// Largest magnitude a [`Money`] value may take (2^53 - 1 minor units)
pub const MAX_SAFE_MINOR: i64 = 9_007_199_254_740_991;

/// Largest minor unit exponent accepted by the decimal conversions
const MAX_MINOR_UNIT_EXPONENT: u32 = 9;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    EUR,
    USD,
    GBP,
    CHF,
    BRL,
    JPY,
}

impl Currency {
    /// Returns the number of decimal places of the currency's minor unit
    pub fn minor_unit_exponent(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::CHF => "CHF",
            Currency::BRL => "R$",
            Currency::JPY => "¥",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::BRL => "BRL",
            Currency::JPY => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            "GBP" => Ok(Currency::GBP),
            "CHF" => Ok(Currency::CHF),
            "BRL" => Ok(Currency::BRL),
            "JPY" => Ok(Currency::JPY),
            _ => Err(MoneyError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Arithmetic overflow: value leaves the safe range of 2^53-1 minor units")]
    ArithmeticOverflow,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// A monetary amount as a signed number of minor units
///
/// The currency is not carried by the value: an engine call works in a single
/// currency, chosen by the caller when parsing input and formatting output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    /// Zero minor units
    pub const ZERO: Money = Money(0);

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64) -> Result<Self, MoneyError> {
        if minor_units.unsigned_abs() > MAX_SAFE_MINOR as u64 {
            return Err(MoneyError::ArithmeticOverflow);
        }
        Ok(Self(minor_units))
    }

    /// Converts a decimal major-unit amount into minor units
    ///
    /// Rounds to the nearest minor unit, with midpoints rounded away from
    /// zero (0.005 becomes 0.01, -0.005 becomes -0.01).
    pub fn from_decimal(value: Decimal, minor_unit_exponent: u32) -> Result<Self, MoneyError> {
        if minor_unit_exponent > MAX_MINOR_UNIT_EXPONENT {
            return Err(MoneyError::InvalidAmount(format!(
                "unsupported minor unit exponent {}",
                minor_unit_exponent
            )));
        }

        let scale = Decimal::from(10_i64.pow(minor_unit_exponent));
        let minor = value
            .checked_mul(scale)
            .ok_or(MoneyError::ArithmeticOverflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(MoneyError::ArithmeticOverflow)?;

        Self::from_minor(minor)
    }

    /// Parses user-entered amount text such as `"1.234,56 €"` or `"-12.5"`
    ///
    /// Either `.` or `,` may be the decimal separator. When both appear the
    /// last one is the decimal separator and the other groups thousands; a
    /// separator repeated on its own is treated as grouping. Spaces inside
    /// the number are grouping too. A currency symbol or code may precede or
    /// follow the number.
    pub fn parse(input: &str, minor_unit_exponent: u32) -> Result<Self, MoneyError> {
        let normalized = normalize_amount_text(input)
            .ok_or_else(|| MoneyError::InvalidAmount(input.to_string()))?;
        let value = Decimal::from_str(&normalized)
            .map_err(|_| MoneyError::InvalidAmount(input.to_string()))?;
        Self::from_decimal(value, minor_unit_exponent)
    }

    /// Returns the raw number of minor units
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the amount in major units for the given currency
    pub fn to_decimal(&self, currency: Currency) -> Decimal {
        Decimal::new(self.0, currency.minor_unit_exponent())
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the amount floored at zero
    pub fn non_negative(&self) -> Self {
        Self(self.0.max(0))
    }

    /// Checked addition that fails when leaving the safe range
    pub fn checked_add(&self, other: Money) -> Result<Money, MoneyError> {
        let sum = self.0.checked_add(other.0).ok_or(MoneyError::ArithmeticOverflow)?;
        Self::from_minor(sum)
    }

    /// Checked subtraction that fails when leaving the safe range
    pub fn checked_sub(&self, other: Money) -> Result<Money, MoneyError> {
        let difference = self.0.checked_sub(other.0).ok_or(MoneyError::ArithmeticOverflow)?;
        Self::from_minor(difference)
    }

    /// Multiplies by an integer factor (e.g., a monthly quota times months)
    pub fn checked_mul(&self, factor: i64) -> Result<Money, MoneyError> {
        let product = self.0.checked_mul(factor).ok_or(MoneyError::ArithmeticOverflow)?;
        Self::from_minor(product)
    }

    /// Sums amounts, failing on the first step that leaves the safe range
    pub fn try_sum<I>(amounts: I) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Formats the amount with the currency symbol, e.g. `€ 1234.56`
    pub fn format(&self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{} {}",
            sign,
            currency.symbol(),
            unsigned_major(self.0.unsigned_abs(), currency.minor_unit_exponent())
        )
    }
}

fn unsigned_major(abs: u64, exponent: u32) -> String {
    if exponent == 0 {
        return abs.to_string();
    }
    let scale = 10_u64.pow(exponent);
    format!(
        "{}.{:0width$}",
        abs / scale,
        abs % scale,
        width = exponent as usize
    )
}

/// Reduces amount text to a plain `[-]digits[.digits]` literal
fn normalize_amount_text(input: &str) -> Option<String> {
    let is_decoration = |c: char| c.is_whitespace() || c.is_alphabetic() || "€$£¥".contains(c);

    let mut text = input.trim_matches(is_decoration);
    let negative = match text.chars().next() {
        Some('-') => true,
        Some('+') => false,
        _ => {
            return split_separators(text, false);
        }
    };
    text = text[1..].trim_matches(is_decoration);
    split_separators(text, negative)
}

fn split_separators(body: &str, negative: bool) -> Option<String> {
    let body: String = body
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if body.is_empty()
        || !body.chars().any(|c| c.is_ascii_digit())
        || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return None;
    }

    let dots = body.matches('.').count();
    let commas = body.matches(',').count();
    let decimal_separator = match (dots, commas) {
        (0, 0) => None,
        (_, 0) if dots == 1 => Some('.'),
        (0, _) if commas == 1 => Some(','),
        (_, 0) | (0, _) => None,
        _ => {
            let last = body.rfind(|c| c == '.' || c == ',')?;
            let separator = body[last..].chars().next()?;
            if body.matches(separator).count() != 1 {
                return None;
            }
            Some(separator)
        }
    };

    let (integer, fraction) = match decimal_separator {
        Some(separator) => {
            let position = body.rfind(separator)?;
            (&body[..position], &body[position + 1..])
        }
        None => (body.as_str(), ""),
    };

    let integer: String = integer.chars().filter(|c| c.is_ascii_digit()).collect();
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let integer = if integer.is_empty() { "0".to_string() } else { integer };
    let sign = if negative { "-" } else { "" };
    if fraction.is_empty() {
        Some(format!("{}{}", sign, integer))
    } else {
        Some(format!("{}{}.{}", sign, integer, fraction))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}", sign, unsigned_major(self.0.unsigned_abs(), 2))
    }
}

impl Neg for Money {
    type Output = Self;

    // The safe range is symmetric, so negation cannot leave it.
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl TryFrom<i64> for Money {
    type Error = MoneyError;

    fn try_from(minor_units: i64) -> Result<Self, Self::Error> {
        Self::from_minor(minor_units)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> i64 {
        money.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050).unwrap();
        assert_eq!(m.minor(), 10050);
        assert_eq!(m.to_decimal(Currency::EUR), dec!(100.50));
    }

    #[test]
    fn test_from_minor_rejects_unsafe_values() {
        assert_eq!(Money::from_minor(MAX_SAFE_MINOR + 1), Err(MoneyError::ArithmeticOverflow));
        assert_eq!(Money::from_minor(-MAX_SAFE_MINOR - 1), Err(MoneyError::ArithmeticOverflow));
        assert!(Money::from_minor(-MAX_SAFE_MINOR).is_ok());
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(0.005), 2).unwrap().minor(), 1);
        assert_eq!(Money::from_decimal(dec!(-0.005), 2).unwrap().minor(), -1);
        assert_eq!(Money::from_decimal(dec!(12.344), 2).unwrap().minor(), 1234);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_minor(10000).unwrap();
        let b = Money::from_minor(5000).unwrap();

        assert_eq!(a.checked_add(b).unwrap().minor(), 15000);
        assert_eq!(b.checked_sub(a).unwrap().minor(), -5000);
        assert_eq!(b.checked_mul(12).unwrap().minor(), 60000);
    }

    #[test]
    fn test_overflow_is_reported() {
        let big = Money::from_minor(MAX_SAFE_MINOR).unwrap();
        let one = Money::from_minor(1).unwrap();
        assert_eq!(big.checked_add(one), Err(MoneyError::ArithmeticOverflow));
        assert_eq!(big.checked_mul(2), Err(MoneyError::ArithmeticOverflow));
    }

    #[test]
    fn test_parse_separators() {
        assert_eq!(Money::parse("1.234,56 €", 2).unwrap().minor(), 123456);
        assert_eq!(Money::parse("1,234.56", 2).unwrap().minor(), 123456);
        assert_eq!(Money::parse("12,5", 2).unwrap().minor(), 1250);
        assert_eq!(Money::parse("1.234.567", 2).unwrap().minor(), 123456700);
    }

    #[test]
    fn test_display_and_format() {
        let m = Money::from_minor(-123456).unwrap();
        assert_eq!(m.to_string(), "-1234.56");
        assert_eq!(m.format(Currency::EUR), "-€ 1234.56");
        assert_eq!(Money::from_minor(500).unwrap().format(Currency::JPY), "¥ 500");
    }
}
