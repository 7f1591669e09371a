//! Money type for representing currency amounts
//!
//! Amounts are kept as unrounded decimals so that a split share multiplied by
//! the participant count reproduces the original total. Rounding to cents
//! happens only when formatting for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Tolerance used when comparing amounts that went through division
pub const EPSILON: f64 = 1e-9;

/// A monetary amount in a single implicit currency
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Create a Money amount from a decimal value
    ///
    /// # Examples
    /// ```
    /// use splitwallet::models::Money;
    /// let amount = Money::new(10.5);
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Get the raw decimal value
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Neither NaN nor infinite
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// A usable expense amount or allowance: finite and strictly positive
    pub fn is_valid_positive(&self) -> bool {
        self.is_finite() && self.is_positive()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Divide evenly into `parts` shares
    ///
    /// Returns `None` when `parts` is zero.
    pub fn split(&self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        Some(Self(self.0 / parts as f64))
    }

    /// Multiply by a participant count
    pub fn times(&self, count: usize) -> Self {
        Self(self.0 * count as f64)
    }

    /// Compare within [`EPSILON`]
    pub fn approx_eq(&self, other: Money) -> bool {
        (self.0 - other.0).abs() <= EPSILON * self.0.abs().max(other.0.abs()).max(1.0)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10", "1,250.75"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };

        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value: f64 = cleaned
            .parse()
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol, rounded to cents
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = (self.0 * 100.0).round() / 100.0;
        if rounded < 0.0 {
            format!("-{}{:.2}", symbol, rounded.abs())
        } else {
            format!("{}{:.2}", symbol, rounded.abs())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::new(10.5).to_string(), "$10.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::new(-50.0).to_string(), "-$50.00");
        assert_eq!(Money::new(0.05).to_string(), "$0.05");
        assert_eq!(Money::new(33.333333).to_string(), "$33.33");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(1000.0);
        let b = Money::new(850.0);

        assert_eq!(a - b, Money::new(150.0));
        assert_eq!(a + b, Money::new(1850.0));
        assert_eq!(-a, Money::new(-1000.0));
    }

    #[test]
    fn test_split_evenly() {
        let share = Money::new(100.0).split(4).unwrap();
        assert_eq!(share, Money::new(25.0));
        assert!(Money::new(100.0).split(0).is_none());
    }

    #[test]
    fn test_split_thirds_sum_back() {
        let total = Money::new(100.0);
        let share = total.split(3).unwrap();
        let sum: Money = std::iter::repeat(share).take(3).sum();
        assert!(sum.approx_eq(total));
        assert!(share.times(3).approx_eq(total));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap(), Money::new(10.5));
        assert_eq!(Money::parse("$10.50").unwrap(), Money::new(10.5));
        assert_eq!(Money::parse("-10.50").unwrap(), Money::new(-10.5));
        assert_eq!(Money::parse("1,250.75").unwrap(), Money::new(1250.75));
        assert_eq!(Money::parse(" 300 ").unwrap(), Money::new(300.0));
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("1e5").is_err());
    }

    #[test]
    fn test_validity() {
        assert!(Money::new(1.0).is_valid_positive());
        assert!(!Money::zero().is_valid_positive());
        assert!(!Money::new(-5.0).is_valid_positive());
        assert!(!Money::new(f64::NAN).is_valid_positive());
        assert!(!Money::new(f64::INFINITY).is_valid_positive());
    }

    #[test]
    fn test_serialization() {
        let m = Money::new(25.0);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "25.0");

        let deserialized: Money = serde_json::from_str("25").unwrap();
        assert_eq!(m, deserialized);
    }
}
