//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An invoice line of 3 × 33.33 must print 99.99, and the paise          │
//! │  shown in the amount-in-words line must match the TOTAL row exactly.   │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 decimals (rust_decimal)                         │
//! │    Arithmetic is exact; rounding to 2 places happens only for display  │
//! │    and for the words line, always with Bankers Rounding.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billforge_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_major_minor(50, 0);
//! let line = price.multiply_quantity(Decimal::from(2));
//! assert_eq!(line.to_string(), "100.00");
//!
//! let big = Money::from_major_minor(1_234_567, 89);
//! assert_eq!(big.to_string(), "1,234,567.89");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in rupees, held as an exact decimal.
///
/// ## Design Decisions
/// - **Signed**: a discount larger than subtotal plus tax yields a negative
///   grand total, which stays representable
/// - **Unrounded**: intermediate results keep full precision; see [`Money::rounded`]
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price × quantity ──► line_total ──► Σ ──► subtotal
///                                                           │
///                 cgst / sgst (calculate_tax) ◄─────────────┤
///                                                           ▼
///                              subtotal + tax − discount = grand_total
///                                                           │
///                              TOTAL row + Amount in Words ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use billforge_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).to_string(), "10.99");
    /// assert_eq!(Money::from_major_minor(-5, 50).to_string(), "-5.50");
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        let paise = if major < 0 {
            major * 100 - minor
        } else {
            major * 100 + minor
        };
        Money(Decimal::new(paise, 2))
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a percentage tax rate to this amount.
    ///
    /// The result is exact (`amount × rate / 100`); no rounding happens
    /// until the value is displayed.
    ///
    /// ## Example
    /// ```rust
    /// use billforge_core::money::Money;
    /// use billforge_core::types::TaxRate;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_major_minor(200, 0);
    /// let cgst = subtotal.calculate_tax(TaxRate::from_percent(Decimal::from(9)));
    /// assert_eq!(cgst, Money::from_major_minor(18, 0));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.percent() / Decimal::ONE_HUNDRED)
    }

    /// Multiplies money by a (possibly fractional) quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Item: Website hosting  unit price 1,500.00
    /// Quantity: 2.5
    ///      │
    ///      ▼
    /// multiply_quantity(2.5) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: 3,750.00
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: Decimal) -> Self {
        Money(self.0 * qty)
    }

    /// Rounds to two decimal places using Bankers Rounding
    /// (round half to even).
    ///
    /// ```text
    ///   0.125 → 0.12     0.135 → 0.14     0.005 → 0.00
    /// ```
    pub fn rounded(&self) -> Money {
        let mut value = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        if value.is_zero() {
            value.set_sign_positive(true);
        }
        Money(value)
    }

    /// Formats with thousands separators and exactly two decimals,
    /// e.g. `1,234,567.89`.
    pub fn format_grouped(&self) -> String {
        let mut value = self.rounded().0;
        let negative = value.is_sign_negative();
        value.set_sign_positive(true);
        value.rescale(2);

        let text = value.to_string();
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut out = String::with_capacity(text.len() + whole.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(whole));
        out.push('.');
        out.push_str(fraction);
        out
    }
}

/// Inserts a comma every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the printed-document format: `1,234.50`, no currency sign.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_grouped())
    }
}

/// Parses a plain decimal such as `"1500"` or `"99.5"`.
impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a decimal quantity.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: Decimal) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).amount(), dec("10.99"));
        assert_eq!(Money::from_major_minor(-5, 50).amount(), dec("-5.50"));
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_major_minor(1_234_567, 89).to_string(), "1,234,567.89");
        assert_eq!(Money::from_major_minor(999, 0).to_string(), "999.00");
        assert_eq!(Money::from_major_minor(1000, 0).to_string(), "1,000.00");
        assert_eq!(Money::from_major_minor(100_000, 5).to_string(), "100,000.05");
        assert_eq!(Money::zero().to_string(), "0.00");
        assert_eq!(Money::from_major_minor(-50, 0).to_string(), "-50.00");
        assert_eq!(Money::from_major_minor(-1_500, 0).to_string(), "-1,500.00");
    }

    #[test]
    fn test_display_rounds_half_even() {
        assert_eq!(Money::new(dec("0.125")).to_string(), "0.12");
        assert_eq!(Money::new(dec("0.135")).to_string(), "0.14");
        assert_eq!(Money::new(dec("2.999")).to_string(), "3.00");
    }

    #[test]
    fn test_tiny_negative_rounds_to_positive_zero() {
        assert_eq!(Money::new(dec("-0.001")).to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major_minor(10, 0);
        let b = Money::from_major_minor(5, 0);

        assert_eq!(a + b, Money::from_major_minor(15, 0));
        assert_eq!(a - b, Money::from_major_minor(5, 0));
        assert_eq!(a * Decimal::from(3), Money::from_major_minor(30, 0));
        assert_eq!(-a, Money::from_major_minor(-10, 0));

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_major_minor(20, 0));
    }

    #[test]
    fn test_decimal_sums_are_exact() {
        let tenth = Money::new(dec("0.1"));
        let fifth = Money::new(dec("0.2"));
        assert_eq!(tenth + fifth, Money::new(dec("0.3")));
    }

    #[test]
    fn test_tax_is_exact() {
        let subtotal = Money::new(dec("333.33"));
        let tax = subtotal.calculate_tax(TaxRate::from_percent(dec("2.5")));
        assert_eq!(tax.amount(), dec("8.33325"));
        assert_eq!(tax.to_string(), "8.33");
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_major_minor(-1, 0);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), Money::from_major_minor(1, 0));
    }

    #[test]
    fn test_parse() {
        assert_eq!(" 1500 ".parse::<Money>().unwrap(), Money::from_major_minor(1500, 0));
        assert!("abc".parse::<Money>().is_err());
    }
}
