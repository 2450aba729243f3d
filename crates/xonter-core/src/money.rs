//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing a month of transactions amplifies the drift:                   │
//! │    1000 × 0.10 ≠ 100.00 in f64                                          │
//! │                                                                         │
//! │  OUR SOLUTION: 96-bit Decimal (rust_decimal)                            │
//! │    1000 × 0.10 = 100.00 exactly                                         │
//! │    Amounts may carry any scale the database stored                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use xonter_core::money::Money;
//!
//! let rent = Money::from_cents(1_250_00);      // $1250.00
//! let fee: Money = "19.99".parse().unwrap();
//!
//! let total = rent + fee;
//! assert_eq!(total.to_string(), "$1269.99");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in major currency units, stored as a fixed-point decimal.
///
/// ## Design Decisions
/// - **Signed**: balances go negative when expenses exceed income
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serialized as a string**: `"1050.00"`, so no float ever crosses an API
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Transaction.amount ──┬──► FinancialSummary.total_income / expense     │
/// │                       └──► FinancialSummary.balance                     │
/// │                                                                         │
/// │  InventoryItem.sale_price × quantity ──► InventorySummary.total_value  │
/// │                                                                         │
/// │  Employee.salary ──► displayed as-is                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an existing decimal value.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (hundredths of the major unit).
    ///
    /// ## Example
    /// ```rust
    /// use xonter_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
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

    /// Multiplies money by a quantity.
    ///
    /// Saturates at the `Decimal` bounds instead of panicking.
    ///
    /// ## Example
    /// ```rust
    /// use xonter_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_value = unit_price.multiply_quantity(3);
    /// assert_eq!(line_value, Money::from_cents(897));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }

    /// Adds two amounts, clamping to the representable range.
    #[inline]
    pub fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtracts two amounts, clamping to the representable range.
    #[inline]
    pub fn saturating_sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// The largest representable amount.
    pub const MAX: Money = Money(Decimal::MAX);

    /// The smallest (most negative) representable amount.
    pub const MIN: Money = Money(Decimal::MIN);

    /// Rounds to whole cents using Bankers Rounding (round half to even).
    ///
    /// ## Bankers Rounding
    /// ```text
    ///   0.125 → 0.12      0.135 → 0.14      0.145 → 0.14
    /// ```
    /// Halves alternate direction, so rounding many stored amounts does not
    /// drift the total up or down.
    ///
    /// Aggregations never call this; it is for callers that must persist or
    /// display exactly two decimal places.
    pub fn round_to_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        )
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses plain decimal text such as `"1050"`, `"19.99"` or `"-3.5"`.
///
/// Form input arrives as text; unlike `parseFloat`, garbage is rejected
/// instead of silently becoming `NaN`.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        Decimal::from_str(trimmed)
            .map(Money)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("'{}' is not a decimal number", trimmed),
            })
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money with at least two decimal places.
///
/// ## Note
/// This is for debugging and logs. Currency symbols, grouping and locale
/// belong to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let mut magnitude = self.0.abs().normalize();
        if magnitude.scale() < 2 {
            magnitude.rescale(2);
        }
        write!(f, "{}${}", sign, magnitude)
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

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Sums saturate like [`Money::saturating_add`].
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
        assert_eq!(Money::from_cents(-550).amount(), dec!(-5.50));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_major(5).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::new(dec!(0.125)).to_string(), "$0.125");
    }

    #[test]
    fn test_parse() {
        assert_eq!("19.99".parse::<Money>().unwrap(), Money::from_cents(1999));
        assert_eq!(" 1050 ".parse::<Money>().unwrap(), Money::from_major(1050));
        assert!(matches!(
            "".parse::<Money>(),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            "abc".parse::<Money>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(1000);
        let b = Money::from_major(300);

        assert_eq!(a + b, Money::from_major(1300));
        assert_eq!(b - a, Money::from_major(-700));
        assert_eq!(a * 3, Money::from_major(3000));
        assert_eq!(-b, Money::from_major(-300));
    }

    #[test]
    fn test_scale_does_not_affect_equality() {
        assert_eq!(Money::new(dec!(1050)), Money::new(dec!(1050.00)));
    }

    #[test]
    fn test_sum_has_no_float_drift() {
        let dime = Money::from_cents(10);
        let total: Money = std::iter::repeat(dime).take(1000).sum();
        assert_eq!(total, Money::from_major(100));

        let amounts = vec![Money::from_cents(10), Money::from_cents(20)];
        let borrowed: Money = amounts.iter().sum();
        assert_eq!(borrowed, Money::from_cents(30));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), Money::from_cents(100));
    }

    #[test]
    fn test_round_to_cents_is_bankers() {
        assert_eq!(Money::new(dec!(0.125)).round_to_cents(), Money::from_cents(12));
        assert_eq!(Money::new(dec!(0.135)).round_to_cents(), Money::from_cents(14));
        assert_eq!(Money::new(dec!(10.999)).round_to_cents(), Money::from_cents(1100));
    }

    #[test]
    fn test_saturating_arithmetic_at_the_bounds() {
        assert_eq!(Money::MAX.saturating_add(Money::from_major(1)), Money::MAX);
        assert_eq!(Money::MIN.saturating_sub(Money::from_major(1)), Money::MIN);
        assert_eq!(Money::MAX.checked_add(Money::from_major(1)), None);
        assert_eq!(
            Money::from_major(100_000_000_000).multiply_quantity(i64::MAX),
            Money::MAX
        );
        assert_eq!(
            Money::from_major(-1).multiply_quantity(i64::MAX),
            Money::new(Decimal::from(-i64::MAX))
        );

        let total: Money = [Money::MAX, Money::MAX].into_iter().sum();
        assert_eq!(total, Money::MAX);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(1050)).unwrap();
        assert_eq!(json, "\"10.50\"");
    }
}
