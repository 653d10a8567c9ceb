//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The machine only ever sees whole coins (1, 2, 5 ...).                  │
//! │                                                                         │
//! │  Prices, bills, inserted totals and change are therefore counted in     │
//! │  the smallest coin unit as an i64. There is no fractional amount        │
//! │  anywhere in the system, so there is nothing to round.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vend_core::money::Money;
//!
//! let price = Money::from_units(3);
//!
//! let total = price.multiply_quantity(2).unwrap();   // 6
//! let change = Money::from_units(10) - total;        // 4
//! assert_eq!(change.units(), 4);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value counted in the smallest coin unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic on differences (change, remaining) never
///   needs a separate type; validation keeps prices non-negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Channel.price ──► Purchase.total ──► Basket.total ──► PaymentSession.owed
///                                                              │
///                                       coins ──► inserted ────┴──► change
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole units.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::money::Money;
    ///
    /// let price = Money::from_units(5);
    /// assert_eq!(price.units(), 5);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::money::Money;
    ///
    /// let unit_price = Money::from_units(3);
    /// assert_eq!(unit_price.multiply_quantity(2), Some(Money::from_units(6)));
    /// assert_eq!(Money::from_units(i64::MAX).multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Option<Self> {
        match self.0.checked_mul(qty as i64) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Adds, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Adds, stopping at the largest representable amount.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtracts, stopping at zero instead of going negative.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::money::Money;
    ///
    /// let owed = Money::from_units(4);
    /// assert_eq!(owed.saturating_sub(Money::from_units(6)), Money::zero());
    /// ```
    #[inline]
    pub fn saturating_sub(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain unit count; currency symbols are a presentation concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

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


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(7);
        assert_eq!(money.units(), 7);
        assert_eq!(money.to_string(), "7");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(10);
        let b = Money::from_units(7);

        assert_eq!((a + b).units(), 17);
        assert_eq!((a - b).units(), 3);
        assert_eq!(b.multiply_quantity(3), Some(Money::from_units(21)));

        let mut c = a;
        c += b;
        c -= Money::from_units(2);
        assert_eq!(c.units(), 15);
    }

    #[test]
    fn test_overflow_is_reported_not_wrapped() {
        let huge = Money::from_units(i64::MAX);
        assert_eq!(huge.multiply_quantity(2), None);
        assert_eq!(huge.multiply_quantity(1), Some(huge));
        assert_eq!(huge.checked_add(Money::from_units(1)), None);
        assert_eq!(huge.saturating_add(Money::from_units(1)), huge);
        assert_eq!(Money::zero().multiply_quantity(u32::MAX), Some(Money::zero()));
    }

    #[test]
    fn test_saturating_sub_stops_at_zero() {
        let owed = Money::from_units(3);
        assert_eq!(owed.saturating_sub(Money::from_units(1)).units(), 2);
        assert_eq!(owed.saturating_sub(Money::from_units(9)), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_units(1).is_positive());
        assert!(Money::from_units(-1).is_negative());
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_units(6)).unwrap();
        assert_eq!(json, "6");
    }
}
