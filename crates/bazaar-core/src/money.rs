//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A 15% discount on $10.00 computed in floats can come out as            │
//! │  $8.499999999999998 — and a customer disputes a penny.                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every price, discount amount, and total is an i64 in the             │
//! │    currency's minor unit. Rounding happens exactly once, at the         │
//! │    discount boundary, using round-half-up.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//! use bazaar_core::types::DiscountPercent;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(10_000); // $100.00
//!
//! // Apply a 30% discount
//! let final_price = price.apply_discount(DiscountPercent::from_bps(3000));
//! assert_eq!(final_price.cents(), 7_000); // $70.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::DiscountPercent;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative intermediate values (e.g. differences)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price_cents ──► unit base price                               │
/// │        │                                                               │
/// │        ▼                                                               │
/// │  apply_discount(percent) ──► unit final price ──► line total           │
/// │        │                                                               │
/// │        ▼                                                               │
/// │  order_items.unit_price_cents / orders.total_cents                     │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a percentage discount and returns the final price.
    ///
    /// ## Rounding Contract
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  final = base × (1 − percent/100), rounded HALF-UP to the minor     │
    /// │  unit. The rounding is applied to the FINAL PRICE, not to the       │
    /// │  discount amount — the two disagree exactly on .5 fractions:        │
    /// │                                                                     │
    /// │    base $1.05, 10% off                                              │
    /// │    discount-amount rounding:  1.05 − round(0.105) = $0.94           │
    /// │    final-price rounding:      round(0.945)         = $0.95  ✅      │
    /// │                                                                     │
    /// │  The discount amount is then derived as base − final so that the   │
    /// │  breakdown always sums exactly.                                     │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// The result is clamped to the `[0, base]` range: a discounted price is
    /// never negative and never exceeds the base price.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    /// use bazaar_core::types::DiscountPercent;
    ///
    /// let base = Money::from_cents(10_000); // $100.00
    /// let discounted = base.apply_discount(DiscountPercent::from_bps(3000)); // 30% off
    /// assert_eq!(discounted.cents(), 7_000); // $70.00
    /// ```
    pub fn apply_discount(&self, percent: DiscountPercent) -> Money {
        // Use i128 to prevent overflow on large amounts.
        // percent.bps() is basis points: 3000 = 30%.
        // Formula: final = base * (10000 - bps) / 10000
        // With half-up rounding: (base * (10000 - bps) + 5000) / 10000
        let keep_bps = (10_000 - percent.bps().min(10_000)) as i128;
        let final_cents = (self.0 as i128 * keep_bps + 5_000) / 10_000;
        let final_cents = (final_cents as i64).clamp(0, self.0.max(0));
        Money::from_cents(final_cents)
    }

    /// Returns the discount amount for a percentage, i.e. `base - final`.
    ///
    /// Derived from [`Money::apply_discount`] so that
    /// `discount_amount + final price == base price` always holds exactly.
    pub fn discount_amount(&self, percent: DiscountPercent) -> Money {
        *self - self.apply_discount(percent)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(7_000); // $70.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 14_000); // $140.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. The resource layer formats for locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_apply_discount_exact() {
        // $100.00 at 30% off = $70.00, no rounding involved
        let base = Money::from_cents(10_000);
        let discounted = base.apply_discount(DiscountPercent::from_bps(3000));
        assert_eq!(discounted.cents(), 7_000);
    }

    #[test]
    fn test_apply_discount_rounds_final_price_half_up() {
        // $3.33 at 50% off = $1.665 → $1.67 (half-up on the final price)
        let base = Money::from_cents(333);
        let discounted = base.apply_discount(DiscountPercent::from_bps(5000));
        assert_eq!(discounted.cents(), 167);

        // $1.05 at 10% off = $0.945 → $0.95
        // (discount-amount rounding would give $0.94 — documented difference)
        let base = Money::from_cents(105);
        let discounted = base.apply_discount(DiscountPercent::from_bps(1000));
        assert_eq!(discounted.cents(), 95);
    }

    #[test]
    fn test_discount_amount_sums_with_final() {
        for cents in [0, 1, 99, 105, 333, 10_000, 123_456_789] {
            for bps in [0, 1, 825, 1000, 5000, 9999, 10_000] {
                let base = Money::from_cents(cents);
                let pct = DiscountPercent::from_bps(bps);
                assert_eq!(
                    base.discount_amount(pct) + base.apply_discount(pct),
                    base
                );
            }
        }
    }

    #[test]
    fn test_apply_discount_bounds() {
        let base = Money::from_cents(1099);

        // 0% leaves the price untouched
        assert_eq!(base.apply_discount(DiscountPercent::zero()), base);

        // 100% floors at zero, never negative
        let free = base.apply_discount(DiscountPercent::from_bps(10_000));
        assert_eq!(free.cents(), 0);

        // Never exceeds the base price
        for bps in [0, 500, 5000, 10_000] {
            let discounted = base.apply_discount(DiscountPercent::from_bps(bps));
            assert!(discounted.cents() >= 0);
            assert!(discounted <= base);
        }
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(7_000);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.cents(), 14_000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(!negative.is_zero());
        assert!(negative.is_negative());
    }
}
