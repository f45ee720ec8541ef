//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In the web client:                                                     │
//! │    39000 * (1 - 15 / 100) = 33149.999999999996  ❌                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + basis points                       │
//! │    39000 - (39000 * 1500 + 5000) / 10000 = 33150                        │
//! │    Rounding happens once, explicitly, half up                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The minor unit is the smallest unit of the configured currency: one đồng
//! for VND (no subdivision), one cent for USD.
//!
//! ## Usage
//! ```rust
//! use foodhub_core::money::Money;
//!
//! let price = Money::from_minor(50_000); // 50.000đ
//!
//! let doubled = price * 2;
//! let total = price + Money::from_minor(15_000);
//! assert_eq!(doubled.minor_units(), 100_000);
//! assert_eq!(total.minor_units(), 65_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::Percentage;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results (`subtotal + fee - discount`)
///   may dip below zero before being floored
/// - **Serialized as a plain JSON integer**: matches the remote API
///
/// ## Where Money Flows
/// ```text
/// Food.price ──► LineItem.price ──► effective price ──► line total
///                                                            │
///                                   Σ lines = Cart subtotal ◄┘
///                                             │
///           Voucher discount ◄────────────────┤
///           Shipping fee ─────────────────────┤
///                                             ▼
///                                       OrderTotals
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use foodhub_core::money::Money;
    ///
    /// let price = Money::from_minor(55_000);
    /// assert_eq!(price.minor_units(), 55_000);
    /// ```
    #[inline]
    pub const fn from_minor(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
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

    /// Floors the value at zero.
    ///
    /// ## Example
    /// ```rust
    /// use foodhub_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(-4_000).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_minor(4_000).floor_zero().minor_units(), 4_000);
    /// ```
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Returns `rate` of this amount, rounded half up.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use foodhub_core::money::Money;
    /// use foodhub_core::types::Percentage;
    ///
    /// let subtotal = Money::from_minor(100_000);
    /// let ten_percent = subtotal.percentage_of(Percentage::from_bps(1000));
    /// assert_eq!(ten_percent.minor_units(), 10_000);
    /// ```
    pub fn percentage_of(&self, rate: Percentage) -> Money {
        let part = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_minor(part as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use foodhub_core::money::Money;
    /// use foodhub_core::types::Percentage;
    ///
    /// let price = Money::from_minor(100_000);
    /// let discounted = price.apply_percentage_discount(Percentage::from_bps(2000)); // 20%
    /// assert_eq!(discounted.minor_units(), 80_000);
    /// ```
    pub fn apply_percentage_discount(&self, rate: Percentage) -> Money {
        *self - self.percentage_of(rate)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use foodhub_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(25_000);
    /// assert_eq!(unit_price.multiply_quantity(3).minor_units(), 75_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Digits grouped by thousands, e.g. `100,000`.
///
/// ## Note
/// This is for logs and debugging. Currency symbols and locale-specific
/// separators are the web client's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}", sign, grouped)
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

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
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
