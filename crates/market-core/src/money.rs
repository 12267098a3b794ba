//! # Money Module
//!
//! Provides the `Money` and `Percent` types for handling monetary values
//! and discount rates safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  A 70/30 split of $20.00 done in floats needs a rounding tolerance. │
//! │  In integer cents the split is EXACT:                               │
//! │    admin = round(2000 × 7000 / 10000) = 1400                        │
//! │    vendor = 2000 − 1400 = 600                                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents + Basis Points                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use market_core::money::{Money, Percent};
//!
//! let price = Money::from_cents(10_000); // $100.00
//! let rate = Percent::from_bps(1500);    // 15%
//!
//! // 15% of $100.00 = $15.00
//! assert_eq!(rate.of(price).cents(), 1500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate commission math can go negative
///   (a subsidy larger than the commission), and that sign matters
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support, serialized as a plain cent count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use market_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
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

    /// Zero money value.
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

    /// Returns the smaller of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// Subtracts, clamping the result at zero.
    ///
    /// Used for `discounted_price = max(0, original_price − discount_amount)`.
    ///
    /// ## Example
    /// ```rust
    /// use market_core::money::Money;
    ///
    /// let price = Money::from_cents(500);
    /// let discount = Money::from_cents(800);
    /// assert_eq!(price.saturating_sub(discount), Money::zero());
    /// ```
    #[inline]
    pub fn saturating_sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Multiplies by a quantity (line total = unit price × quantity).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Splits this amount proportionally between two weights.
    ///
    /// The first share is rounded half up; the second share is the exact
    /// remainder, so the two shares always sum back to `self`. Both weights
    /// zero yields two zero shares (the caller decides whether that is a
    /// data error).
    ///
    /// ## Example
    /// ```rust
    /// use market_core::money::Money;
    ///
    /// // $20.00 split 70/30
    /// let (admin, vendor) = Money::from_cents(2000).split(7000, 3000);
    /// assert_eq!(admin.cents(), 1400);
    /// assert_eq!(vendor.cents(), 600);
    /// ```
    pub fn split(self, first_weight: u32, second_weight: u32) -> (Money, Money) {
        let total = first_weight as i128 + second_weight as i128;
        if total == 0 {
            return (Money::zero(), Money::zero());
        }

        // Round half up on the first share; remainder keeps the sum exact.
        let first = (self.0 as i128 * first_weight as i128 + total / 2) / total;
        let first = Money::from_cents(first as i64);
        (first, self - first)
    }
}

/// Display implementation shows money in a human-readable format.
///
/// For logs and debugging; the storefront owns real currency formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
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

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (the default platform commission)
///
/// Discount values, commission rates, and promotion cost splits all use this
/// type, so "percentage" means the same thing everywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Percent(u32);

impl Percent {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a percent value (for convenience).
    ///
    /// ## Example
    /// ```rust
    /// use market_core::money::Percent;
    ///
    /// assert_eq!(Percent::from_percentage(12.5).bps(), 1250);
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percent value (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Applies this percentage to an amount, rounding half up to the cent.
    ///
    /// ## Implementation
    /// Integer math: `(cents × bps + 5000) / 10000`. The +5000 provides the
    /// rounding (5000/10000 = 0.5), i128 prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use market_core::money::{Money, Percent};
    ///
    /// let price = Money::from_cents(10_000); // $100.00
    /// let rate = Percent::from_bps(1500);    // 15%
    /// assert_eq!(rate.of(price).cents(), 1500); // $15.00
    /// ```
    pub fn of(&self, amount: Money) -> Money {
        let cents = (amount.cents() as i128 * self.0 as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.percentage())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
