//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                     │
//! │                                                                 │
//! │  In floating point:  0.1 + 0.2 = 0.30000000000000004            │
//! │                                                                 │
//! │  OUR SOLUTION: integer cents                                    │
//! │    $10.99 is 1099, line totals are exact integer products,      │
//! │    and order totals are exact integer sums.                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every monetary value in the system flows through this type: catalog
//! prices, cart line totals, captured order-line prices and report sums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: sums and differences stay closed under the type
/// - **Single-field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
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

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a `d`, `d.c` or `d.cc` amount (optional leading `$`) into
    /// cents, without going through floating point.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10.99"), Some(Money::from_cents(1099)));
    /// assert_eq!(Money::parse("$5"), Some(Money::from_cents(500)));
    /// assert_eq!(Money::parse("2.5"), Some(Money::from_cents(250)));
    /// assert_eq!(Money::parse("1.999"), None); // sub-cent precision
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let s = s.strip_prefix('$').unwrap_or(s);
        let (sign, s) = match s.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, s),
        };

        let (dollars_part, cents_part) = match s.split_once('.') {
            Some((d, c)) => (d, c),
            None => (s, ""),
        };
        if dollars_part.is_empty() && cents_part.is_empty() {
            return None;
        }

        let dollars: i64 = if dollars_part.is_empty() {
            0
        } else if dollars_part.bytes().all(|b| b.is_ascii_digit()) {
            dollars_part.parse().ok()?
        } else {
            return None;
        };

        let cents: i64 = match cents_part.len() {
            0 => 0,
            1 | 2 if cents_part.bytes().all(|b| b.is_ascii_digit()) => {
                let c: i64 = cents_part.parse().ok()?;
                if cents_part.len() == 1 {
                    c * 10
                } else {
                    c
                }
            }
            _ => return None,
        };

        Some(Money(sign * (dollars.checked_mul(100)?.checked_add(cents)?)))
    }

    /// Multiplies a unit price by a quantity to produce a line total.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.times(3).cents(), 897); // $8.97
    /// ```
    #[inline]
    pub const fn times(&self, quantity: i64) -> Self {
        Money(self.0 * quantity)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable `$d.cc` rendering, used by the terminal for prices,
/// line totals and report sums.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
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

/// Summing an iterator of line totals yields an order total.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
