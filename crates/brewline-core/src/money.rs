//! # Money Module
//!
//! Provides the `Money` type for settled monetary values (integer cents) and
//! the bridge to `Decimal`, which the promotion engine uses for exact math.
//!
//! ## Two Representations, One Rounding Point
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE EACH TYPE LIVES                                                  │
//! │                                                                         │
//! │  Decimal (exact, unbounded scale)                                       │
//! │    unit prices ──► promotion engine ──► discount amounts ──► subtotal   │
//! │    10% of $4.45 x 3 = $1.335  (kept exactly, never rounded mid-way)     │
//! │                                                                         │
//! │  Money (i64 cents)                                                      │
//! │    checkout totals ──► receipt ──► order record                         │
//! │    $1.335 ──► banker's rounding ──► 134 cents                           │
//! │                                                                         │
//! │  Money::from_decimal is the ONLY place rounding happens.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brewline_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(450); // $4.50
//!
//! // Exact math happens in Decimal, rounding happens once at the end
//! let discount = price.to_decimal() * Decimal::new(15, 2); // 0.675
//! assert_eq!(Money::from_decimal(discount).cents(), 68);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::ops::Sub;
use ts_rs::TS;

/// Number of minor units (cents) kept by `Money`.
pub const CENT_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use brewline_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds an exact decimal amount to whole cents.
    ///
    /// Uses banker's rounding (half to even) so that repeated rounding of
    /// receipt lines does not drift in one direction. Amounts beyond the
    /// `i64` cent range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use brewline_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(1645, 3)).cents(), 164); // 1.645
    /// assert_eq!(Money::from_decimal(Decimal::new(1655, 3)).cents(), 166); // 1.655
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let rounded =
            amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointNearestEven);
        let cents = rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.trunc().to_i64());
        match cents {
            Some(value) => Money(value),
            None if amount.is_sign_negative() => Money(i64::MIN),
            None => Money(i64::MAX),
        }
    }

    /// Returns the exact decimal value (e.g. 1099 cents → `10.99`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, CENT_SCALE)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Subtraction saturates at the `i64` cent range.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
