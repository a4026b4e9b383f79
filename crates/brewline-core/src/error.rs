//! # Error Types
//!
//! Domain-specific error types for brewline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brewline-core errors (this file)                                       │
//! │  ├── CoreError        - Cart / checkout rule violations                 │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  brewline-cli errors (binary)                                           │
//! │  ├── ConfigError      - Configuration loading                           │
//! │  └── anyhow::Error    - Everything surfaced to the terminal             │
//! │                                                                         │
//! │  The promotion engine has NO error type: it never fails.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (cart item id, field, limits)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Raised by cart operations. Checkout and promotion calculation do not
/// produce errors; a bad promotion simply contributes no discount.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line in the cart carries this id.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// Two lines share a `cart_item_id`.
    #[error("Duplicate cart item id: {0}")]
    DuplicateCartItem(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used by the cart and by admin-side promotion validation before anything
/// is stored.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The active window ends before it starts.
    #[error("{field} must not be before {other}")]
    InvalidDateRange { field: String, other: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
