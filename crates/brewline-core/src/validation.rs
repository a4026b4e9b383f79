//! # Validation Module
//!
//! Input validation for cart lines and admin promotion bodies.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Admin dashboard ──► validate_promotion() ──► promotion catalog         │
//! │                      rejects bad bodies before they are stored          │
//! │                                                                         │
//! │  Storefront cart ──► validate_quantity() ───► Cart                      │
//! │                                                                         │
//! │  Menu load ────────► validate_price() ──────► MenuPricing::validate     │
//! │                                                                         │
//! │  Promotion engine ── NO validation ──────────► skips what it can't use  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brewline_core::validation::{validate_quantity, validate_promotion_name};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_promotion_name("").is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::promotion::{Promotion, PromotionType};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest promotion name the receipt printer can show on one line.
pub const MAX_PROMOTION_NAME_LEN: usize = 100;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free refills, water).
///
/// `field` names the offending entry in the error, e.g. `products.latte`.
pub fn validate_price(field: &str, price: Decimal) -> ValidationResult<()> {
    if price < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a cart line id: any non-blank string.
pub fn validate_cart_item_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "cartItemId".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Promotion Validators
// =============================================================================

/// Validates a promotion name: required, at most 100 characters.
pub fn validate_promotion_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PROMOTION_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PROMOTION_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a promotion body from the admin dashboard.
///
/// ## Rules
/// ```text
/// all types          id and name present, start_date <= end_date
/// BUY_X_GET_Y        buy_quantity > 0, free_quantity > 0
/// PERCENT_DISCOUNT   0 < discount <= 100
/// FIXED_DISCOUNT     discount > 0
/// ```
///
/// Fields that do not belong to the type are ignored.
pub fn validate_promotion(promotion: &Promotion) -> ValidationResult<()> {
    if promotion.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    validate_promotion_name(&promotion.name)?;

    if promotion.end_date < promotion.start_date {
        return Err(ValidationError::InvalidDateRange {
            field: "endDate".to_string(),
            other: "startDate".to_string(),
        });
    }

    match promotion.promotion_type {
        PromotionType::BuyXGetY => {
            require_positive_count(promotion.buy_quantity, "buyQuantity")?;
            require_positive_count(promotion.free_quantity, "freeQuantity")?;
        }
        PromotionType::PercentDiscount => {
            let percent = require_positive_amount(promotion.discount, "discount")?;
            if percent > Decimal::ONE_HUNDRED {
                return Err(ValidationError::OutOfRange {
                    field: "discount".to_string(),
                    min: 0,
                    max: 100,
                });
            }
        }
        PromotionType::FixedDiscount => {
            require_positive_amount(promotion.discount, "discount")?;
        }
    }

    Ok(())
}

fn require_positive_count(value: Option<i64>, field: &str) -> ValidationResult<i64> {
    match value {
        None => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        Some(v) if v <= 0 => Err(ValidationError::MustBePositive {
            field: field.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

fn require_positive_amount(value: Option<Decimal>, field: &str) -> ValidationResult<Decimal> {
    match value {
        None => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        Some(v) if v <= Decimal::ZERO => Err(ValidationError::MustBePositive {
            field: field.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
