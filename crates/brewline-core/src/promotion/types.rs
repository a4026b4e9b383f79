//! Promotion catalog entries and the engine's output records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{CartLineItem, FreeItem};

// =============================================================================
// Promotion Type
// =============================================================================

/// The three promotion mechanics.
///
/// ```text
/// BUY_X_GET_Y        buy_quantity / free_quantity   "buy 3, get 1 free"
/// PERCENT_DISCOUNT   discount = percent (0-100)     "10% off everything"
/// FIXED_DISCOUNT     discount = currency amount     "$2 off your order"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PromotionType {
    BuyXGetY,
    PercentDiscount,
    FixedDiscount,
}

impl PromotionType {
    /// Evaluation rank: lower runs first. Buy-X-get-Y claims its free units
    /// before any price-based promotion.
    pub const fn priority(&self) -> u8 {
        match self {
            PromotionType::BuyXGetY => 0,
            PromotionType::PercentDiscount | PromotionType::FixedDiscount => 1,
        }
    }
}

impl std::fmt::Display for PromotionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromotionType::BuyXGetY => write!(f, "BUY_X_GET_Y"),
            PromotionType::PercentDiscount => write!(f, "PERCENT_DISCOUNT"),
            PromotionType::FixedDiscount => write!(f, "FIXED_DISCOUNT"),
        }
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// A promotion as stored by the admin catalog.
///
/// Numeric fields are optional because only some apply to each type. A
/// missing value is treated the same as a non-positive one: the promotion
/// contributes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Promotion {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub promotion_type: PromotionType,
    #[serde(default)]
    pub buy_quantity: Option<i64>,
    #[serde(default)]
    pub free_quantity: Option<i64>,
    /// Percent (0-100) or currency amount depending on `promotion_type`.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub discount: Option<Decimal>,
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Promotion {
    /// Whether this promotion may apply at `now`.
    ///
    /// Requires `is_active` and `start_date <= now <= end_date`, both ends
    /// inclusive.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }
}

// =============================================================================
// Engine Output
// =============================================================================

/// The effect of one promotion on one calculation.
///
/// Built fresh on every call and never mutated afterwards. Checkout reads it
/// to print a receipt line and to sum the order discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PromotionApplication {
    pub promotion_id: String,
    pub promotion_name: String,
    #[serde(rename = "type")]
    pub promotion_type: PromotionType,
    #[ts(as = "String")]
    pub discount_amount: Decimal,
    /// Affected `cart_item_id`s in cart order, each listed once.
    pub applied_to_items: Vec<String>,
    /// Units granted free, buy-X-get-Y only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_items: Option<Vec<FreeItem>>,
}

/// Everything one engine call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PromotionCalculationResult {
    #[ts(as = "String")]
    pub total_discount: Decimal,
    pub applied_promotions: Vec<PromotionApplication>,
    /// The input items, same order, unmodified.
    pub updated_items: Vec<CartLineItem>,
}

impl PromotionCalculationResult {
    /// A result with no discount that passes `items` through.
    pub fn no_discount(items: &[CartLineItem]) -> Self {
        PromotionCalculationResult {
            total_discount: Decimal::ZERO,
            applied_promotions: Vec::new(),
            updated_items: items.to_vec(),
        }
    }

    pub fn has_discount(&self) -> bool {
        !self.applied_promotions.is_empty()
    }
}
