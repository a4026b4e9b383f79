//! # Domain Types
//!
//! Cart-side types shared by pricing, the promotion engine and checkout.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Who Owns What                                   │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │  CartLineItem   │        │    FreeItem     │                        │
//! │  │  ─────────────  │        │  ─────────────  │                        │
//! │  │  cart_item_id   │◄───────│  cart_item_id   │                        │
//! │  │  product_id     │        │  quantity       │                        │
//! │  │  quantity       │        └─────────────────┘                        │
//! │  │  size           │         produced by the engine,                   │
//! │  └─────────────────┘         never written back to the cart            │
//! │   owned by the cart                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are deliberately absent: they come from a
//! [`PriceResolver`](crate::pricing::PriceResolver) at calculation time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Cart Line Item
// =============================================================================

/// One line of a cart.
///
/// `cart_item_id` is stable across recalculations and unique within a cart.
/// `quantity` is a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    pub cart_item_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Chosen size (e.g. `"large"`); only price resolution looks at it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartLineItem {
    /// Creates a line with no size selection.
    pub fn new(cart_item_id: impl Into<String>, product_id: impl Into<String>, quantity: i64) -> Self {
        CartLineItem {
            cart_item_id: cart_item_id.into(),
            product_id: product_id.into(),
            quantity,
            size: None,
        }
    }

    /// Returns the same line with a size selection.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

// =============================================================================
// Free Item
// =============================================================================

/// Units of one cart line granted free by a buy-X-get-Y promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FreeItem {
    pub cart_item_id: String,
    pub quantity: i64,
}
