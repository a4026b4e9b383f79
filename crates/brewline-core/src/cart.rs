//! # Cart
//!
//! The ordered list of lines the promotion engine runs against.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action        Method                  Cart Change           │
//! │  ─────────────────        ──────                  ───────────           │
//! │                                                                         │
//! │  Add drink ──────────────► add_item() ──────────► push or merge line    │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ───► line.qty = n          │
//! │                                                                         │
//! │  Remove ─────────────────► remove_item() ───────► line removed          │
//! │                                                                         │
//! │  Checkout done ──────────► clear() ─────────────► empty                 │
//! │                                                                         │
//! │  Line order is insertion order and never changes: buy-X-get-Y           │
//! │  attributes free units by that order.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::pricing::{self, PriceResolver};
use crate::types::CartLineItem;
use crate::validation::{validate_cart_item_id, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
///
/// ## Invariants
/// - `cart_item_id`s are unique
/// - Lines are unique by (product, size): adding again increases quantity
/// - Quantity is within `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from existing lines (e.g. a stored session), checking
    /// every invariant.
    pub fn from_items(items: Vec<CartLineItem>) -> CoreResult<Self> {
        if items.len() > MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        for (index, item) in items.iter().enumerate() {
            validate_cart_item_id(&item.cart_item_id)?;
            check_quantity(item.quantity)?;
            if items[..index]
                .iter()
                .any(|earlier| earlier.cart_item_id == item.cart_item_id)
            {
                return Err(CoreError::DuplicateCartItem(item.cart_item_id.clone()));
            }
        }

        Ok(Cart { items })
    }

    /// Adds a product (optionally sized) and returns the line's id.
    ///
    /// ## Behavior
    /// - Same product and size already in cart: quantity increases
    /// - Otherwise: a new line with a fresh UUID v4 id is appended
    pub fn add_item(
        &mut self,
        product_id: &str,
        size: Option<&str>,
        quantity: i64,
    ) -> CoreResult<String> {
        check_quantity(quantity)?;

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id && i.size.as_deref() == size)
        {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(item.cart_item_id.clone());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        let cart_item_id = Uuid::new_v4().to_string();
        self.items.push(CartLineItem {
            cart_item_id: cart_item_id.clone(),
            product_id: product_id.to_string(),
            quantity,
            size: size.map(str::to_string),
        });
        Ok(cart_item_id)
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn update_quantity(&mut self, cart_item_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(cart_item_id);
        }
        check_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.cart_item_id == cart_item_id)
            .ok_or_else(|| CoreError::CartItemNotFound(cart_item_id.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Removes a line by id.
    pub fn remove_item(&mut self, cart_item_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.cart_item_id != cart_item_id);

        if self.items.len() == initial_len {
            Err(CoreError::CartItemNotFound(cart_item_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact subtotal before promotions.
    pub fn subtotal<P>(&self, resolver: &P) -> Decimal
    where
        P: PriceResolver + ?Sized,
    {
        pricing::subtotal(resolver, &self.items)
    }
}

/// Quantity rules with the over-limit case reported as `QuantityTooLarge`.
fn check_quantity(quantity: i64) -> CoreResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    validate_quantity(quantity)?;
    Ok(())
}
