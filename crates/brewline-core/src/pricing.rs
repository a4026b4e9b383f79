//! # Pricing Module
//!
//! Price resolution for cart lines.
//!
//! Cart lines never carry a price. Whoever runs a calculation hands in a
//! [`PriceResolver`] that knows the menu: base price, size modifiers and so
//! on. The promotion engine and checkout only ever ask it one question:
//! "what does one unit of this line cost right now, before promotions?"
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartLineItem { product: "latte", size: "large", qty: 2 }               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolver.unit_price(item)                                              │
//! │       │   base("latte") = 4.50                                          │
//! │       │ + modifier("large") = 0.75                                      │
//! │       ▼                                                                 │
//! │  5.25 per unit ──► line_total = 10.50                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any `Fn(&CartLineItem) -> Decimal` is a resolver, so tests and callers
//! with their own pricing rules can pass a closure.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::CartLineItem;
use crate::validation::{validate_price, ValidationResult};

// =============================================================================
// Price Resolver
// =============================================================================

/// Resolves the non-negative unit price of a cart line, excluding promotions.
pub trait PriceResolver {
    fn unit_price(&self, item: &CartLineItem) -> Decimal;
}

impl<F> PriceResolver for F
where
    F: Fn(&CartLineItem) -> Decimal,
{
    fn unit_price(&self, item: &CartLineItem) -> Decimal {
        self(item)
    }
}

/// Unit price times quantity, exact. Saturates at `Decimal::MAX`.
pub fn line_total<P>(resolver: &P, item: &CartLineItem) -> Decimal
where
    P: PriceResolver + ?Sized,
{
    resolver
        .unit_price(item)
        .saturating_mul(Decimal::from(item.quantity))
}

/// Unit price times quantity, or `None` when the product overflows.
pub fn checked_line_total<P>(resolver: &P, item: &CartLineItem) -> Option<Decimal>
where
    P: PriceResolver + ?Sized,
{
    resolver
        .unit_price(item)
        .checked_mul(Decimal::from(item.quantity))
}

/// Sum of [`line_total`] over every line. Saturates at `Decimal::MAX`.
pub fn subtotal<P>(resolver: &P, items: &[CartLineItem]) -> Decimal
where
    P: PriceResolver + ?Sized,
{
    items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(line_total(resolver, item)))
}

// =============================================================================
// Menu Pricing
// =============================================================================

/// In-memory menu: base price per product plus a modifier per size.
///
/// ## Resolution Rules
/// - Unknown product → `0` (logged at `warn`)
/// - Unknown or missing size → no modifier
/// - Result below zero (large negative modifier) → `0`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPricing {
    #[serde(default)]
    products: HashMap<String, Decimal>,
    #[serde(default)]
    sizes: HashMap<String, Decimal>,
}

impl MenuPricing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a product's base price.
    pub fn with_product(mut self, product_id: impl Into<String>, base_price: Decimal) -> Self {
        self.products.insert(product_id.into(), base_price);
        self
    }

    /// Adds (or replaces) a size modifier. Modifiers may be negative.
    pub fn with_size(mut self, size: impl Into<String>, modifier: Decimal) -> Self {
        self.sizes.insert(size.into(), modifier);
        self
    }

    pub fn base_price(&self, product_id: &str) -> Option<Decimal> {
        self.products.get(product_id).copied()
    }

    pub fn size_modifier(&self, size: &str) -> Option<Decimal> {
        self.sizes.get(size).copied()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Checks every base price is non-negative. Size modifiers may be
    /// negative and are not checked.
    ///
    /// Products are checked in id order so the reported one is stable.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut entries: Vec<(&String, &Decimal)> = self.products.iter().collect();
        entries.sort_by_key(|(product_id, _)| *product_id);

        for (product_id, price) in entries {
            validate_price(&format!("products.{}", product_id), *price)?;
        }

        Ok(())
    }
}

impl PriceResolver for MenuPricing {
    fn unit_price(&self, item: &CartLineItem) -> Decimal {
        let Some(base) = self.base_price(&item.product_id) else {
            warn!(
                product_id = %item.product_id,
                cart_item_id = %item.cart_item_id,
                "No menu price for product, pricing at zero"
            );
            return Decimal::ZERO;
        };

        let modifier = item
            .size
            .as_deref()
            .and_then(|size| self.size_modifier(size))
            .unwrap_or(Decimal::ZERO);

        base.saturating_add(modifier).max(Decimal::ZERO)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
