//! # brewline-core: Pure Checkout Logic for Brewline
//!
//! This crate is the **heart** of the Brewline storefront. It holds the cart,
//! price resolution, the promotion engine and the checkout summary as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Brewline Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Storefront / admin dashboard / brewline CLI              │   │
//! │  │    Menu ──► Cart ──► Promotions preview ──► Checkout            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ items, promotions, now                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ brewline-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  pricing  │  │ promotion │  │ checkout  │  │   │
//! │  │   │   Cart    │  │ Resolver  │  │  engine   │  │  Summary  │  │   │
//! │  │   │ LineItem  │  │ MenuPrice │  │  window   │  │  Receipt  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart line and free-item records
//! - [`money`] - Integer-cent Money for display, banker's rounding
//! - [`pricing`] - `PriceResolver` seam and the `MenuPricing` table
//! - [`cart`] - Cart operations and invariants
//! - [`promotion`] - The promotion engine
//! - [`checkout`] - Subtotal, discount and total for an order
//! - [`error`] - Domain error types
//! - [`validation`] - Input and promotion-body validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Same items, promotions, prices and `now` give the same result
//! 2. **No I/O**: Database, network, file system and wall clock stay outside
//! 3. **Exact Math**: Discounts are `Decimal`; rounding happens once, at display
//! 4. **Explicit Errors**: Cart errors are typed; the engine itself never fails
//!
//! ## Example Usage
//!
//! ```rust
//! use brewline_core::{calculate, CartLineItem, MenuPricing, Promotion, PromotionType};
//! use chrono::{Duration, Utc};
//! use rust_decimal::Decimal;
//!
//! let menu = MenuPricing::new().with_product("latte", Decimal::new(450, 2));
//! let items = vec![CartLineItem::new("line-1", "latte", 3)];
//!
//! let now = Utc::now();
//! let promotions = vec![Promotion {
//!     id: "bogo".to_string(),
//!     name: "Buy 2 Get 1".to_string(),
//!     description: None,
//!     promotion_type: PromotionType::BuyXGetY,
//!     buy_quantity: Some(2),
//!     free_quantity: Some(1),
//!     discount: None,
//!     start_date: now - Duration::days(1),
//!     end_date: now + Duration::days(1),
//!     is_active: true,
//! }];
//!
//! let result = calculate(&items, Some(&promotions), &menu, now);
//! assert_eq!(result.total_discount, Decimal::new(450, 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod promotion;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use checkout::{CheckoutSummary, ReceiptLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{MenuPricing, PriceResolver};
pub use promotion::{
    calculate, calculate_with_scope, AllItems, Promotion, PromotionApplication,
    PromotionCalculationResult, PromotionScope, PromotionType,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 100 instead of 10 at the counter).
pub const MAX_ITEM_QUANTITY: i64 = 999;
