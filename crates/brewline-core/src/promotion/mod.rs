//! Promotion Engine Module
//!
//! Buy-X-get-Y, percent and fixed promotions applied to a cart.
//! Pure: the caller supplies items, promotions, pricing and `now`.

mod engine;
pub mod scope;
mod types;
pub mod window;

pub use engine::*;
pub use scope::{AllItems, PromotionScope};
pub use types::*;
pub use window::evaluation_order;
