//! # Promotion Scope
//!
//! Decides which cart lines a promotion may touch.
//!
//! Today every promotion applies to the whole cart, which is what
//! [`AllItems`] does. Per-product or per-category targeting plugs in here as
//! another [`PromotionScope`] without changing the engine.

use super::types::Promotion;
use crate::types::CartLineItem;

/// Strategy returning the eligible subset of a cart for one promotion.
///
/// Implementations must return items in cart order.
pub trait PromotionScope {
    fn eligible_items<'a>(
        &self,
        promotion: &Promotion,
        items: &'a [CartLineItem],
    ) -> Vec<&'a CartLineItem>;
}

/// Every cart line is eligible for every promotion.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllItems;

impl PromotionScope for AllItems {
    fn eligible_items<'a>(
        &self,
        _promotion: &Promotion,
        items: &'a [CartLineItem],
    ) -> Vec<&'a CartLineItem> {
        items.iter().collect()
    }
}
