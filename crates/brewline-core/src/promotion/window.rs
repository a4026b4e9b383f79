//! Active-window filtering and evaluation order.

use chrono::{DateTime, Utc};

use super::types::Promotion;

/// Keeps promotions that are flagged active and whose window contains `now`.
///
/// Input order is kept; nothing is sorted here.
pub fn active_promotions(promotions: &[Promotion], now: DateTime<Utc>) -> Vec<&Promotion> {
    promotions.iter().filter(|p| p.is_active_at(now)).collect()
}

/// Orders promotions for evaluation: every buy-X-get-Y first, then the rest.
///
/// The sort is stable, so promotions of the same rank keep their catalog
/// order. Nothing else (value, recency) influences the order.
pub fn prioritize(mut promotions: Vec<&Promotion>) -> Vec<&Promotion> {
    promotions.sort_by_key(|p| p.promotion_type.priority());
    promotions
}

/// [`active_promotions`] followed by [`prioritize`].
pub fn evaluation_order(promotions: &[Promotion], now: DateTime<Utc>) -> Vec<&Promotion> {
    prioritize(active_promotions(promotions, now))
}
