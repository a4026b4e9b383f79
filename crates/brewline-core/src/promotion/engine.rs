//! # Promotion Engine
//!
//! Computes which active promotions apply to a cart and how much each one
//! takes off.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ─┐                                                               │
//! │         │   1. active filter   is_active && start <= now <= end         │
//! │  promos ┼──►2. priority        BUY_X_GET_Y first, stable otherwise      │
//! │         │   3. per promotion   eligible = scope(promotion, items)       │
//! │  now ───┘                      │                                        │
//! │                                ├─ BUY_X_GET_Y      free units past B    │
//! │                                ├─ PERCENT_DISCOUNT price*qty*P/100      │
//! │                                └─ FIXED_DISCOUNT   min(D, eligible)     │
//! │             4. aggregate       total = Σ discount_amount                │
//! │                                                                         │
//! │  ──► PromotionCalculationResult { total_discount, applied, items }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Never fails. A promotion with missing or non-positive numbers is
//!   skipped, so are empty carts and windows that do not contain `now`.
//! - Pure: same inputs (including `now`) give the same result.
//! - Each promotion produces at most one application.
//! - Every promotion sees the full eligible item list; earlier applications
//!   do not reduce the price base of later ones.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::scope::{AllItems, PromotionScope};
use super::types::{Promotion, PromotionApplication, PromotionCalculationResult, PromotionType};
use super::window::evaluation_order;
use crate::pricing::{checked_line_total, line_total, PriceResolver};
use crate::types::{CartLineItem, FreeItem};

/// Runs every active promotion against the whole cart.
///
/// `promotions` may be `None` or empty, which returns a zero discount with
/// `updated_items` equal to `items`.
///
/// ## Example
/// ```rust
/// use brewline_core::promotion::{calculate, Promotion, PromotionType};
/// use brewline_core::CartLineItem;
/// use chrono::{Duration, Utc};
/// use rust_decimal::Decimal;
///
/// let now = Utc::now();
/// let items = vec![CartLineItem::new("a", "latte", 2)];
/// let promotions = vec![Promotion {
///     id: "p1".into(),
///     name: "Ten off".into(),
///     description: None,
///     promotion_type: PromotionType::PercentDiscount,
///     buy_quantity: None,
///     free_quantity: None,
///     discount: Some(Decimal::TEN),
///     start_date: now - Duration::hours(1),
///     end_date: now + Duration::hours(1),
///     is_active: true,
/// }];
///
/// let price_of = |_: &CartLineItem| Decimal::TEN;
/// let result = calculate(&items, Some(&promotions), &price_of, now);
/// assert_eq!(result.total_discount, Decimal::TWO);
/// ```
pub fn calculate<P>(
    items: &[CartLineItem],
    promotions: Option<&[Promotion]>,
    price_of: &P,
    now: DateTime<Utc>,
) -> PromotionCalculationResult
where
    P: PriceResolver + ?Sized,
{
    calculate_with_scope(items, promotions, price_of, now, &AllItems)
}

/// Same as [`calculate`] with an explicit eligibility strategy.
pub fn calculate_with_scope<P, S>(
    items: &[CartLineItem],
    promotions: Option<&[Promotion]>,
    price_of: &P,
    now: DateTime<Utc>,
    scope: &S,
) -> PromotionCalculationResult
where
    P: PriceResolver + ?Sized,
    S: PromotionScope + ?Sized,
{
    let promotions = match promotions {
        Some(promotions) if !promotions.is_empty() => promotions,
        _ => {
            debug!("No promotions supplied, skipping calculation");
            return PromotionCalculationResult::no_discount(items);
        }
    };

    let ordered = evaluation_order(promotions, now);
    debug!(
        supplied = promotions.len(),
        active = ordered.len(),
        items = items.len(),
        "Evaluating promotions"
    );

    let mut total_discount = Decimal::ZERO;
    let mut applied_promotions = Vec::new();

    for promotion in ordered {
        let eligible = scope.eligible_items(promotion, items);
        if eligible.is_empty() {
            debug!(promotion_id = %promotion.id, "No eligible items, skipping");
            continue;
        }

        let application = match promotion.promotion_type {
            PromotionType::BuyXGetY => apply_buy_x_get_y(promotion, &eligible, price_of),
            PromotionType::PercentDiscount => apply_percent_discount(promotion, &eligible, price_of),
            PromotionType::FixedDiscount => apply_fixed_discount(promotion, &eligible, price_of),
        };

        let application = application.and_then(|application| {
            total_discount
                .checked_add(application.discount_amount)
                .map(|total| (total, application))
        });

        match application {
            Some((total, application)) => {
                debug!(
                    promotion_id = %promotion.id,
                    promotion_type = %promotion.promotion_type,
                    discount = %application.discount_amount,
                    "Promotion applied"
                );
                total_discount = total;
                applied_promotions.push(application);
            }
            None => {
                debug!(
                    promotion_id = %promotion.id,
                    promotion_type = %promotion.promotion_type,
                    "Promotion contributed nothing"
                );
            }
        }
    }

    PromotionCalculationResult {
        total_discount,
        applied_promotions,
        updated_items: items.to_vec(),
    }
}

// =============================================================================
// Buy X Get Y
// =============================================================================

/// Grants free units to the units that come after the first `B` in cart order.
///
/// ```text
/// buy=3 free=1, cart [a x2, b x3, c x1]   total=6, sets=2, free=min(2, 6-3)=2
///
///   processed: 0      2         5     6
///              ├─a a─┼─b b b───┼─c───┤
///                       ▲ threshold B=3
///   a: 0+2 <= 3            → 0 free
///   b: 2+3 >  3            → min(2+3-3, 2) = 2 free, remaining 0 → stop
/// ```
///
/// Free units never exceed `total - B`, and attribution follows cart order,
/// not price. Quantity sums saturate at `i64::MAX`; a discount too large for
/// `Decimal` skips the promotion.
fn apply_buy_x_get_y<P>(
    promotion: &Promotion,
    eligible: &[&CartLineItem],
    price_of: &P,
) -> Option<PromotionApplication>
where
    P: PriceResolver + ?Sized,
{
    let buy = promotion.buy_quantity.filter(|q| *q > 0)?;
    let free = promotion.free_quantity.filter(|q| *q > 0)?;

    let total_quantity = eligible
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.quantity));
    if total_quantity < buy {
        return None;
    }

    let sets_eligible = total_quantity / buy;
    let total_free_items = sets_eligible
        .saturating_mul(free)
        .min(total_quantity - buy);

    let mut processed_quantity = 0_i64;
    let mut remaining_free_items = total_free_items;
    let mut promotion_discount = Decimal::ZERO;
    let mut applied_item_ids: Vec<String> = Vec::new();
    let mut free_items: Vec<FreeItem> = Vec::new();

    for item in eligible {
        if remaining_free_items <= 0 {
            break;
        }

        let free_candidates = if processed_quantity >= buy {
            item.quantity
        } else if processed_quantity.saturating_add(item.quantity) > buy {
            processed_quantity.saturating_add(item.quantity) - buy
        } else {
            0
        };
        let free_units = free_candidates.min(remaining_free_items);

        if free_units > 0 {
            promotion_discount = price_of
                .unit_price(item)
                .checked_mul(Decimal::from(free_units))
                .and_then(|amount| promotion_discount.checked_add(amount))?;
            remaining_free_items -= free_units;
            push_unique(&mut applied_item_ids, &item.cart_item_id);
            free_items.push(FreeItem {
                cart_item_id: item.cart_item_id.clone(),
                quantity: free_units,
            });
        }

        processed_quantity = processed_quantity.saturating_add(item.quantity);
    }

    if promotion_discount <= Decimal::ZERO {
        return None;
    }

    Some(PromotionApplication {
        promotion_id: promotion.id.clone(),
        promotion_name: promotion.name.clone(),
        promotion_type: promotion.promotion_type,
        discount_amount: promotion_discount,
        applied_to_items: applied_item_ids,
        free_items: Some(free_items),
    })
}

// =============================================================================
// Percent Discount
// =============================================================================

/// `price * quantity * P / 100` per eligible line. No cap. A discount too
/// large for `Decimal` skips the promotion.
fn apply_percent_discount<P>(
    promotion: &Promotion,
    eligible: &[&CartLineItem],
    price_of: &P,
) -> Option<PromotionApplication>
where
    P: PriceResolver + ?Sized,
{
    let percent = promotion.discount.filter(|d| *d > Decimal::ZERO)?;

    let mut promotion_discount = Decimal::ZERO;
    let mut applied_item_ids: Vec<String> = Vec::new();

    for item in eligible {
        promotion_discount = checked_line_total(price_of, item)
            .and_then(|total| total.checked_mul(percent))
            .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|amount| promotion_discount.checked_add(amount))?;
        push_unique(&mut applied_item_ids, &item.cart_item_id);
    }

    if promotion_discount <= Decimal::ZERO {
        return None;
    }

    Some(PromotionApplication {
        promotion_id: promotion.id.clone(),
        promotion_name: promotion.name.clone(),
        promotion_type: promotion.promotion_type,
        discount_amount: promotion_discount,
        applied_to_items: applied_item_ids,
        free_items: None,
    })
}

// =============================================================================
// Fixed Discount
// =============================================================================

/// `min(D, Σ price * quantity)`, attributed to the eligible set as one block.
fn apply_fixed_discount<P>(
    promotion: &Promotion,
    eligible: &[&CartLineItem],
    price_of: &P,
) -> Option<PromotionApplication>
where
    P: PriceResolver + ?Sized,
{
    let amount = promotion.discount.filter(|d| *d > Decimal::ZERO)?;

    let total_eligible_value = eligible.iter().fold(Decimal::ZERO, |acc, item| {
        acc.saturating_add(line_total(price_of, item))
    });
    if total_eligible_value <= Decimal::ZERO {
        return None;
    }

    let mut applied_item_ids: Vec<String> = Vec::new();
    for item in eligible {
        push_unique(&mut applied_item_ids, &item.cart_item_id);
    }

    Some(PromotionApplication {
        promotion_id: promotion.id.clone(),
        promotion_name: promotion.name.clone(),
        promotion_type: promotion.promotion_type,
        discount_amount: amount.min(total_eligible_value),
        applied_to_items: applied_item_ids,
        free_items: None,
    })
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{subtotal, MenuPricing};
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap()
    }

    fn promotion(id: &str, promotion_type: PromotionType) -> Promotion {
        Promotion {
            id: id.to_string(),
            name: format!("Promo {}", id),
            description: None,
            promotion_type,
            buy_quantity: None,
            free_quantity: None,
            discount: None,
            start_date: now() - Duration::days(7),
            end_date: now() + Duration::days(7),
            is_active: true,
        }
    }

    fn buy_x_get_y(id: &str, buy: i64, free: i64) -> Promotion {
        Promotion {
            buy_quantity: Some(buy),
            free_quantity: Some(free),
            ..promotion(id, PromotionType::BuyXGetY)
        }
    }

    fn percent(id: &str, pct: Decimal) -> Promotion {
        Promotion {
            discount: Some(pct),
            ..promotion(id, PromotionType::PercentDiscount)
        }
    }

    fn fixed(id: &str, amount: Decimal) -> Promotion {
        Promotion {
            discount: Some(amount),
            ..promotion(id, PromotionType::FixedDiscount)
        }
    }

    /// Every product in these tests is priced by its id: "p2" costs $2, etc.
    /// "latte" and "cookie" come from a menu.
    fn menu() -> MenuPricing {
        MenuPricing::new()
            .with_product("p2", dec!(2))
            .with_product("p5", dec!(5))
            .with_product("p10", dec!(10))
            .with_product("latte", dec!(4.45))
            .with_product("cookie", dec!(1.25))
            .with_product("free-water", dec!(0))
    }

    fn item(id: &str, product: &str, qty: i64) -> CartLineItem {
        CartLineItem::new(id, product, qty)
    }

    fn assert_total_matches_sum(result: &PromotionCalculationResult) {
        let sum: Decimal = result
            .applied_promotions
            .iter()
            .map(|a| a.discount_amount)
            .sum();
        assert_eq!(result.total_discount, sum);
    }

    // -------------------------------------------------------------------------
    // Worked examples
    // -------------------------------------------------------------------------

    #[test]
    fn test_example_buy_three_get_one() {
        let items = vec![item("a", "p2", 5)];
        let promos = vec![buy_x_get_y("bxgy", 3, 1)];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert_eq!(result.total_discount, dec!(2));
        assert_eq!(result.applied_promotions.len(), 1);
        let app = &result.applied_promotions[0];
        assert_eq!(app.discount_amount, dec!(2));
        assert_eq!(app.applied_to_items, vec!["a"]);
        assert_eq!(
            app.free_items,
            Some(vec![FreeItem {
                cart_item_id: "a".to_string(),
                quantity: 1
            }])
        );
    }

    #[test]
    fn test_example_percent_discount() {
        let items = vec![item("a", "p10", 2)];
        let promos = vec![percent("pct", dec!(10))];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert_eq!(result.total_discount, dec!(2));
        assert_eq!(result.applied_promotions[0].applied_to_items, vec!["a"]);
        assert_eq!(result.applied_promotions[0].free_items, None);
    }

    #[test]
    fn test_example_fixed_discount_capped_at_value() {
        let items = vec![item("a", "p5", 1)];
        let promos = vec![fixed("fixed", dec!(20))];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert_eq!(result.total_discount, dec!(5));
    }

    #[test]
    fn test_example_inactive_promotion_ignored() {
        let items = vec![item("a", "p5", 1)];
        let mut promo = percent("pct", dec!(10));
        promo.is_active = false;

        let result = calculate(&items, Some(&[promo]), &menu(), now());

        assert!(result.applied_promotions.is_empty());
        assert_eq!(result.total_discount, Decimal::ZERO);
    }

    #[test]
    fn test_example_no_promotions_passes_items_through() {
        let items = vec![item("b", "p5", 1), item("a", "p2", 3)];

        let result = calculate(&items, None, &menu(), now());

        assert_eq!(result.total_discount, Decimal::ZERO);
        assert!(result.applied_promotions.is_empty());
        assert_eq!(result.updated_items, items);

        let empty: Vec<Promotion> = Vec::new();
        let result = calculate(&items, Some(&empty), &menu(), now());
        assert_eq!(result.updated_items, items);
        assert!(!result.has_discount());
    }

    #[test]
    fn test_example_buy_x_get_y_listed_first() {
        let items = vec![item("a", "p2", 4)];
        let promos = vec![percent("pct", dec!(10)), buy_x_get_y("bxgy", 3, 1)];

        let result = calculate(&items, Some(&promos), &menu(), now());

        let order: Vec<&str> = result
            .applied_promotions
            .iter()
            .map(|a| a.promotion_id.as_str())
            .collect();
        assert_eq!(order, vec!["bxgy", "pct"]);
        // Percent still sees the full price base: 2 * 4 * 10% = 0.8
        assert_eq!(result.applied_promotions[1].discount_amount, dec!(0.8));
        assert_eq!(result.total_discount, dec!(2.8));
    }

    // -------------------------------------------------------------------------
    // Buy X Get Y
    // -------------------------------------------------------------------------

    #[test]
    fn test_bxgy_below_threshold_emits_nothing() {
        let items = vec![item("a", "p2", 2)];
        let promos = vec![buy_x_get_y("bxgy", 3, 1)];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert!(result.applied_promotions.is_empty());
    }

    #[test]
    fn test_bxgy_exactly_threshold_has_no_free_units() {
        // sets = 1 but total - buy = 0 caps free units at zero
        let items = vec![item("a", "p2", 3)];
        let promos = vec![buy_x_get_y("bxgy", 3, 1)];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert!(result.applied_promotions.is_empty());
    }

    #[test]
    fn test_bxgy_free_units_capped_by_total_minus_buy() {
        // buy 2 get 5: sets = 3, 3*5 = 15 but only 6 - 2 = 4 can be free
        let items = vec![item("a", "p2", 6)];
        let promos = vec![buy_x_get_y("bxgy", 2, 5)];

        let result = calculate(&items, Some(&promos), &menu(), now());

        let app = &result.applied_promotions[0];
        assert_eq!(app.discount_amount, dec!(8));
        assert_eq!(app.free_items.as_ref().unwrap()[0].quantity, 4);
    }

    #[test]
    fn test_bxgy_walks_items_in_cart_order() {
        // buy 3 get 1, total 6 → sets 2, free = min(2, 3) = 2
        // a: 0+2 <= 3 → none; b: 2+3 > 3 → 2 free, remaining 0
        let items = vec![item("a", "p2", 2), item("b", "p10", 3), item("c", "p5", 1)];
        let promos = vec![buy_x_get_y("bxgy", 3, 1)];

        let result = calculate(&items, Some(&promos), &menu(), now());

        let app = &result.applied_promotions[0];
        assert_eq!(app.discount_amount, dec!(20));
        assert_eq!(app.applied_to_items, vec!["b"]);
        assert_eq!(
            app.free_items,
            Some(vec![FreeItem {
                cart_item_id: "b".to_string(),
                quantity: 2
            }])
        );
    }

    #[test]
    fn test_bxgy_is_order_dependent() {
        let promos = vec![buy_x_get_y("bxgy", 1, 1)];
        let cheap_first = vec![item("a", "p2", 1), item("b", "p10", 1)];
        let pricey_first = vec![item("b", "p10", 1), item("a", "p2", 1)];

        let one = calculate(&cheap_first, Some(&promos), &menu(), now());
        let two = calculate(&pricey_first, Some(&promos), &menu(), now());

        assert_eq!(one.total_discount, dec!(10));
        assert_eq!(two.total_discount, dec!(2));
    }

    #[test]
    fn test_bxgy_spreads_free_units_across_lines() {
        // buy 2 get 2, total 7 → sets 3, free = min(6, 5) = 5
        // a(1): none; b(2): crosses, 1 free; c(4): 4 free → remaining 0
        let items = vec![item("a", "p10", 1), item("b", "p5", 2), item("c", "p2", 4)];
        let promos = vec![buy_x_get_y("bxgy", 2, 2)];

        let result = calculate(&items, Some(&promos), &menu(), now());

        let app = &result.applied_promotions[0];
        assert_eq!(app.applied_to_items, vec!["b", "c"]);
        assert_eq!(app.discount_amount, dec!(5) + dec!(8));
        let free: Vec<i64> = app.free_items.as_ref().unwrap().iter().map(|f| f.quantity).collect();
        assert_eq!(free, vec![1, 4]);
    }

    #[test]
    fn test_bxgy_zero_priced_free_units_emit_nothing() {
        let items = vec![item("a", "free-water", 5)];
        let promos = vec![buy_x_get_y("bxgy", 2, 1)];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert!(result.applied_promotions.is_empty());
    }

    #[test]
    fn test_bxgy_missing_or_non_positive_quantities_skip() {
        let items = vec![item("a", "p2", 10)];
        let mut no_buy = buy_x_get_y("no-buy", 0, 1);
        no_buy.buy_quantity = None;
        let zero_free = buy_x_get_y("zero-free", 2, 0);
        let negative_buy = buy_x_get_y("neg", -2, 1);

        let result = calculate(
            &items,
            Some(&[no_buy, zero_free, negative_buy]),
            &menu(),
            now(),
        );

        assert!(result.applied_promotions.is_empty());
        assert_eq!(result.total_discount, Decimal::ZERO);
    }

    // -------------------------------------------------------------------------
    // Percent / Fixed
    // -------------------------------------------------------------------------

    #[test]
    fn test_percent_is_exact_without_rounding() {
        // 4.45 * 3 * 15 / 100 = 2.0025 and 1.25 * 1 * 15 / 100 = 0.1875
        let items = vec![item("a", "latte", 3), item("b", "cookie", 1)];
        let promos = vec![percent("pct", dec!(15))];

        let result = calculate(&items, Some(&promos), &menu(), now());

        let expected = subtotal(&menu(), &items) * dec!(15) / dec!(100);
        assert_eq!(result.total_discount, expected);
        assert_eq!(result.total_discount, dec!(2.19));
        assert_eq!(result.applied_promotions[0].applied_to_items, vec!["a", "b"]);
    }

    #[test]
    fn test_percent_non_positive_or_missing_skips() {
        let items = vec![item("a", "p10", 1)];
        let mut missing = percent("missing", dec!(1));
        missing.discount = None;

        let result = calculate(
            &items,
            Some(&[percent("zero", dec!(0)), percent("neg", dec!(-5)), missing]),
            &menu(),
            now(),
        );

        assert!(result.applied_promotions.is_empty());
    }

    #[test]
    fn test_percent_records_zero_priced_lines() {
        let items = vec![item("a", "free-water", 1), item("b", "p10", 1)];
        let promos = vec![percent("pct", dec!(50))];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert_eq!(result.applied_promotions[0].applied_to_items, vec!["a", "b"]);
        assert_eq!(result.total_discount, dec!(5));
    }

    #[test]
    fn test_fixed_below_value_applies_in_full() {
        let items = vec![item("a", "p5", 2), item("b", "p2", 1)];
        let promos = vec![fixed("fixed", dec!(3.50))];

        let result = calculate(&items, Some(&promos), &menu(), now());

        let app = &result.applied_promotions[0];
        assert_eq!(app.discount_amount, dec!(3.50));
        assert_eq!(app.applied_to_items, vec!["a", "b"]);
    }

    #[test]
    fn test_fixed_skips_zero_value_cart() {
        let items = vec![item("a", "free-water", 3)];
        let promos = vec![fixed("fixed", dec!(1))];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert!(result.applied_promotions.is_empty());
    }

    #[test]
    fn test_fixed_non_positive_skips() {
        let items = vec![item("a", "p5", 1)];

        let result = calculate(&items, Some(&[fixed("zero", dec!(0))]), &menu(), now());

        assert!(result.applied_promotions.is_empty());
    }

    // -------------------------------------------------------------------------
    // Cross-cutting properties
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_cart_yields_no_discount() {
        let promos = vec![
            buy_x_get_y("bxgy", 1, 1),
            percent("pct", dec!(10)),
            fixed("fixed", dec!(2)),
        ];

        let result = calculate(&[], Some(&promos), &menu(), now());

        assert_eq!(result.total_discount, Decimal::ZERO);
        assert!(result.applied_promotions.is_empty());
        assert!(result.updated_items.is_empty());
    }

    #[test]
    fn test_out_of_window_never_applies() {
        let items = vec![item("a", "p10", 5)];
        let mut expired = fixed("expired", dec!(1));
        expired.end_date = now() - Duration::milliseconds(1);
        let mut upcoming = buy_x_get_y("upcoming", 1, 1);
        upcoming.start_date = now() + Duration::milliseconds(1);
        let mut off = percent("off", dec!(10));
        off.is_active = false;

        let result = calculate(&items, Some(&[expired, upcoming, off]), &menu(), now());

        assert!(result.applied_promotions.is_empty());
    }

    #[test]
    fn test_total_equals_sum_and_stays_under_subtotal() {
        let items = vec![
            item("a", "latte", 2),
            item("b", "cookie", 3),
            item("c", "p5", 1),
        ];
        let promos = vec![
            fixed("fixed", dec!(1.50)),
            buy_x_get_y("bxgy", 4, 1),
            percent("pct", dec!(12.5)),
        ];

        let result = calculate(&items, Some(&promos), &menu(), now());

        assert_eq!(result.applied_promotions.len(), 3);
        assert_total_matches_sum(&result);
        assert!(result.total_discount <= subtotal(&menu(), &items));

        for app in &result.applied_promotions {
            assert!(app.discount_amount > Decimal::ZERO);
            assert!(app.discount_amount <= subtotal(&menu(), &items));
        }
    }

    #[test]
    fn test_each_promotion_applies_at_most_once() {
        let items = vec![item("a", "p2", 9)];
        let promos = vec![buy_x_get_y("bxgy", 2, 1), percent("pct", dec!(5))];

        let result = calculate(&items, Some(&promos), &menu(), now());

        let ids: HashSet<&str> = result
            .applied_promotions
            .iter()
            .map(|a| a.promotion_id.as_str())
            .collect();
        assert_eq!(ids.len(), result.applied_promotions.len());
    }

    #[test]
    fn test_huge_quantities_do_not_overflow() {
        let items = vec![item("a", "p2", i64::MAX), item("b", "p2", 2)];
        let promos = vec![buy_x_get_y("bxgy", 2, 1), percent("pct", dec!(10))];

        let result = calculate(&items, Some(&promos), &menu(), now());

        // Quantity total saturates at i64::MAX: sets = MAX / 2, all on line "a"
        let free = i64::MAX / 2;
        assert_eq!(result.applied_promotions.len(), 2);
        let bxgy = &result.applied_promotions[0];
        assert_eq!(
            bxgy.free_items,
            Some(vec![FreeItem {
                cart_item_id: "a".to_string(),
                quantity: free,
            }])
        );
        assert_eq!(bxgy.discount_amount, dec!(2) * Decimal::from(free));
        assert_total_matches_sum(&result);
    }

    #[test]
    fn test_discount_overflow_skips_promotion() {
        let price_of = |_: &CartLineItem| Decimal::MAX;
        let items = vec![item("a", "x", 3), item("b", "y", 2)];
        let promos = vec![
            buy_x_get_y("bxgy", 1, 1),
            percent("pct", dec!(10)),
            fixed("fixed", dec!(5)),
        ];

        let result = calculate(&items, Some(&promos), &price_of, now());

        // Only the fixed discount survives: its value base saturates
        assert_eq!(result.applied_promotions.len(), 1);
        assert_eq!(result.applied_promotions[0].promotion_id, "fixed");
        assert_eq!(result.total_discount, dec!(5));
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let items = vec![item("a", "latte", 4), item("b", "cookie", 2)];
        let promos = vec![
            percent("pct", dec!(7)),
            buy_x_get_y("bxgy", 3, 1),
            fixed("fixed", dec!(0.99)),
        ];
        let pricing = menu();

        let first = calculate(&items, Some(&promos), &pricing, now());
        let second = calculate(&items, Some(&promos), &pricing, now());

        assert_eq!(first, second);
    }

    #[test]
    fn test_closure_price_resolver() {
        let items = vec![item("a", "anything", 5)];
        let promos = vec![buy_x_get_y("bxgy", 3, 1)];
        let price_of = |_: &CartLineItem| dec!(2);

        let result = calculate(&items, Some(&promos), &price_of, now());

        assert_eq!(result.total_discount, dec!(2));
    }

    // -------------------------------------------------------------------------
    // Scope extension point
    // -------------------------------------------------------------------------

    /// Only lines for one product are eligible.
    struct SingleProduct(&'static str);

    impl PromotionScope for SingleProduct {
        fn eligible_items<'a>(
            &self,
            _promotion: &Promotion,
            items: &'a [CartLineItem],
        ) -> Vec<&'a CartLineItem> {
            items.iter().filter(|i| i.product_id == self.0).collect()
        }
    }

    #[test]
    fn test_custom_scope_limits_eligible_items() {
        let items = vec![item("a", "latte", 2), item("b", "cookie", 4)];
        let promos = vec![percent("pct", dec!(50))];

        let result = calculate_with_scope(
            &items,
            Some(&promos),
            &menu(),
            now(),
            &SingleProduct("cookie"),
        );

        let app = &result.applied_promotions[0];
        assert_eq!(app.applied_to_items, vec!["b"]);
        assert_eq!(app.discount_amount, dec!(2.5));
        assert_eq!(result.updated_items, items);
    }

    #[test]
    fn test_scope_with_no_matches_skips_promotion() {
        let items = vec![item("a", "latte", 2)];
        let promos = vec![fixed("fixed", dec!(1))];

        let result = calculate_with_scope(
            &items,
            Some(&promos),
            &menu(),
            now(),
            &SingleProduct("bagel"),
        );

        assert!(result.applied_promotions.is_empty());
    }
}
