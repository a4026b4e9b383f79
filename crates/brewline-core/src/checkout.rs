//! # Checkout Summary
//!
//! Turns a promotion result into the numbers an order is created with.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart lines ──► subtotal (exact)                    14.60               │
//! │  Engine     ──► total_discount (exact)             - 2.19               │
//! │                 total = max(subtotal - discount, 0) 12.41               │
//! │                                                                         │
//! │  Receipt (Money, rounded once per figure):                              │
//! │    Subtotal   $14.60                                                    │
//! │    15% off    -$2.19                                                    │
//! │    Total      $12.41   = subtotal_money - discount_money                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The printed total is derived from the two printed figures above it, so a
//! receipt always adds up even when the exact amounts carry sub-cent digits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::{self, PriceResolver};
use crate::promotion::{self, Promotion, PromotionApplication, PromotionCalculationResult};
use crate::types::CartLineItem;

/// One promotion line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReceiptLine {
    pub promotion_id: String,
    pub label: String,
    pub amount: Money,
}

/// Order totals for one cart and one engine result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutSummary {
    #[ts(as = "String")]
    pub subtotal: Decimal,
    #[ts(as = "String")]
    pub total_discount: Decimal,
    /// `subtotal - total_discount`, never below zero.
    #[ts(as = "String")]
    pub total: Decimal,
    pub applied_promotions: Vec<PromotionApplication>,
}

impl CheckoutSummary {
    /// Builds the summary from a result the caller already computed.
    pub fn build<P>(items: &[CartLineItem], result: &PromotionCalculationResult, resolver: &P) -> Self
    where
        P: PriceResolver + ?Sized,
    {
        let subtotal = pricing::subtotal(resolver, items);
        CheckoutSummary {
            subtotal,
            total_discount: result.total_discount,
            total: (subtotal - result.total_discount).max(Decimal::ZERO),
            applied_promotions: result.applied_promotions.clone(),
        }
    }

    /// Runs the promotion engine at `now` and builds the summary.
    pub fn compute<P>(
        items: &[CartLineItem],
        promotions: Option<&[Promotion]>,
        resolver: &P,
        now: DateTime<Utc>,
    ) -> Self
    where
        P: PriceResolver + ?Sized,
    {
        let result = promotion::calculate(items, promotions, resolver, now);
        Self::build(items, &result, resolver)
    }

    pub fn subtotal_money(&self) -> Money {
        Money::from_decimal(self.subtotal)
    }

    pub fn discount_money(&self) -> Money {
        Money::from_decimal(self.total_discount)
    }

    /// Printed total: rounded subtotal minus rounded discount, floored at zero.
    pub fn total_money(&self) -> Money {
        let total = self.subtotal_money() - self.discount_money();
        if total.is_negative() {
            Money::zero()
        } else {
            total
        }
    }

    /// One line per applied promotion, in evaluation order.
    pub fn receipt_lines(&self) -> Vec<ReceiptLine> {
        self.applied_promotions
            .iter()
            .map(|application| ReceiptLine {
                promotion_id: application.promotion_id.clone(),
                label: application.promotion_name.clone(),
                amount: Money::from_decimal(application.discount_amount),
            })
            .collect()
    }
}
