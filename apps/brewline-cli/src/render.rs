//! Output rendering: plain-text receipt or JSON report.

use anyhow::Result;
use brewline_core::{CheckoutSummary, Money, ReceiptLine};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::CliConfig;

/// Label column width on text receipts.
const LABEL_WIDTH: usize = 24;

/// Amount column width on text receipts.
const AMOUNT_WIDTH: usize = 12;

/// JSON output of one run.
///
/// The exact decimal figures of the summary are flattened in; the cent
/// figures are the rounded values a receipt would print.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReport {
    pub evaluated_at: DateTime<Utc>,
    pub currency_code: String,
    #[serde(flatten)]
    pub summary: CheckoutSummary,
    pub receipt_lines: Vec<ReceiptLine>,
    pub subtotal_cents: Money,
    pub discount_cents: Money,
    pub total_cents: Money,
}

impl CheckoutReport {
    pub fn new(summary: &CheckoutSummary, config: &CliConfig, evaluated_at: DateTime<Utc>) -> Self {
        CheckoutReport {
            evaluated_at,
            currency_code: config.currency_code.clone(),
            receipt_lines: summary.receipt_lines(),
            subtotal_cents: summary.subtotal_money(),
            discount_cents: summary.discount_money(),
            total_cents: summary.total_money(),
            summary: summary.clone(),
        }
    }
}

pub fn json_report(
    summary: &CheckoutSummary,
    config: &CliConfig,
    evaluated_at: DateTime<Utc>,
) -> Result<String> {
    let report = CheckoutReport::new(summary, config, evaluated_at);
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Renders a fixed-width receipt.
///
/// ```text
/// Subtotal                      $14.60
///   Latte Day                   -$2.19
/// Discount                      -$2.19
/// Total                         $12.41
/// ```
pub fn text_receipt(summary: &CheckoutSummary, config: &CliConfig) -> String {
    let mut out = String::new();
    push_row(&mut out, "Subtotal", &config.format_currency(summary.subtotal_money()));

    for line in summary.receipt_lines() {
        let label = format!("  {}", line.label);
        push_row(&mut out, &label, &discount_text(config, line.amount));
    }

    push_row(&mut out, "Discount", &discount_text(config, summary.discount_money()));
    push_row(&mut out, "Total", &config.format_currency(summary.total_money()));
    out
}

fn discount_text(config: &CliConfig, amount: Money) -> String {
    if amount.is_zero() {
        config.format_currency(amount)
    } else {
        config.format_currency(Money::zero() - amount)
    }
}

fn push_row(out: &mut String, label: &str, amount: &str) {
    let label: String = label.chars().take(LABEL_WIDTH - 1).collect();
    out.push_str(&format!(
        "{:<label_w$}{:>amount_w$}\n",
        label,
        amount,
        label_w = LABEL_WIDTH,
        amount_w = AMOUNT_WIDTH
    ));
}
