//! # brewline
//!
//! Previews promotions and totals for a coffee-shop cart.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        brewline                                         │
//! │                                                                         │
//! │  CliConfig::load ──► init_tracing (stderr)                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Scenario::load ──► Cart::from_items ──► CheckoutSummary::compute(now)  │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                 text_receipt / json_report ──► stdout   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```text
//! brewline [--config <path>] [--now <RFC3339>] [--format text|json] <SCENARIO>
//! ```

mod config;
mod render;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use brewline_core::CheckoutSummary;
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, OutputFormat};
use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(
    name = "brewline",
    about = "Preview promotions and totals for a coffee-shop cart",
    version
)]
struct Cli {
    /// Config file (defaults to ./brewline.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluation instant, RFC 3339 (defaults to the current time)
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Output format (overrides the configured one)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Scenario JSON file with menu, items and promotions
    scenario: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.log_level)?;

    let scenario = Scenario::load(&cli.scenario)?;
    let cart = scenario.cart()?;
    scenario.check_promotions();

    let now = cli.now.unwrap_or_else(Utc::now);
    let summary = CheckoutSummary::compute(cart.items(), scenario.promotions(), &scenario.menu, now);

    info!(
        items = cart.item_count(),
        applied = summary.applied_promotions.len(),
        subtotal = %summary.subtotal,
        discount = %summary.total_discount,
        total = %summary.total,
        "Checkout computed"
    );

    let output = match cli.format.unwrap_or(config.output_format) {
        OutputFormat::Text => render::text_receipt(&summary, &config),
        OutputFormat::Json => render::json_report(&summary, &config, now)?,
    };
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level/filter '{}'", log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {}", err))
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{}' as RFC 3339 ({})", raw, err))
}
