//! CLI configuration.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! ```text
//! defaults ──► brewline.toml (or --config <path>) ──► BREWLINE_* environment
//! ```
//!
//! `BREWLINE_CURRENCY_SYMBOL=€ brewline cart.json` overrides the file.

use std::collections::HashMap;
use std::path::Path;

use brewline_core::Money;
use config::{Config, Environment, File};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "brewline.toml";

/// Money in the core is held in cents, so no currency may show more.
pub const MAX_CURRENCY_DECIMALS: u8 = 2;

/// Receipt output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings for one `brewline` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// ISO 4217 code, shown in JSON reports
    pub currency_code: String,

    /// Prefix for printed amounts
    pub currency_symbol: String,

    /// Decimal places shown (0 for whole-unit currencies)
    pub currency_decimals: u8,

    /// Used when `--format` is not given
    pub output_format: OutputFormat,

    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            output_format: OutputFormat::Text,
            log_level: "warn,brewline=info".to_string(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from defaults, the config file and `BREWLINE_*`
    /// environment variables.
    ///
    /// An explicit `path` must exist; the default `brewline.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Same as [`CliConfig::load`], with the environment replaced by `env`
    /// when given.
    fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .set_default("currency_code", defaults.currency_code)?
            .set_default("currency_symbol", defaults.currency_symbol)?
            .set_default("currency_decimals", i64::from(defaults.currency_decimals))?
            .set_default("output_format", "text")?
            .set_default("log_level", defaults.log_level)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("BREWLINE")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize::<CliConfig>()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::InvalidValue {
                field: "currency_decimals".to_string(),
                reason: format!("must be at most {}", MAX_CURRENCY_DECIMALS),
            });
        }

        if self.currency_code.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "currency_code".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Formats an amount for display with the configured currency.
    ///
    /// Whole-unit currencies round with banker's rounding.
    pub fn format_currency(&self, amount: Money) -> String {
        let dp = u32::from(self.currency_decimals);
        let mut value = amount
            .to_decimal()
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
        value.rescale(dp);

        format!(
            "{}{}{}",
            if value < Decimal::ZERO { "-" } else { "" },
            self.currency_symbol,
            value.abs()
        )
    }
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
