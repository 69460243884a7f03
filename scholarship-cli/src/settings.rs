//! Optional settings file for the command-line tool.
//!
//! ```toml
//! log_level = "debug"
//! log_file = "optimizer.log"
//! materiality_threshold = 5
//! default_state_rate_percent = 4.25
//! tax_table = "tax_year_2025.toml"
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use rust_decimal::Decimal;
use scholarship_core::calculations::DEFAULT_MATERIALITY_THRESHOLD;
use serde::Deserialize;

use crate::utils::MAX_STATE_RATE_PERCENT;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Log filter used when neither `--log-level` nor `RUST_LOG` is set.
    pub log_level: String,

    /// Append log records to this file in addition to stderr.
    pub log_file: Option<PathBuf>,

    /// Minimum improvement, in dollars, before a change is recommended.
    pub materiality_threshold: Decimal,

    /// State rate in percent. Falls back to the tax table's default when unset.
    pub default_state_rate_percent: Option<Decimal>,

    /// Tax-year table to use instead of the built-in 2025 constants.
    pub tax_table: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            materiality_threshold: DEFAULT_MATERIALITY_THRESHOLD,
            default_state_rate_percent: None,
            tax_table: None,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text. Missing keys keep their defaults.
    ///
    /// Rejects a negative materiality threshold and a state rate outside
    /// 0 to 7 percent.
    pub fn parse(input: &str) -> Result<Self> {
        let settings: Self = toml::from_str(input).context("invalid settings")?;
        ensure!(
            settings.materiality_threshold >= Decimal::ZERO,
            "materiality_threshold must not be negative, got {}",
            settings.materiality_threshold
        );
        if let Some(percent) = settings.default_state_rate_percent {
            ensure!(
                percent >= Decimal::ZERO && percent <= MAX_STATE_RATE_PERCENT,
                "default_state_rate_percent {percent} is outside 0 to 7"
            );
        }
        Ok(settings)
    }

    /// Reads the settings file, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse: {}", path.display()))
    }

    /// Default state rate as a fraction, if the settings file sets one.
    pub fn default_state_tax_rate(&self) -> Option<Decimal> {
        self.default_state_rate_percent
            .map(|percent| percent / Decimal::ONE_HUNDRED)
    }
}
