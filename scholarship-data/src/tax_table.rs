use std::fs;
use std::path::{Path, PathBuf};

use scholarship_core::{OptimizerError, TaxYearConfig};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a tax-year table.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("cannot read tax table '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Invalid(#[from] OptimizerError),
}

impl From<toml::de::Error> for TaxTableLoaderError {
    fn from(err: toml::de::Error) -> Self {
        TaxTableLoaderError::TomlParse(err.to_string())
    }
}

/// Loader for per-year tax constants stored as TOML.
///
/// The file mirrors [`TaxYearConfig`]: top-level scalar fields followed by a
/// `[[federal_brackets]]` array ordered from the lowest band up. The top
/// bracket omits `max_income`.
///
/// ```toml
/// tax_year = 2025
/// federal_standard_deduction = 15750
/// state_standard_deduction = 12750
/// credit_rate = 0.20
/// credit_cap = 2000
/// default_state_tax_rate = 0.0425
///
/// [[federal_brackets]]
/// max_income = 11925
/// tax_rate = 0.10
///
/// [[federal_brackets]]
/// tax_rate = 0.12
/// ```
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse and validate a tax table from TOML text.
    pub fn parse(input: &str) -> Result<TaxYearConfig, TaxTableLoaderError> {
        let config: TaxYearConfig = toml::from_str(input)?;
        config.validate()?;
        debug!(
            tax_year = config.tax_year,
            brackets = config.federal_brackets.len(),
            "loaded tax table"
        );
        Ok(config)
    }

    /// Convenience wrapper: read a file from disk and delegate to [`TaxTableLoader::parse`].
    pub fn load_from_file(path: &Path) -> Result<TaxYearConfig, TaxTableLoaderError> {
        let contents = fs::read_to_string(path).map_err(|source| TaxTableLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }
}
