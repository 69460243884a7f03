use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised before a search starts.
///
/// The scenario evaluator itself is total; these only come from validating
/// caller-supplied inputs and tax tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizerError {
    /// An input value is outside its allowed range.
    #[error("invalid input: {field} must be {requirement} (got {value})")]
    InvalidInput {
        field: &'static str,
        requirement: &'static str,
        value: Decimal,
    },

    /// The tax-year table cannot be used for bracket calculations.
    #[error("invalid tax table for {tax_year}: {reason}")]
    InvalidTaxTable { tax_year: i32, reason: String },
}
