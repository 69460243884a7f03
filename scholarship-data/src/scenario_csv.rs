//! CSV loader for batches of draft returns.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Whitespace
//! around values is trimmed.
//!
//! | Column                 | Required | Type    | Notes                                        |
//! |------------------------|----------|---------|----------------------------------------------|
//! | `label`                | no       | string  | Defaults to `row N`                          |
//! | `tuition_paid`         | yes      | decimal | 1098-T Box 1                                 |
//! | `scholarship_total`    | yes      | decimal | 1098-T Box 5                                 |
//! | `current_inclusion`    | yes      | decimal | Taxable scholarship on the draft return      |
//! | `federal_agi`          | yes      | decimal | Draft AGI                                    |
//! | `state_taxable_income` | no       | decimal | Leave empty when no state return is filed    |
//! | `state_tax_rate`       | no       | decimal | Fraction (`0.0425`); empty uses the default  |
//!
//! ### Minimal example
//!
//! ```csv
//! tuition_paid,scholarship_total,current_inclusion,federal_agi
//! 13552,14235,7900,29639
//! ```
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use scholarship_core::{OptimizerError, ScenarioInputs};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: Option<String>,
    tuition_paid: Decimal,
    scholarship_total: Decimal,
    current_inclusion: Decimal,
    federal_agi: Decimal,
    state_taxable_income: Option<Decimal>,
    state_tax_rate: Option<Decimal>,
}

/// Errors that can occur while loading draft returns from CSV.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioCsvError {
    /// Bad structure, a missing required column, or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The row parsed but holds values the optimizer rejects.
    /// `row` is 1-based (header = row 0).
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: OptimizerError,
    },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One draft return from the batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRecord {
    /// 1-based data row number.
    pub row: usize,
    pub label: String,
    pub inputs: ScenarioInputs,
}

pub struct ScenarioCsvLoader;

impl ScenarioCsvLoader {
    /// Parse draft returns from any reader. Rows are returned in file order.
    ///
    /// Rows without a `state_tax_rate` use `default_state_tax_rate`.
    ///
    /// # Errors
    ///
    /// * [`ScenarioCsvError::Parse`] if the CSV is structurally invalid or a
    ///   required field cannot be deserialised.
    /// * [`ScenarioCsvError::InvalidRow`] if a row has a negative amount or an
    ///   out-of-range rate.
    pub fn parse<R: Read>(
        reader: R,
        default_state_tax_rate: Decimal,
    ) -> Result<Vec<ScenarioRecord>, ScenarioCsvError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row = result?;
                convert_row(row, idx + 1, default_state_tax_rate)
            })
            .collect()
    }

    /// Convenience wrapper: read a file from disk and delegate to [`ScenarioCsvLoader::parse`].
    pub fn load_from_file(
        path: &Path,
        default_state_tax_rate: Decimal,
    ) -> Result<Vec<ScenarioRecord>, ScenarioCsvError> {
        let file = std::fs::File::open(path).map_err(|source| ScenarioCsvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file, default_state_tax_rate)
    }
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
    default_state_tax_rate: Decimal,
) -> Result<ScenarioRecord, ScenarioCsvError> {
    let inputs = ScenarioInputs {
        tuition_paid: row.tuition_paid,
        scholarship_total: row.scholarship_total,
        current_inclusion: row.current_inclusion,
        federal_agi: row.federal_agi,
        state_taxable_income: row.state_taxable_income,
        state_tax_rate: row.state_tax_rate.unwrap_or(default_state_tax_rate),
    };
    inputs
        .validate()
        .map_err(|source| ScenarioCsvError::InvalidRow {
            row: row_number,
            source,
        })?;

    Ok(ScenarioRecord {
        row: row_number,
        label: row
            .label
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("row {row_number}")),
        inputs,
    })
}
