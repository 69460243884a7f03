//! Loaders for tax-year tables (TOML) and batches of draft returns (CSV).

mod scenario_csv;
mod tax_table;

pub use scenario_csv::{ScenarioCsvError, ScenarioCsvLoader, ScenarioRecord};
pub use tax_table::{TaxTableLoader, TaxTableLoaderError};
