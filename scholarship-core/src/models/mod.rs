mod scenario;
mod tax_bracket;
mod tax_year_config;

pub use scenario::{ScenarioInputs, ScenarioResult};
pub use tax_bracket::TaxBracket;
pub use tax_year_config::TaxYearConfig;
