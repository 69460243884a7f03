//! Command handlers shared by the binary and its tests.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use scholarship_core::{ScenarioInputs, ScholarshipOptimizer, TaxYearConfig};
use scholarship_data::{ScenarioCsvLoader, TaxTableLoader};
use tracing::{debug, info};

use crate::report::{Report, summary_line};
use crate::settings::Settings;

/// Figures collected for a single draft return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeRequest {
    pub tuition_paid: Decimal,
    pub scholarship_total: Decimal,
    pub current_inclusion: Decimal,
    pub federal_agi: Decimal,
    pub state_taxable_income: Option<Decimal>,
    /// Fraction; `None` falls back to settings, then the tax table.
    pub state_tax_rate: Option<Decimal>,
    /// LLC currently shown on the draft, for cross-checking only.
    pub reported_credit: Option<Decimal>,
}

/// Loads the tax table from `path`, or the built-in 2025 table when none is given.
pub fn load_tax_table(path: Option<&Path>) -> Result<TaxYearConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading tax table");
            TaxTableLoader::load_from_file(path)
                .with_context(|| format!("Failed to load tax table: {}", path.display()))
        }
        None => Ok(TaxYearConfig::for_2025()),
    }
}

/// Explicit rate, then the settings default, then the tax table default.
pub fn resolve_state_rate(
    explicit: Option<Decimal>,
    settings: &Settings,
    config: &TaxYearConfig,
) -> Decimal {
    explicit
        .or_else(|| settings.default_state_tax_rate())
        .unwrap_or(config.default_state_tax_rate)
}

/// Optimizes one draft return and renders the report.
pub fn run_optimize(
    config: &TaxYearConfig,
    settings: &Settings,
    request: &OptimizeRequest,
) -> Result<String> {
    let inputs = ScenarioInputs {
        tuition_paid: request.tuition_paid,
        scholarship_total: request.scholarship_total,
        current_inclusion: request.current_inclusion,
        federal_agi: request.federal_agi,
        state_taxable_income: request.state_taxable_income,
        state_tax_rate: resolve_state_rate(request.state_tax_rate, settings, config),
    };

    let outcome = ScholarshipOptimizer::new(config)
        .optimize(&inputs)
        .context("Failed to optimize scholarship inclusion")?;

    Ok(Report::new(&outcome, settings.materiality_threshold)
        .with_reported_credit(request.reported_credit)
        .render())
}

/// Optimizes every row of a scenario CSV and renders one summary line per row.
pub fn run_batch(
    config: &TaxYearConfig,
    settings: &Settings,
    path: &Path,
) -> Result<String> {
    let default_rate = resolve_state_rate(None, settings, config);
    let records = ScenarioCsvLoader::load_from_file(path, default_rate)
        .with_context(|| format!("Failed to load scenarios: {}", path.display()))?;
    info!(count = records.len(), path = %path.display(), "loaded scenarios");

    let optimizer = ScholarshipOptimizer::new(config);
    let mut out = String::new();
    for record in &records {
        let outcome = optimizer
            .optimize(&record.inputs)
            .with_context(|| format!("Failed to optimize row {}", record.row))?;
        out.push_str(&summary_line(
            &record.label,
            &outcome,
            settings.materiality_threshold,
        ));
        out.push('\n');
    }
    Ok(out)
}
