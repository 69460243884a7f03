//! Two-stage search for the taxable-scholarship amount with the best net position.
//!
//! # Search Structure
//!
//! 1. **Floor**: scholarship in excess of Box 1 is always taxable, so the
//!    domain is `[max(0, Box 5 - Box 1), Box 5]`.
//! 2. **Coarse stage**: every [`COARSE_STEP`] from the floor while below Box 5,
//!    then Box 5 itself. Ties keep the earlier candidate.
//! 3. **Fine stage**: every whole-dollar amount within one coarse step of the
//!    coarse winner. Ties go to the later (larger) candidate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use scholarship_core::{ScenarioInputs, ScholarshipOptimizer, TaxYearConfig};
//!
//! let config = TaxYearConfig::for_2025();
//! let inputs = ScenarioInputs {
//!     tuition_paid: dec!(13552),
//!     scholarship_total: dec!(14235),
//!     current_inclusion: dec!(7900),
//!     federal_agi: dec!(29639),
//!     state_taxable_income: Some(dec!(16889)),
//!     state_tax_rate: dec!(0.0425),
//! };
//!
//! let outcome = ScholarshipOptimizer::new(&config).optimize(&inputs).unwrap();
//!
//! assert_eq!(outcome.min_inclusion, dec!(683));
//! assert_eq!(outcome.best_result.inclusion, dec!(7710));
//! assert!(outcome.difference() >= dec!(0));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculations::common::floor_at_zero;
use crate::calculations::evaluator::{RunConstants, ScenarioEvaluator};
use crate::{OptimizerError, ScenarioInputs, ScenarioResult, TaxYearConfig};

/// Spacing of the coarse grid, and the half-width of the fine window.
pub const COARSE_STEP: Decimal = Decimal::ONE_HUNDRED;

/// Smallest improvement worth asking a preparer to amend the draft for.
pub const DEFAULT_MATERIALITY_THRESHOLD: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// The as-filed scenario alongside the best scenario found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// The draft return exactly as entered, even when its inclusion is below
    /// the legal floor.
    pub manual_result: ScenarioResult,

    pub best_result: ScenarioResult,

    /// Scholarship that must be reported as taxable regardless of allocation.
    pub min_inclusion: Decimal,

    /// Number of scenarios priced during the search.
    pub evaluations: usize,
}

impl OptimizationOutcome {
    /// Improvement in net position over the draft return.
    ///
    /// Can be negative when the draft reports less than the legal floor.
    pub fn difference(&self) -> Decimal {
        self.best_result.net_position - self.manual_result.net_position
    }

    /// Whether the improvement is large enough to recommend changing the return.
    pub fn is_material(
        &self,
        threshold: Decimal,
    ) -> bool {
        self.difference() > threshold
    }

    /// Whether the draft reports less taxable scholarship than the law requires.
    pub fn manual_below_floor(&self) -> bool {
        self.manual_result.inclusion < self.min_inclusion
    }
}

/// Searches the legally valid inclusion range for the best net position.
#[derive(Debug, Clone)]
pub struct ScholarshipOptimizer<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> ScholarshipOptimizer<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Finds the best inclusion amount and prices the draft return.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError`] if:
    /// - the tax table is not usable
    /// - any input is negative, or the state rate is outside `[0, 1]`
    pub fn optimize(
        &self,
        inputs: &ScenarioInputs,
    ) -> Result<OptimizationOutcome, OptimizerError> {
        self.config.validate()?;
        inputs.validate()?;

        let constants = RunConstants::derive(self.config, inputs);
        let evaluator = ScenarioEvaluator::new(self.config, inputs, constants);

        let min_inclusion = min_inclusion(inputs);
        let baseline = safe_baseline_inclusion(inputs, min_inclusion);
        if baseline != inputs.current_inclusion {
            warn!(
                current_inclusion = %inputs.current_inclusion,
                %min_inclusion,
                "draft inclusion is below the legal floor; seeding search from the floor"
            );
        }

        let mut evaluations = 1;
        let seed = evaluator.evaluate(baseline);

        let candidates = coarse_candidates(min_inclusion, inputs.scholarship_total);
        evaluations += candidates.len();
        let best_coarse = coarse_search(&evaluator, &candidates, seed);
        debug!(
            inclusion = %best_coarse.inclusion,
            net_position = %best_coarse.net_position,
            "coarse stage complete"
        );

        let (start, end) = fine_window(
            min_inclusion,
            inputs.scholarship_total,
            best_coarse.inclusion,
        );
        let (best_result, fine_evaluations) = fine_search(&evaluator, start, end, best_coarse);
        evaluations += fine_evaluations;
        debug!(%start, %end, "fine stage complete");

        let manual_result = evaluator.evaluate(inputs.current_inclusion);
        evaluations += 1;

        let outcome = OptimizationOutcome {
            manual_result,
            best_result,
            min_inclusion,
            evaluations,
        };
        info!(
            best_inclusion = %outcome.best_result.inclusion,
            difference = %outcome.difference(),
            evaluations,
            "optimization complete"
        );

        Ok(outcome)
    }
}

/// Scholarship in excess of qualified expenses is always taxable.
fn min_inclusion(inputs: &ScenarioInputs) -> Decimal {
    floor_at_zero(inputs.scholarship_total - inputs.tuition_paid)
}

/// Draft inclusion raised to the floor, used only to seed the coarse stage.
fn safe_baseline_inclusion(
    inputs: &ScenarioInputs,
    min_inclusion: Decimal,
) -> Decimal {
    inputs.current_inclusion.max(min_inclusion)
}

/// Step grid from the floor up to (not including) the total, then the total itself.
///
/// The grid is irregular near the top on purpose: the exact scholarship total
/// is always tested even when it is not a multiple of the step.
fn coarse_candidates(
    min_inclusion: Decimal,
    scholarship_total: Decimal,
) -> Vec<Decimal> {
    let mut candidates = Vec::new();
    let mut inclusion = min_inclusion;
    while inclusion < scholarship_total {
        candidates.push(inclusion);
        inclusion += COARSE_STEP;
    }
    candidates.push(scholarship_total);
    candidates
}

/// Strict improvement only, so earlier candidates win ties.
fn coarse_search(
    evaluator: &ScenarioEvaluator<'_>,
    candidates: &[Decimal],
    seed: ScenarioResult,
) -> ScenarioResult {
    candidates.iter().fold(seed, |best, &inclusion| {
        let result = evaluator.evaluate(inclusion);
        if result.net_position > best.net_position {
            result
        } else {
            best
        }
    })
}

/// Whole-dollar bounds within one coarse step of `best_coarse`, kept inside the legal range.
fn fine_window(
    min_inclusion: Decimal,
    scholarship_total: Decimal,
    best_coarse: Decimal,
) -> (Decimal, Decimal) {
    let start = min_inclusion.max(best_coarse - COARSE_STEP).ceil();
    let end = scholarship_total.min(best_coarse + COARSE_STEP).floor();
    (start, end)
}

/// Non-strict improvement, so the largest of equally good amounts wins.
///
/// Returns the winner and the number of amounts evaluated.
fn fine_search(
    evaluator: &ScenarioEvaluator<'_>,
    start: Decimal,
    end: Decimal,
    best_coarse: ScenarioResult,
) -> (ScenarioResult, usize) {
    let mut best = best_coarse;
    let mut evaluated = 0;
    let mut inclusion = start;
    while inclusion <= end {
        let result = evaluator.evaluate(inclusion);
        evaluated += 1;
        if result.net_position >= best.net_position {
            best = result;
        }
        inclusion += Decimal::ONE;
    }
    (best, evaluated)
}
