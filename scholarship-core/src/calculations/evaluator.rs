//! Scenario evaluation for a single taxable-scholarship amount.
//!
//! For a candidate inclusion amount the evaluator works through:
//!
//! | Step | Figure |
//! |------|--------|
//! | 1    | Clamp inclusion to Box 5 |
//! | 2    | AGI = (draft AGI - draft inclusion) + inclusion |
//! | 3    | Federal taxable = AGI - federal standard deduction, minimum 0 |
//! | 4    | Federal tax from the progressive bracket schedule |
//! | 5    | State taxable = AGI - state standard deduction + adjustment, minimum 0 |
//! | 6    | State tax = state taxable × flat rate |
//! | 7    | Qualified expenses = Box 1 - tax-free scholarship, minimum 0 |
//! | 8    | Credit = min(cap, rate × expenses, federal tax) |
//! | 9    | Net position = credit - (federal tax + state tax) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use scholarship_core::calculations::{RunConstants, ScenarioEvaluator};
//! use scholarship_core::{ScenarioInputs, TaxYearConfig};
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
//! let constants = RunConstants::derive(&config, &inputs);
//! let evaluator = ScenarioEvaluator::new(&config, &inputs, constants);
//! let result = evaluator.evaluate(dec!(7900));
//!
//! assert_eq!(result.federal_tax, dec!(1428.18));
//! assert_eq!(result.credit, dec!(1428.18));
//! assert_eq!(result.net_position, dec!(-717.7825));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::floor_at_zero;
use crate::{ScenarioInputs, ScenarioResult, TaxBracket, TaxYearConfig};

/// Values derived once per run from the draft return and passed to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConstants {
    /// Draft AGI with the currently reported scholarship backed out.
    pub base_federal_income: Decimal,

    /// Reconciles the reported state taxable income with the AGI-driven
    /// formula, so alternative inclusions keep the state return's own
    /// additions and deductions. Zero when no state return is filed.
    pub state_adjustment_factor: Decimal,
}

impl RunConstants {
    pub fn derive(
        config: &TaxYearConfig,
        inputs: &ScenarioInputs,
    ) -> Self {
        let state_adjustment_factor = match inputs.state_filing() {
            Some(state_taxable) => {
                state_taxable - (inputs.federal_agi - config.state_standard_deduction)
            }
            None => Decimal::ZERO,
        };

        Self {
            base_federal_income: inputs.federal_agi - inputs.current_inclusion,
            state_adjustment_factor,
        }
    }
}

/// Computes tax on `taxable_income` from an ascending progressive schedule.
///
/// Each band taxes only the income that falls inside it. Iteration stops as
/// soon as the income is used up. Income left over after a bounded final
/// bracket is untaxed; validated tables always end with an open-ended bracket.
pub fn progressive_tax(
    brackets: &[TaxBracket],
    taxable_income: Decimal,
) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut remaining = taxable_income;
    let mut previous_limit = Decimal::ZERO;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }
        let in_band = match bracket.max_income {
            Some(limit) => remaining.min(limit - previous_limit),
            None => remaining,
        };
        tax += in_band * bracket.tax_rate;
        remaining -= in_band;
        if let Some(limit) = bracket.max_income {
            previous_limit = limit;
        }
    }

    tax
}

/// Prices one inclusion amount against a fixed draft return.
///
/// The evaluator holds no mutable state: evaluating the same amount twice
/// gives identical results.
#[derive(Debug, Clone)]
pub struct ScenarioEvaluator<'a> {
    config: &'a TaxYearConfig,
    inputs: &'a ScenarioInputs,
    constants: RunConstants,
}

impl<'a> ScenarioEvaluator<'a> {
    pub fn new(
        config: &'a TaxYearConfig,
        inputs: &'a ScenarioInputs,
        constants: RunConstants,
    ) -> Self {
        Self {
            config,
            inputs,
            constants,
        }
    }

    /// Computes the complete scenario for `inclusion_amount`.
    ///
    /// Amounts above the scholarship total are clamped down to it. Amounts
    /// below the legal floor are evaluated as given; enforcing the floor is
    /// the optimizer's job.
    pub fn evaluate(
        &self,
        inclusion_amount: Decimal,
    ) -> ScenarioResult {
        let inclusion = inclusion_amount.min(self.inputs.scholarship_total);
        let agi = self.constants.base_federal_income + inclusion;

        let federal_tax = progressive_tax(
            &self.config.federal_brackets,
            self.federal_taxable_income(agi),
        );
        let state_tax = self.state_taxable_income(agi) * self.inputs.state_tax_rate;

        let expenses_to_claim = self.qualified_expenses(inclusion);
        let credit = self.usable_credit(expenses_to_claim, federal_tax);

        ScenarioResult {
            inclusion,
            agi,
            federal_tax,
            state_tax,
            credit,
            expenses_to_claim,
            net_position: credit - (federal_tax + state_tax),
        }
    }

    fn federal_taxable_income(
        &self,
        agi: Decimal,
    ) -> Decimal {
        floor_at_zero(agi - self.config.federal_standard_deduction)
    }

    fn state_taxable_income(
        &self,
        agi: Decimal,
    ) -> Decimal {
        floor_at_zero(
            agi - self.config.state_standard_deduction + self.constants.state_adjustment_factor,
        )
    }

    /// Box 1 expenses not already covered by tax-free scholarship.
    fn qualified_expenses(
        &self,
        inclusion: Decimal,
    ) -> Decimal {
        let tax_free_scholarship = floor_at_zero(self.inputs.scholarship_total - inclusion);
        floor_at_zero(self.inputs.tuition_paid - tax_free_scholarship)
    }

    /// Non-refundable: never more than the federal tax it offsets.
    fn usable_credit(
        &self,
        expenses_to_claim: Decimal,
        federal_tax: Decimal,
    ) -> Decimal {
        let potential = self
            .config
            .credit_cap
            .min(expenses_to_claim * self.config.credit_rate);
        potential.min(federal_tax)
    }
}
