use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::OptimizerError;
use crate::models::TaxBracket;

/// Per-year constants used by the scenario evaluator.
///
/// Everything that changes from one filing season to the next lives here so
/// the search logic never needs touching for a new year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub federal_standard_deduction: Decimal,
    pub state_standard_deduction: Decimal,
    /// Ordered from lowest to highest band; the last bracket must be open-ended.
    pub federal_brackets: Vec<TaxBracket>,
    /// Share of qualified expenses the credit is worth (Lifetime Learning Credit: 20%).
    pub credit_rate: Decimal,
    pub credit_cap: Decimal,
    /// Flat state rate used when the caller does not supply one.
    pub default_state_tax_rate: Decimal,
}

impl TaxYearConfig {
    /// 2025 single-filer federal schedule and North Carolina flat-rate constants.
    pub fn for_2025() -> Self {
        Self {
            tax_year: 2025,
            federal_standard_deduction: Decimal::new(15750, 0),
            state_standard_deduction: Decimal::new(12750, 0),
            federal_brackets: vec![
                TaxBracket::bounded(Decimal::new(11925, 0), Decimal::new(10, 2)),
                TaxBracket::bounded(Decimal::new(48475, 0), Decimal::new(12, 2)),
                TaxBracket::bounded(Decimal::new(103350, 0), Decimal::new(22, 2)),
                TaxBracket::unbounded(Decimal::new(24, 2)),
            ],
            credit_rate: Decimal::new(20, 2),
            credit_cap: Decimal::new(2000, 0),
            default_state_tax_rate: Decimal::new(425, 4),
        }
    }

    /// Checks that the table can drive a progressive tax calculation.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::InvalidTaxTable`] if the bracket list is empty,
    /// bounds are not strictly ascending, the open-ended bracket is missing or
    /// not last, any rate falls outside `[0, 1]`, or a deduction or the credit
    /// cap is negative.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.federal_brackets.is_empty() {
            return Err(self.invalid("no federal brackets provided"));
        }

        let last = self.federal_brackets.len() - 1;
        let mut previous = Decimal::ZERO;
        for (idx, bracket) in self.federal_brackets.iter().enumerate() {
            if !is_fraction(bracket.tax_rate) {
                return Err(self.invalid(format!(
                    "bracket {} rate {} is outside [0, 1]",
                    idx + 1,
                    bracket.tax_rate
                )));
            }
            match bracket.max_income {
                Some(max_income) if idx == last => {
                    return Err(self.invalid(format!(
                        "top bracket must be open-ended (found max_income {max_income})"
                    )));
                }
                Some(max_income) if max_income <= previous => {
                    return Err(self.invalid(format!(
                        "bracket {} max_income {} is not above {}",
                        idx + 1,
                        max_income,
                        previous
                    )));
                }
                Some(max_income) => previous = max_income,
                None if idx != last => {
                    return Err(self.invalid(format!(
                        "bracket {} is open-ended but is not the top bracket",
                        idx + 1
                    )));
                }
                None => {}
            }
        }

        if self.federal_standard_deduction < Decimal::ZERO {
            return Err(self.invalid("federal standard deduction is negative"));
        }
        if self.state_standard_deduction < Decimal::ZERO {
            return Err(self.invalid("state standard deduction is negative"));
        }
        if self.credit_cap < Decimal::ZERO {
            return Err(self.invalid("credit cap is negative"));
        }
        if !is_fraction(self.credit_rate) {
            return Err(self.invalid("credit rate is outside [0, 1]"));
        }
        if !is_fraction(self.default_state_tax_rate) {
            return Err(self.invalid("default state tax rate is outside [0, 1]"));
        }

        Ok(())
    }

    fn invalid(
        &self,
        reason: impl Into<String>,
    ) -> OptimizerError {
        OptimizerError::InvalidTaxTable {
            tax_year: self.tax_year,
            reason: reason.into(),
        }
    }
}

fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}
