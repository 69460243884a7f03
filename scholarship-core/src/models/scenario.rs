use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::OptimizerError;

/// Figures taken from the 1098-T and the draft return, supplied once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    /// 1098-T Box 1: qualified tuition and related expenses.
    pub tuition_paid: Decimal,

    /// 1098-T Box 5: total scholarships and grants.
    pub scholarship_total: Decimal,

    /// Scholarship currently reported as taxable income on the draft return.
    pub current_inclusion: Decimal,

    /// Federal AGI on the draft return. Already includes `current_inclusion`.
    pub federal_agi: Decimal,

    /// State taxable income on the draft return.
    /// `None` or zero means no state return is being filed.
    pub state_taxable_income: Option<Decimal>,

    /// Flat state income tax rate as a fraction (0.0425 for 4.25%).
    pub state_tax_rate: Decimal,
}

impl ScenarioInputs {
    /// State taxable income, if a state return is being filed.
    pub fn state_filing(&self) -> Option<Decimal> {
        self.state_taxable_income
            .filter(|amount| *amount > Decimal::ZERO)
    }

    /// Rejects negative amounts and a state rate outside `[0, 1]`.
    ///
    /// Negative values are caller errors and are never clamped away.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        non_negative("tuition_paid", self.tuition_paid)?;
        non_negative("scholarship_total", self.scholarship_total)?;
        non_negative("current_inclusion", self.current_inclusion)?;
        non_negative("federal_agi", self.federal_agi)?;
        if let Some(state_taxable_income) = self.state_taxable_income {
            non_negative("state_taxable_income", state_taxable_income)?;
        }
        if self.state_tax_rate < Decimal::ZERO || self.state_tax_rate > Decimal::ONE {
            return Err(OptimizerError::InvalidInput {
                field: "state_tax_rate",
                requirement: "between 0 and 1",
                value: self.state_tax_rate,
            });
        }
        Ok(())
    }
}

fn non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), OptimizerError> {
    if value < Decimal::ZERO {
        return Err(OptimizerError::InvalidInput {
            field,
            requirement: "non-negative",
            value,
        });
    }
    Ok(())
}

/// One fully computed tax scenario for a single inclusion amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Taxable scholarship used for this scenario, after clamping to Box 5.
    pub inclusion: Decimal,

    /// Federal AGI recomputed for this inclusion.
    pub agi: Decimal,

    pub federal_tax: Decimal,

    pub state_tax: Decimal,

    /// Usable (capped, non-refundable) education credit.
    pub credit: Decimal,

    /// Qualified expenses left after netting out tax-free scholarship.
    pub expenses_to_claim: Decimal,

    /// `credit - (federal_tax + state_tax)`. Higher is better.
    pub net_position: Decimal,
}

impl ScenarioResult {
    pub fn total_tax(&self) -> Decimal {
        self.federal_tax + self.state_tax
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_inputs() -> ScenarioInputs {
        ScenarioInputs {
            tuition_paid: dec!(13552),
            scholarship_total: dec!(14235),
            current_inclusion: dec!(7900),
            federal_agi: dec!(29639),
            state_taxable_income: Some(dec!(16889)),
            state_tax_rate: dec!(0.0425),
        }
    }

    #[test]
    fn validate_accepts_well_formed_inputs() {
        assert_eq!(test_inputs().validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_zero_values() {
        let inputs = ScenarioInputs {
            tuition_paid: dec!(0),
            scholarship_total: dec!(0),
            current_inclusion: dec!(0),
            federal_agi: dec!(0),
            state_taxable_income: None,
            state_tax_rate: dec!(0),
        };

        assert_eq!(inputs.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_tuition() {
        let inputs = ScenarioInputs {
            tuition_paid: dec!(-1),
            ..test_inputs()
        };

        assert_eq!(
            inputs.validate(),
            Err(OptimizerError::InvalidInput {
                field: "tuition_paid",
                requirement: "non-negative",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_state_taxable_income() {
        let inputs = ScenarioInputs {
            state_taxable_income: Some(dec!(-50)),
            ..test_inputs()
        };

        assert!(matches!(
            inputs.validate(),
            Err(OptimizerError::InvalidInput {
                field: "state_taxable_income",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let inputs = ScenarioInputs {
            state_tax_rate: dec!(4.25),
            ..test_inputs()
        };

        assert!(matches!(
            inputs.validate(),
            Err(OptimizerError::InvalidInput {
                field: "state_tax_rate",
                ..
            })
        ));
    }

    #[test]
    fn state_filing_treats_zero_as_absent() {
        let inputs = ScenarioInputs {
            state_taxable_income: Some(dec!(0)),
            ..test_inputs()
        };

        assert_eq!(inputs.state_filing(), None);
        assert_eq!(test_inputs().state_filing(), Some(dec!(16889)));
    }
}
