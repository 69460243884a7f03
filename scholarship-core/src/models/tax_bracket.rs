use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of a progressive rate schedule.
///
/// The band starts where the previous bracket's `max_income` ends (or at zero
/// for the first bracket). `max_income` of `None` marks the open-ended top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    #[serde(default)]
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        max_income: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            max_income: Some(max_income),
            tax_rate,
        }
    }

    pub fn unbounded(tax_rate: Decimal) -> Self {
        Self {
            max_income: None,
            tax_rate,
        }
    }
}
