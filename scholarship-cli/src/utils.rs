use rust_decimal::Decimal;
use thiserror::Error;

/// Highest state rate the optimizer accepts on the command line, in percent.
pub const MAX_STATE_RATE_PERCENT: Decimal = Decimal::from_parts(7, 0, 0, false, 0);

/// Error returned when a command-line value cannot be used as an amount or rate.
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid decimal '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("'{input}' must not be negative")]
    Negative { input: String },

    #[error("state rate {input}% is outside 0 to 7%")]
    RateOutOfRange { input: String },
}

/// Normalizes input for decimal parsing: trims whitespace and removes the
/// dollar sign and commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace([',', '$'], "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator and a leading `$` (e.g. `"$1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized
        .parse()
        .map_err(|source| ParseDecimalError::Invalid {
            input: s.to_string(),
            source,
        })
}

/// Parses a non-negative currency amount.
pub fn parse_currency(s: &str) -> Result<Decimal, ParseDecimalError> {
    let value = parse_decimal(s)?;
    if value < Decimal::ZERO {
        return Err(ParseDecimalError::Negative {
            input: s.to_string(),
        });
    }
    Ok(value)
}

/// Parses a state rate given in percent (`4.25`) and returns it as a fraction (`0.0425`).
pub fn parse_rate_percent(s: &str) -> Result<Decimal, ParseDecimalError> {
    let percent = parse_decimal(s)?;
    if percent < Decimal::ZERO || percent > MAX_STATE_RATE_PERCENT {
        return Err(ParseDecimalError::RateOutOfRange {
            input: s.to_string(),
        });
    }
    Ok(percent / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_accepts_dollar_sign() {
        assert_eq!(parse_decimal("$14,235").unwrap(), dec!(14235));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(matches!(
            parse_decimal("abc"),
            Err(ParseDecimalError::Invalid { .. })
        ));
    }

    #[test]
    fn parse_decimal_error_message_names_the_input() {
        // Parsing runs before logging is set up, so the message is all the user sees
        let err = parse_currency("12x4").unwrap_err();

        assert!(err.to_string().starts_with("invalid decimal '12x4': "));
    }

    #[test]
    fn parse_currency_rejects_negative() {
        assert!(matches!(
            parse_currency("-100"),
            Err(ParseDecimalError::Negative { .. })
        ));
    }

    #[test]
    fn parse_rate_percent_converts_to_fraction() {
        assert_eq!(parse_rate_percent("4.25").unwrap(), dec!(0.0425));
        assert_eq!(parse_rate_percent("0").unwrap(), dec!(0));
        assert_eq!(parse_rate_percent("7").unwrap(), dec!(0.07));
    }

    #[test]
    fn parse_rate_percent_rejects_out_of_range() {
        assert!(matches!(
            parse_rate_percent("7.01"),
            Err(ParseDecimalError::RateOutOfRange { .. })
        ));
        assert!(parse_rate_percent("-1").is_err());
    }
}
