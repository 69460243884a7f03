//! Plain-text rendering of an optimization outcome.
//!
//! A material improvement produces step-by-step entry instructions and a
//! side-by-side breakdown of the draft and optimized returns; anything else
//! reports that the draft is already optimal.

use std::fmt::Write;

use rust_decimal::Decimal;
use scholarship_core::calculations::common::round_whole_dollars;
use scholarship_core::{OptimizationOutcome, ScenarioResult};

/// Formats a dollar amount rounded to whole dollars: `$1,234`, `-$710`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_whole_dollars(value);
    let digits = rounded.abs().to_string();
    let grouped = group_thousands(&digits);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Formats a change in net position with an explicit sign: `+$8`, `-$512`.
pub fn format_change(value: Decimal) -> String {
    if round_whole_dollars(value) < Decimal::ZERO {
        format_currency(value)
    } else {
        format!("+{}", format_currency(value))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders an outcome for a single draft return.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    outcome: &'a OptimizationOutcome,
    threshold: Decimal,
    reported_credit: Option<Decimal>,
}

impl<'a> Report<'a> {
    pub fn new(
        outcome: &'a OptimizationOutcome,
        threshold: Decimal,
    ) -> Self {
        Self {
            outcome,
            threshold,
            reported_credit: None,
        }
    }

    /// Lifetime Learning Credit shown on the draft (Form 8863 / Schedule 3 line 19).
    /// Only used to flag a mismatch with the recomputed draft.
    pub fn with_reported_credit(
        mut self,
        reported_credit: Option<Decimal>,
    ) -> Self {
        self.reported_credit = reported_credit;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_warnings(&mut out);
        if self.outcome.is_material(self.threshold) {
            self.render_opportunity(&mut out);
        } else {
            out.push_str("The current return is already optimized. No changes needed.\n");
        }
        out
    }

    fn render_warnings(
        &self,
        out: &mut String,
    ) {
        let manual = &self.outcome.manual_result;
        if self.outcome.manual_below_floor() {
            let _ = writeln!(
                out,
                "Warning: the draft reports {} of taxable scholarship, below the required minimum of {}.",
                format_currency(manual.inclusion),
                format_currency(self.outcome.min_inclusion)
            );
        }
        if let Some(reported) = self.reported_credit {
            if round_whole_dollars(reported) != round_whole_dollars(manual.credit) {
                let _ = writeln!(
                    out,
                    "Note: the draft shows an LLC of {}, but the recomputed draft credit is {}.",
                    format_currency(reported),
                    format_currency(manual.credit)
                );
            }
        }
    }

    fn render_opportunity(
        &self,
        out: &mut String,
    ) {
        let best = &self.outcome.best_result;
        let _ = writeln!(
            out,
            "Opportunity Found: {} for the client!",
            format_change(self.outcome.difference())
        );
        out.push('\n');
        out.push_str("Step-by-Step TaxSlayer Instructions\n");
        out.push_str(
            "Allocate the expenses and income manually. Do not enter the 1098-T as printed.\n\n",
        );
        out.push_str("Step 1: Enter the Taxable Scholarship\n");
        out.push_str("  Federal Section > Income > Less Common Income > Other Compensation > Scholarships and Grants\n");
        let _ = writeln!(out, "  Enter exactly {}.", format_currency(best.inclusion));
        out.push('\n');
        out.push_str("Step 2: Claim the Education Credit\n");
        out.push_str("  Federal Section > Deductions > Credits > Education Credits\n");
        out.push_str("  Answer the qualifying questions and proceed to the 1098-T entry.\n");
        let _ = writeln!(
            out,
            "  Tuition Paid: {}",
            format_currency(best.expenses_to_claim)
        );
        out.push_str("  Scholarships and Grants: $0 (leave blank)\n");
        out.push('\n');
        out.push_str("The Math Breakdown\n");
        out.push_str(&breakdown_table(&self.outcome.manual_result, best));
        if let Some(reported) = self.reported_credit {
            let _ = writeln!(
                out,
                "{:<24}{:>16}{:>16}",
                "LLC on Draft",
                format_currency(reported),
                ""
            );
        }
    }
}

/// Side-by-side comparison of the draft and optimized scenarios.
pub fn breakdown_table(
    current: &ScenarioResult,
    optimized: &ScenarioResult,
) -> String {
    let rows: [(&str, Decimal, Decimal); 5] = [
        ("Scholarship as Income", current.inclusion, optimized.inclusion),
        ("Federal AGI", current.agi, optimized.agi),
        ("Fed Tax Liability", current.federal_tax, optimized.federal_tax),
        ("State Tax Liability", current.state_tax, optimized.state_tax),
        ("LLC Generated", current.credit, optimized.credit),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "{:<24}{:>16}{:>16}", "Metric", "Current Return", "Optimized");
    let _ = writeln!(out, "{}", "-".repeat(56));
    for (metric, current, optimized) in rows {
        let _ = writeln!(
            out,
            "{:<24}{:>16}{:>16}",
            metric,
            format_currency(current),
            format_currency(optimized)
        );
    }
    out
}

/// One line per draft for batch runs.
pub fn summary_line(
    label: &str,
    outcome: &OptimizationOutcome,
    threshold: Decimal,
) -> String {
    let verdict = if outcome.is_material(threshold) {
        format!(
            "report {} taxable, claim {} tuition",
            format_currency(outcome.best_result.inclusion),
            format_currency(outcome.best_result.expenses_to_claim)
        )
    } else {
        "already optimal".to_string()
    };
    let floor_flag = if outcome.manual_below_floor() {
        " [draft below minimum]"
    } else {
        ""
    };
    format!(
        "{label}: {verdict} ({}){floor_flag}",
        format_change(outcome.difference())
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use scholarship_core::calculations::DEFAULT_MATERIALITY_THRESHOLD;
    use scholarship_core::{ScenarioInputs, ScholarshipOptimizer, TaxYearConfig};

    use super::*;

    fn sample_outcome() -> OptimizationOutcome {
        let config = TaxYearConfig::for_2025();
        let inputs = ScenarioInputs {
            tuition_paid: dec!(13552),
            scholarship_total: dec!(14235),
            current_inclusion: dec!(7900),
            federal_agi: dec!(29639),
            state_taxable_income: Some(dec!(16889)),
            state_tax_rate: dec!(0.0425),
        };
        ScholarshipOptimizer::new(&config).optimize(&inputs).unwrap()
    }

    // =========================================================================
    // format_currency tests
    // =========================================================================

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(14235)), "$14,235");
        assert_eq!(format_currency(dec!(1234567.49)), "$1,234,567");
        assert_eq!(format_currency(dec!(999)), "$999");
    }

    #[test]
    fn format_currency_rounds_half_up() {
        assert_eq!(format_currency(dec!(717.7825)), "$718");
        assert_eq!(format_currency(dec!(8.075)), "$8");
    }

    #[test]
    fn format_currency_handles_negative_and_zero() {
        assert_eq!(format_currency(dec!(-1245.625)), "-$1,246");
        assert_eq!(format_currency(dec!(-0.4)), "$0");
        assert_eq!(format_currency(dec!(0.00)), "$0");
    }

    #[test]
    fn format_change_carries_sign() {
        assert_eq!(format_change(dec!(8.075)), "+$8");
        assert_eq!(format_change(dec!(0)), "+$0");
        assert_eq!(format_change(dec!(-512.50)), "-$513");
    }

    #[test]
    fn summary_line_flags_draft_below_floor() {
        let config = TaxYearConfig::for_2025();
        let inputs = ScenarioInputs {
            tuition_paid: dec!(1000),
            scholarship_total: dec!(5000),
            current_inclusion: dec!(0),
            federal_agi: dec!(20000),
            state_taxable_income: None,
            state_tax_rate: dec!(0.0425),
        };
        let outcome = ScholarshipOptimizer::new(&config).optimize(&inputs).unwrap();

        assert_eq!(
            summary_line("late", &outcome, DEFAULT_MATERIALITY_THRESHOLD),
            "late: already optimal (-$513) [draft below minimum]"
        );
    }

    // =========================================================================
    // Report tests
    // =========================================================================

    #[test]
    fn render_material_outcome_includes_instructions_and_table() {
        let outcome = sample_outcome();

        let text = Report::new(&outcome, DEFAULT_MATERIALITY_THRESHOLD).render();

        assert!(text.contains("Opportunity Found: +$8 for the client!"));
        assert!(text.contains("Enter exactly $7,710."));
        assert!(text.contains("Tuition Paid: $7,027"));
        assert!(text.contains(&format!(
            "{:<24}{:>16}{:>16}",
            "Federal AGI", "$29,639", "$29,449"
        )));
        assert!(text.contains(&format!(
            "{:<24}{:>16}{:>16}",
            "State Tax Liability", "$718", "$710"
        )));
    }

    #[test]
    fn render_immaterial_outcome_reports_already_optimal() {
        let outcome = sample_outcome();

        let text = Report::new(&outcome, dec!(10)).render();

        assert_eq!(
            text,
            "The current return is already optimized. No changes needed.\n"
        );
    }

    #[test]
    fn render_flags_credit_mismatch() {
        let outcome = sample_outcome();

        let text = Report::new(&outcome, dec!(10))
            .with_reported_credit(Some(dec!(1420)))
            .render();

        assert!(text.contains("draft shows an LLC of $1,420"));
        assert!(text.contains("recomputed draft credit is $1,428"));
    }

    #[test]
    fn render_material_outcome_shows_draft_credit_row() {
        let outcome = sample_outcome();

        let with_credit = Report::new(&outcome, DEFAULT_MATERIALITY_THRESHOLD)
            .with_reported_credit(Some(dec!(1420)))
            .render();
        let without_credit = Report::new(&outcome, DEFAULT_MATERIALITY_THRESHOLD).render();

        assert!(with_credit.contains(&format!(
            "{:<24}{:>16}{:>16}\n",
            "LLC on Draft", "$1,420", ""
        )));
        assert!(!without_credit.contains("LLC on Draft"));
    }

    #[test]
    fn render_skips_matching_credit() {
        let outcome = sample_outcome();

        let text = Report::new(&outcome, dec!(10))
            .with_reported_credit(Some(dec!(1428)))
            .render();

        assert!(!text.contains("Note:"));
    }

    #[test]
    fn summary_line_for_material_outcome() {
        let outcome = sample_outcome();

        assert_eq!(
            summary_line("sample", &outcome, DEFAULT_MATERIALITY_THRESHOLD),
            "sample: report $7,710 taxable, claim $7,027 tuition (+$8)"
        );
    }
}
