//! Progressive income tax functionality (ITS in Bénin, IRPP in Togo).
//!
//! Each bracket `[lower, upper)` taxes only the slice of the taxable base
//! that falls inside it. Every bracket the base reaches (`base > lower`) is
//! reported, including zero-rate brackets; brackets above the base are
//! omitted, so a zero base yields no detail at all.

use rust_decimal::Decimal;

use crate::config::TaxBracket;
use crate::models::{AuditStep, TaxBracketDetail};

use super::common::{apply_rate, round_amount};

/// The result of the income tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Tax per bracket reached, ascending.
    pub details: Vec<TaxBracketDetail>,
    /// Sum of every detail.
    pub total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies the bracket table to a taxable base.
///
/// Brackets must be sorted ascending and contiguous, as enforced when rule
/// tables are loaded. Each slice tax is rounded to whole units before being
/// summed, so the total always equals the sum of the details.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_income_tax;
/// use paye_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let brackets = vec![
///     TaxBracket {
///         lower: Decimal::ZERO,
///         upper: Some(Decimal::from(60_000)),
///         rate: Decimal::ZERO,
///         label: None,
///     },
///     TaxBracket {
///         lower: Decimal::from(60_000),
///         upper: None,
///         rate: Decimal::from(10),
///         label: None,
///     },
/// ];
///
/// let result = calculate_income_tax(Decimal::from(100_000), &brackets, 3);
/// assert_eq!(result.details.len(), 2);
/// assert_eq!(result.total, Decimal::from(4_000));
/// ```
pub fn calculate_income_tax(
    taxable_base: Decimal,
    brackets: &[TaxBracket],
    step_number: u32,
) -> IncomeTaxResult {
    let details: Vec<TaxBracketDetail> = brackets
        .iter()
        .take_while(|bracket| taxable_base > bracket.lower)
        .map(|bracket| {
            let top = match bracket.upper {
                Some(upper) => taxable_base.min(upper),
                None => taxable_base,
            };
            TaxBracketDetail {
                tranche: bracket.display_label(),
                taux: bracket.rate.normalize(),
                impot: round_amount(apply_rate(top - bracket.lower, bracket.rate)),
            }
        })
        .collect();

    let total: Decimal = details.iter().map(|d| d.impot).sum();

    let reasoning = if details.is_empty() {
        "Taxable base is zero: no bracket reached".to_string()
    } else {
        let parts: Vec<String> = details
            .iter()
            .map(|d| format!("{} @ {}% = {}", d.tranche, d.taux, d.impot))
            .collect();
        format!("{}; total {}", parts.join("; "), total)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Progressive Income Tax".to_string(),
        input: serde_json::json!({
            "taxable_base": taxable_base.to_string(),
            "brackets": brackets.len()
        }),
        output: serde_json::json!({
            "brackets_reached": details.len(),
            "total": total.to_string()
        }),
        reasoning,
    };

    IncomeTaxResult {
        details,
        total,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(lower: &str, upper: Option<&str>, rate: &str) -> TaxBracket {
        TaxBracket {
            lower: dec(lower),
            upper: upper.map(dec),
            rate: dec(rate),
            label: None,
        }
    }

    fn benin_brackets() -> Vec<TaxBracket> {
        vec![
            bracket("0", Some("60000"), "0"),
            bracket("60000", Some("150000"), "10"),
            bracket("150000", Some("250000"), "15"),
            bracket("250000", Some("500000"), "19"),
            bracket("500000", None, "30"),
        ]
    }

    #[test]
    fn test_base_in_fourth_bracket() {
        let result = calculate_income_tax(dec("337400"), &benin_brackets(), 1);

        let taxes: Vec<Decimal> = result.details.iter().map(|d| d.impot).collect();
        assert_eq!(taxes, vec![dec("0"), dec("9000"), dec("15000"), dec("16606")]);
        assert_eq!(result.total, dec("40606"));
    }

    #[test]
    fn test_zero_rate_bracket_is_reported_when_reached() {
        let result = calculate_income_tax(dec("48200"), &benin_brackets(), 1);

        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].taux, dec("0"));
        assert_eq!(result.details[0].impot, dec("0"));
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn test_zero_base_reports_no_bracket() {
        let result = calculate_income_tax(Decimal::ZERO, &benin_brackets(), 1);

        assert!(result.details.is_empty());
        assert_eq!(result.total, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("no bracket reached"));
    }

    #[test]
    fn test_base_exactly_on_boundary_does_not_reach_next_bracket() {
        let result = calculate_income_tax(dec("150000"), &benin_brackets(), 1);

        assert_eq!(result.details.len(), 2);
        assert_eq!(result.total, dec("9000"));
    }

    #[test]
    fn test_top_bracket_is_unbounded() {
        let result = calculate_income_tax(dec("1000000"), &benin_brackets(), 1);

        assert_eq!(result.details.len(), 5);
        // 9000 + 15000 + 47500 + 150000
        assert_eq!(result.details[4].impot, dec("150000"));
        assert_eq!(result.total, dec("221500"));
    }

    #[test]
    fn test_details_are_ascending_and_non_negative() {
        let result = calculate_income_tax(dec("777777"), &benin_brackets(), 1);

        let rates: Vec<Decimal> = result.details.iter().map(|d| d.taux).collect();
        let mut sorted = rates.clone();
        sorted.sort();
        assert_eq!(rates, sorted);
        assert!(result.details.iter().all(|d| d.impot >= Decimal::ZERO));
    }

    #[test]
    fn test_total_equals_sum_of_rounded_details() {
        // 229320 - 75000 = 154320 × 3% = 4629.6 → 4630
        let brackets = vec![
            bracket("0", Some("75000"), "0"),
            bracket("75000", Some("250000"), "3"),
            bracket("250000", None, "10"),
        ];
        let result = calculate_income_tax(dec("229320"), &brackets, 1);

        assert_eq!(result.details[1].impot, dec("4630"));
        let sum: Decimal = result.details.iter().map(|d| d.impot).sum();
        assert_eq!(result.total, sum);
    }

    #[test]
    fn test_generated_labels() {
        let result = calculate_income_tax(dec("600000"), &benin_brackets(), 1);

        assert_eq!(result.details[0].tranche, "0 - 60000");
        assert_eq!(result.details[4].tranche, "> 500000");
    }
}
