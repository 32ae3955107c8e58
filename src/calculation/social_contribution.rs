//! Employee social contribution functionality.

use rust_decimal::Decimal;

use crate::config::ContributionRate;
use crate::models::AuditStep;

use super::common::{apply_rate, round_amount};

/// The result of calculating the employee contribution, including the audit step.
#[derive(Debug, Clone)]
pub struct EmployeeContributionResult {
    /// The contribution withheld from the employee, in whole units.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee-side social contribution on the contributable gross.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_employee_contribution;
/// use paye_engine::config::ContributionRate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = ContributionRate {
///     label: "CNSS part salariale".to_string(),
///     rate: Decimal::from_str("3.6").unwrap(),
/// };
///
/// let result = calculate_employee_contribution(Decimal::from(350_000), &rate, 2);
/// assert_eq!(result.amount, Decimal::from(12_600));
/// ```
pub fn calculate_employee_contribution(
    total_brut: Decimal,
    contribution: &ContributionRate,
    step_number: u32,
) -> EmployeeContributionResult {
    let amount = round_amount(apply_rate(total_brut, contribution.rate));

    let audit_step = AuditStep {
        step_number,
        rule_id: "employee_contribution".to_string(),
        rule_name: contribution.label.clone(),
        input: serde_json::json!({
            "total_brut": total_brut.to_string(),
            "rate": contribution.rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "{} × {}% = {}",
            total_brut,
            contribution.rate.normalize(),
            amount
        ),
    };

    EmployeeContributionResult { amount, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rate(value: &str) -> ContributionRate {
        ContributionRate {
            label: "CNSS part salariale".to_string(),
            rate: dec(value),
        }
    }

    #[test]
    fn test_benin_rate_on_350000() {
        let result = calculate_employee_contribution(dec("350000"), &rate("3.6"), 1);
        assert_eq!(result.amount, dec("12600"));
    }

    #[test]
    fn test_togo_rate_on_350000() {
        let result = calculate_employee_contribution(dec("350000"), &rate("9"), 1);
        assert_eq!(result.amount, dec("31500"));
    }

    #[test]
    fn test_contribution_is_rounded_to_whole_units() {
        // 123457 × 3.6% = 4444.452
        let result = calculate_employee_contribution(dec("123457"), &rate("3.6"), 1);
        assert_eq!(result.amount, dec("4444"));
    }

    #[test]
    fn test_zero_gross_yields_zero_contribution() {
        let result = calculate_employee_contribution(Decimal::ZERO, &rate("9"), 1);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_audit_step_uses_configured_label() {
        let result = calculate_employee_contribution(dec("100000"), &rate("9"), 4);

        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.rule_name, "CNSS part salariale");
        assert_eq!(result.audit_step.output["amount"], "9000");
        assert_eq!(result.audit_step.reasoning, "100000 × 9% = 9000");
    }
}
