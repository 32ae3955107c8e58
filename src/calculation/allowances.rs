//! Allowance exemption functionality.
//!
//! This module splits the transport and housing allowances into an exempt
//! portion, paid untaxed, and a taxable excess added to the contributable
//! gross.

use rust_decimal::Decimal;

use crate::config::{AllowanceExemption, AllowanceExemptions};
use crate::models::AuditStep;

use super::common::floor_at_zero;

/// The result of applying allowance exemptions, including the audit step.
#[derive(Debug, Clone)]
pub struct AllowanceResult {
    /// Gross base plus the taxable excess of both allowances.
    pub total_brut: Decimal,
    /// Taxable excess of the transport allowance.
    pub taxable_transport: Decimal,
    /// Taxable excess of the housing allowance.
    pub taxable_housing: Decimal,
    /// Sum of the exempt portions of both allowances.
    pub exempt_total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Splits an allowance into `(exempt, taxable)` parts.
fn split(amount: Decimal, exemption: &AllowanceExemption) -> (Decimal, Decimal) {
    let exempt = amount.min(floor_at_zero(exemption.exempt_up_to));
    (exempt, amount - exempt)
}

/// Determines the contributable gross from the base salary and allowances.
///
/// Each allowance is exempt up to its country threshold; only the excess is
/// added to the gross subject to contributions and tax.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::apply_allowance_exemptions;
/// use paye_engine::config::{AllowanceExemption, AllowanceExemptions};
/// use rust_decimal::Decimal;
///
/// let exemptions = AllowanceExemptions {
///     transport: AllowanceExemption { exempt_up_to: Decimal::from(30_000) },
///     housing: AllowanceExemption { exempt_up_to: Decimal::ZERO },
/// };
///
/// let result = apply_allowance_exemptions(
///     Decimal::from(200_000),
///     Decimal::from(40_000),
///     Decimal::from(15_000),
///     &exemptions,
///     1,
/// );
///
/// assert_eq!(result.total_brut, Decimal::from(225_000));
/// assert_eq!(result.exempt_total, Decimal::from(30_000));
/// ```
pub fn apply_allowance_exemptions(
    gross_salary: Decimal,
    transport_bonus: Decimal,
    housing_bonus: Decimal,
    exemptions: &AllowanceExemptions,
    step_number: u32,
) -> AllowanceResult {
    let (exempt_transport, taxable_transport) = split(transport_bonus, &exemptions.transport);
    let (exempt_housing, taxable_housing) = split(housing_bonus, &exemptions.housing);

    let total_brut = gross_salary + taxable_transport + taxable_housing;
    let exempt_total = exempt_transport + exempt_housing;

    let reasoning = if transport_bonus.is_zero() && housing_bonus.is_zero() {
        format!("No allowances: contributable gross equals base salary {}", gross_salary)
    } else {
        format!(
            "{} base + {} taxable transport + {} taxable housing = {} ({} exempt)",
            gross_salary, taxable_transport, taxable_housing, total_brut, exempt_total
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "allowance_exemption".to_string(),
        rule_name: "Allowance Exemption".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "transport_bonus": transport_bonus.to_string(),
            "housing_bonus": housing_bonus.to_string(),
            "transport_exempt_up_to": exemptions.transport.exempt_up_to.to_string(),
            "housing_exempt_up_to": exemptions.housing.exempt_up_to.to_string()
        }),
        output: serde_json::json!({
            "taxable_transport": taxable_transport.to_string(),
            "taxable_housing": taxable_housing.to_string(),
            "exempt_total": exempt_total.to_string(),
            "total_brut": total_brut.to_string()
        }),
        reasoning,
    };

    AllowanceResult {
        total_brut,
        taxable_transport,
        taxable_housing,
        exempt_total,
        audit_step,
    }
}
