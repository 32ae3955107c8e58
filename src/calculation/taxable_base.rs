//! Taxable base calculation functionality.
//!
//! This module derives the income subject to the bracket tax from the
//! contributable gross: the employee contribution, the flat professional
//! deduction and the family abatement are subtracted, and the result is
//! floored at zero.

use rust_decimal::Decimal;

use crate::config::{FamilyAbatement, ProfessionalDeduction};
use crate::models::{AuditStep, FamilyStatus};

use super::common::{apply_rate, floor_at_zero, round_amount};

/// The result of the taxable base calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct TaxableBaseResult {
    /// Flat professional-expense deduction applied.
    pub professional_deduction: Decimal,
    /// Family abatement applied.
    pub family_abatement: Decimal,
    /// Income subject to the bracket tax.
    pub taxable_base: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the professional deduction on the gross net of contribution.
///
/// The deduction is rounded to whole units, then capped.
pub fn professional_deduction(base: Decimal, deduction: &ProfessionalDeduction) -> Decimal {
    let amount = round_amount(apply_rate(floor_at_zero(base), deduction.rate));
    match deduction.cap {
        Some(cap) => amount.min(cap),
        None => amount,
    }
}

/// Calculates the family abatement for a status and number of children.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::family_abatement;
/// use paye_engine::config::FamilyAbatement;
/// use paye_engine::models::FamilyStatus;
/// use rust_decimal::Decimal;
///
/// let formula = FamilyAbatement {
///     spouse: Decimal::from(10_000),
///     spouse_statuses: vec![FamilyStatus::Married],
///     per_child: Decimal::from(10_000),
///     max_children: 6,
/// };
///
/// assert_eq!(family_abatement(FamilyStatus::Married, 2, &formula), Decimal::from(30_000));
/// assert_eq!(family_abatement(FamilyStatus::Single, 9, &formula), Decimal::from(60_000));
/// ```
pub fn family_abatement(
    family_status: FamilyStatus,
    children_count: u32,
    formula: &FamilyAbatement,
) -> Decimal {
    let spouse = if formula.spouse_statuses.contains(&family_status) {
        formula.spouse
    } else {
        Decimal::ZERO
    };
    let children = Decimal::from(children_count.min(formula.max_children));
    spouse + formula.per_child * children
}

/// Calculates the taxable base.
///
/// `baseImposable = totalBrut - cnssEmploye - professional deduction - family abatement`,
/// floored at zero.
pub fn calculate_taxable_base(
    total_brut: Decimal,
    employee_contribution: Decimal,
    family_status: FamilyStatus,
    children_count: u32,
    deduction: &ProfessionalDeduction,
    abatement: &FamilyAbatement,
    step_number: u32,
) -> TaxableBaseResult {
    let after_contribution = total_brut - employee_contribution;
    let professional_deduction = professional_deduction(after_contribution, deduction);
    let family_abatement = family_abatement(family_status, children_count, abatement);

    let taxable_base =
        floor_at_zero(after_contribution - professional_deduction - family_abatement);

    let mut reasoning = format!(
        "{} - {} contribution - {} professional deduction - {} family abatement",
        total_brut, employee_contribution, professional_deduction, family_abatement
    );
    if taxable_base.is_zero() {
        reasoning.push_str(" = 0 (floored at zero)");
    } else {
        reasoning.push_str(&format!(" = {}", taxable_base));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "taxable_base".to_string(),
        rule_name: "Taxable Base".to_string(),
        input: serde_json::json!({
            "total_brut": total_brut.to_string(),
            "employee_contribution": employee_contribution.to_string(),
            "family_status": family_status.as_str(),
            "children_count": children_count,
            "professional_deduction_rate": deduction.rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "professional_deduction": professional_deduction.to_string(),
            "family_abatement": family_abatement.to_string(),
            "taxable_base": taxable_base.to_string()
        }),
        reasoning,
    };

    TaxableBaseResult {
        professional_deduction,
        family_abatement,
        taxable_base,
        audit_step,
    }
}
