//! Employer charges calculation functionality.
//!
//! The set of components comes from the rule table: Bénin reports four
//! named contributions, Togo a single aggregate.

use rust_decimal::Decimal;

use crate::config::EmployerChargeRule;
use crate::models::{AuditStep, EmployerChargeLine, EmployerCharges};

use super::common::{apply_rate, round_amount};

/// The result of the employer charges calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct EmployerChargesResult {
    /// Components and their total.
    pub charges: EmployerCharges,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates every employer component on the contributable gross.
///
/// Each component is rounded to whole units; the total is their sum.
pub fn calculate_employer_charges(
    total_brut: Decimal,
    rules: &[EmployerChargeRule],
    step_number: u32,
) -> EmployerChargesResult {
    let composantes: Vec<EmployerChargeLine> = rules
        .iter()
        .map(|rule| EmployerChargeLine {
            code: rule.code.clone(),
            libelle: rule.label.clone(),
            taux: rule.rate.normalize(),
            montant: round_amount(apply_rate(total_brut, rule.rate)),
        })
        .collect();

    let total: Decimal = composantes.iter().map(|c| c.montant).sum();

    let breakdown: serde_json::Map<String, serde_json::Value> = composantes
        .iter()
        .map(|c| (c.code.clone(), serde_json::Value::from(c.montant.to_string())))
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "employer_charges".to_string(),
        rule_name: "Employer Charges".to_string(),
        input: serde_json::json!({
            "total_brut": total_brut.to_string(),
            "components": rules.len()
        }),
        output: serde_json::json!({
            "breakdown": breakdown,
            "total": total.to_string()
        }),
        reasoning: format!(
            "{} component(s) on {} = {}",
            composantes.len(),
            total_brut,
            total
        ),
    };

    EmployerChargesResult {
        charges: EmployerCharges { total, composantes },
        audit_step,
    }
}
