//! Salary result models for the salary engine.
//!
//! This module contains the [`SalaryResult`] type and its associated structures
//! that capture all outputs of a gross-to-net calculation, including the
//! income tax breakdown, employer charges, annual projection and audit trace.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Country;

/// The tax due on one income-tax bracket.
///
/// # Example
///
/// ```
/// use paye_engine::models::TaxBracketDetail;
/// use rust_decimal::Decimal;
///
/// let detail = TaxBracketDetail {
///     tranche: "60 001 - 150 000".to_string(),
///     taux: Decimal::from(10),
///     impot: Decimal::from(9_000),
/// };
/// assert_eq!(detail.impot, Decimal::from(9_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracketDetail {
    /// Human-readable bracket label.
    pub tranche: String,
    /// Marginal rate of the bracket, in percent.
    pub taux: Decimal,
    /// Tax due on the slice of income falling in this bracket only.
    pub impot: Decimal,
}

/// One employer-side contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerChargeLine {
    /// Stable identifier (e.g. "prestationsFamiliales").
    pub code: String,
    /// Display label.
    pub libelle: String,
    /// Rate applied to the contributable gross, in percent.
    pub taux: Decimal,
    /// Amount due.
    pub montant: Decimal,
}

/// Employer-side contributions and their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerCharges {
    /// Sum of every component amount.
    pub total: Decimal,
    /// Components in rule-table order.
    pub composantes: Vec<EmployerChargeLine>,
}

impl EmployerCharges {
    /// Looks up a component by its code.
    pub fn component(&self, code: &str) -> Option<&EmployerChargeLine> {
        self.composantes.iter().find(|c| c.code == code)
    }
}

/// Annual figures derived from the monthly result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualProjection {
    /// Number of salaries paid in the year (12, or 13 with a 13th month).
    pub mois: u32,
    /// Annual gross.
    pub brut_annuel: Decimal,
    /// Annual net salary.
    pub net_annuel: Decimal,
    /// Annual employer cost.
    pub cout_annuel: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a gross-to-net calculation.
///
/// Results carry no identifier or timestamp: two identical requests against
/// the same rule table produce equal results. Field names serialize in
/// camelCase, matching the simulator screens.
///
/// Invariants:
/// - `salaire_net + cnss_employe + impots == total_brut`
/// - `cout_total == total_brut + charges_patronales.total + avantages_exoneres`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryResult {
    /// The country whose rules were applied.
    pub country: Country,
    /// Effective date of the rule table version used.
    pub rules_effective_date: NaiveDate,
    /// Gross base plus the taxable portion of allowances.
    pub total_brut: Decimal,
    /// Employee social contribution.
    pub cnss_employe: Decimal,
    /// Flat professional-expense deduction.
    pub deduction_professionnelle: Decimal,
    /// Family abatement.
    pub abattement_familial: Decimal,
    /// Income subject to the bracket tax.
    pub base_imposable: Decimal,
    /// Tax per bracket reached, ascending.
    pub impots_details: Vec<TaxBracketDetail>,
    /// Total income tax.
    pub impots: Decimal,
    /// `total_brut - cnss_employe - impots`.
    pub salaire_net: Decimal,
    /// Exempt portion of allowances, paid on top of the net.
    pub avantages_exoneres: Decimal,
    /// `salaire_net + avantages_exoneres`.
    pub net_a_payer: Decimal,
    /// Net as a percentage of `total_brut`.
    pub taux_net: Decimal,
    /// Employee contribution plus tax as a percentage of `total_brut`.
    pub taux_prelevement: Decimal,
    /// Employer-side contributions.
    pub charges_patronales: EmployerCharges,
    /// Total employer cost.
    pub cout_total: Decimal,
    /// Annual figures.
    pub projection_annuelle: AnnualProjection,
    /// Record of every rule applied.
    pub audit_trace: AuditTrace,
}

impl SalaryResult {
    /// Total deducted from the employee (contribution plus tax).
    pub fn total_prelevements(&self) -> Decimal {
        self.cnss_employe + self.impots
    }
}
