//! Gross-to-net calculation.
//!
//! This module chains the individual steps (allowance exemptions, employee
//! contribution, taxable base, income tax, employer charges) into a complete
//! [`SalaryResult`] for one country rule table.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::CountryRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AnnualProjection, AuditStep, AuditTrace, AuditWarning, SalaryRequest, SalaryResult,
};

use super::allowances::apply_allowance_exemptions;
use super::common::percent_of;
use super::employer_charges::calculate_employer_charges;
use super::income_tax::calculate_income_tax;
use super::social_contribution::calculate_employee_contribution;
use super::taxable_base::calculate_taxable_base;

/// Warning code recorded when the gross base is below the minimum wage.
pub const BELOW_MINIMUM_WAGE: &str = "BELOW_MINIMUM_WAGE";

/// Computes every payroll figure for a request under one rule table.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if an amount is negative or too large,
/// or if `rules` belong to a different country than the request.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::compute_net;
/// use paye_engine::config::ConfigLoader;
/// use paye_engine::models::{Country, SalaryRequest};
/// use rust_decimal::Decimal;
///
/// let book = ConfigLoader::builtin().unwrap().into_rule_book();
/// let rules = book.latest(Country::Benin).unwrap();
///
/// let request = SalaryRequest::new(Decimal::from(350_000), Country::Benin);
/// let result = compute_net(&request, rules).unwrap();
///
/// assert_eq!(result.cnss_employe, Decimal::from(12_600));
/// assert_eq!(result.salaire_net + result.cnss_employe + result.impots, result.total_brut);
/// ```
pub fn compute_net(request: &SalaryRequest, rules: &CountryRules) -> EngineResult<SalaryResult> {
    request.validate()?;
    if request.country != rules.country {
        return Err(EngineError::validation(
            "country",
            format!(
                "request is for {} but the rule table is for {}",
                request.country, rules.country
            ),
        ));
    }

    let mut steps: Vec<AuditStep> = Vec::with_capacity(6);
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let allowances = apply_allowance_exemptions(
        request.gross_salary,
        request.transport_bonus,
        request.housing_bonus,
        &rules.allowances,
        step_number,
    );
    let total_brut = allowances.total_brut;
    let avantages_exoneres = allowances.exempt_total;
    steps.push(allowances.audit_step);
    step_number += 1;

    let contribution =
        calculate_employee_contribution(total_brut, &rules.employee_contribution, step_number);
    let cnss_employe = contribution.amount;
    steps.push(contribution.audit_step);
    step_number += 1;

    let base = calculate_taxable_base(
        total_brut,
        cnss_employe,
        request.family_status,
        request.children_count,
        &rules.professional_deduction,
        &rules.family_abatement,
        step_number,
    );
    steps.push(base.audit_step);
    step_number += 1;

    let tax = calculate_income_tax(base.taxable_base, &rules.brackets, step_number);
    steps.push(tax.audit_step);
    step_number += 1;

    let salaire_net = total_brut - cnss_employe - tax.total;
    let net_a_payer = salaire_net + avantages_exoneres;

    let employer = calculate_employer_charges(total_brut, &rules.employer_charges, step_number);
    steps.push(employer.audit_step);
    step_number += 1;

    let cout_total = total_brut + employer.charges.total + avantages_exoneres;

    let projection = project_annual(
        request.include_thirteenth_month,
        total_brut,
        salaire_net,
        cout_total,
        step_number,
    );
    steps.push(projection.1);

    if request.gross_salary > Decimal::ZERO && request.gross_salary < rules.minimum_wage {
        warn!(
            country = %rules.country,
            gross = %request.gross_salary,
            minimum_wage = %rules.minimum_wage,
            "Gross salary below minimum wage"
        );
        warnings.push(AuditWarning {
            code: BELOW_MINIMUM_WAGE.to_string(),
            message: format!(
                "Gross salary {} is below the {} minimum wage of {}",
                request.gross_salary, rules.country, rules.minimum_wage
            ),
            severity: "medium".to_string(),
        });
    }

    debug!(
        country = %rules.country,
        gross = %request.gross_salary,
        total_brut = %total_brut,
        net = %salaire_net,
        "Net salary computed"
    );

    Ok(SalaryResult {
        country: rules.country,
        rules_effective_date: rules.effective_date,
        total_brut,
        cnss_employe,
        deduction_professionnelle: base.professional_deduction,
        abattement_familial: base.family_abatement,
        base_imposable: base.taxable_base,
        impots_details: tax.details,
        impots: tax.total,
        salaire_net,
        avantages_exoneres,
        net_a_payer,
        taux_net: percent_of(salaire_net, total_brut),
        taux_prelevement: percent_of(cnss_employe + tax.total, total_brut),
        charges_patronales: employer.charges,
        cout_total,
        projection_annuelle: projection.0,
        audit_trace: AuditTrace { steps, warnings },
    })
}

/// Projects monthly figures over a year of 12 or 13 salaries.
fn project_annual(
    include_thirteenth_month: bool,
    total_brut: Decimal,
    salaire_net: Decimal,
    cout_total: Decimal,
    step_number: u32,
) -> (AnnualProjection, AuditStep) {
    let mois: u32 = if include_thirteenth_month { 13 } else { 12 };
    let months = Decimal::from(mois);

    let projection = AnnualProjection {
        mois,
        brut_annuel: total_brut * months,
        net_annuel: salaire_net * months,
        cout_annuel: cout_total * months,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "annual_projection".to_string(),
        rule_name: "Annual Projection".to_string(),
        input: serde_json::json!({
            "include_thirteenth_month": include_thirteenth_month
        }),
        output: serde_json::json!({
            "months": mois,
            "brut_annuel": projection.brut_annuel.to_string(),
            "net_annuel": projection.net_annuel.to_string()
        }),
        reasoning: if include_thirteenth_month {
            "13th month included: 13 salaries per year".to_string()
        } else {
            "12 salaries per year".to_string()
        },
    };

    (projection, audit_step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{Country, FamilyStatus};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rules(country: Country) -> CountryRules {
        ConfigLoader::builtin()
            .unwrap()
            .rule_book()
            .latest(country)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_benin_350000_single() {
        let request = SalaryRequest::new(dec("350000"), Country::Benin);
        let result = compute_net(&request, &rules(Country::Benin)).unwrap();

        assert_eq!(result.total_brut, dec("350000"));
        assert_eq!(result.cnss_employe, dec("12600"));
        assert_eq!(result.base_imposable, dec("337400"));
        assert_eq!(result.impots, dec("40606"));
        assert_eq!(result.salaire_net, dec("296794"));
        assert_eq!(result.charges_patronales.total, dec("74900"));
        assert_eq!(result.cout_total, dec("424900"));
        assert_eq!(result.taux_net, dec("84.80"));
        assert_eq!(result.taux_prelevement, dec("15.20"));
    }

    #[test]
    fn test_togo_350000_single() {
        let request = SalaryRequest::new(dec("350000"), Country::Togo);
        let result = compute_net(&request, &rules(Country::Togo)).unwrap();

        assert_eq!(result.cnss_employe, dec("31500"));
        assert_eq!(result.deduction_professionnelle, dec("89180"));
        assert_eq!(result.base_imposable, dec("229320"));
        assert_eq!(result.impots, dec("4630"));
        assert_eq!(result.salaire_net, dec("313870"));
        assert_eq!(result.charges_patronales.total, dec("75250"));
        assert_eq!(result.cout_total, dec("425250"));
    }

    #[test]
    fn test_exempt_allowance_is_added_to_take_home_and_cost() {
        let request = SalaryRequest::new(dec("350000"), Country::Benin)
            .with_bonuses(dec("40000"), dec("0"));
        let result = compute_net(&request, &rules(Country::Benin)).unwrap();

        assert_eq!(result.total_brut, dec("360000"));
        assert_eq!(result.avantages_exoneres, dec("30000"));
        assert_eq!(result.net_a_payer, result.salaire_net + dec("30000"));
        assert_eq!(
            result.cout_total,
            result.total_brut + result.charges_patronales.total + dec("30000")
        );
        assert_eq!(
            result.salaire_net + result.cnss_employe + result.impots,
            result.total_brut
        );
    }

    #[test]
    fn test_thirteenth_month_changes_projection_only() {
        let base = SalaryRequest::new(dec("350000"), Country::Benin);
        let with_13th = base.clone().with_thirteenth_month(true);

        let monthly = compute_net(&base, &rules(Country::Benin)).unwrap();
        let annual = compute_net(&with_13th, &rules(Country::Benin)).unwrap();

        assert_eq!(monthly.salaire_net, annual.salaire_net);
        assert_eq!(monthly.projection_annuelle.mois, 12);
        assert_eq!(annual.projection_annuelle.mois, 13);
        assert_eq!(annual.projection_annuelle.brut_annuel, dec("4550000"));
        assert_eq!(annual.projection_annuelle.net_annuel, dec("296794") * dec("13"));
    }

    #[test]
    fn test_below_minimum_wage_records_warning_and_no_tax() {
        let request = SalaryRequest::new(dec("50000"), Country::Benin);
        let result = compute_net(&request, &rules(Country::Benin)).unwrap();

        assert_eq!(result.impots, Decimal::ZERO);
        assert_eq!(result.audit_trace.warnings.len(), 1);
        assert_eq!(result.audit_trace.warnings[0].code, BELOW_MINIMUM_WAGE);
    }

    #[test]
    fn test_zero_gross_yields_zero_figures() {
        let request = SalaryRequest::new(Decimal::ZERO, Country::Togo);
        let result = compute_net(&request, &rules(Country::Togo)).unwrap();

        assert_eq!(result.salaire_net, Decimal::ZERO);
        assert_eq!(result.taux_net, Decimal::ZERO);
        assert!(result.impots_details.is_empty());
        assert!(result.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_negative_gross_is_rejected() {
        let request = SalaryRequest::new(dec("-1"), Country::Benin);
        let result = compute_net(&request, &rules(Country::Benin));

        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_mismatched_rules_are_rejected() {
        let request = SalaryRequest::new(dec("350000"), Country::Togo);

        match compute_net(&request, &rules(Country::Benin)) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "country"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_audit_trace_steps_are_numbered() {
        let request = SalaryRequest::new(dec("350000"), Country::Togo)
            .with_family(FamilyStatus::Married, 2);
        let result = compute_net(&request, &rules(Country::Togo)).unwrap();

        let ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "allowance_exemption",
                "employee_contribution",
                "taxable_base",
                "income_tax",
                "employer_charges",
                "annual_projection"
            ]
        );
        let numbers: Vec<u32> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_identical_requests_produce_equal_results() {
        let request = SalaryRequest::new(dec("275000"), Country::Benin);
        let rules = rules(Country::Benin);

        assert_eq!(
            compute_net(&request, &rules).unwrap(),
            compute_net(&request, &rules).unwrap()
        );
    }
}
