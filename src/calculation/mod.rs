//! Calculation logic for the salary engine.
//!
//! This module contains the calculation steps of a gross-to-net conversion
//! (allowance exemptions, employee contribution, taxable base, progressive
//! income tax, employer charges), the function chaining them into a full
//! result, and the numeric net-to-gross search.

mod allowances;
mod common;
mod employer_charges;
mod gross_from_net;
mod income_tax;
mod net_salary;
mod social_contribution;
mod taxable_base;

pub use allowances::{AllowanceResult, apply_allowance_exemptions};
pub use common::{apply_rate, percent_of, round_amount, round_percent};
pub use employer_charges::{EmployerChargesResult, calculate_employer_charges};
pub use gross_from_net::{EPSILON, MAX_ITERATIONS, NetTarget, compute_gross_from_net};
pub use income_tax::{IncomeTaxResult, calculate_income_tax};
pub use net_salary::{BELOW_MINIMUM_WAGE, compute_net};
pub use social_contribution::{EmployeeContributionResult, calculate_employee_contribution};
pub use taxable_base::{
    TaxableBaseResult, calculate_taxable_base, family_abatement, professional_deduction,
};
