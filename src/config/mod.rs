//! Country rule tables for the salary engine.
//!
//! This module provides functionality to load rule tables from YAML files:
//! contribution rates, employer charges, deductions, family abatements,
//! allowance exemptions and income-tax brackets, one file per country and
//! effective date.
//!
//! # Example
//!
//! ```
//! use paye_engine::config::ConfigLoader;
//! use paye_engine::models::Country;
//!
//! let loader = ConfigLoader::builtin().unwrap();
//! let rules = loader.rule_book().latest(Country::Benin).unwrap();
//! println!("Loaded rule table: {}", rules.name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowanceExemption, AllowanceExemptions, ContributionRate, CountryRules, EmployerChargeRule,
    FamilyAbatement, ProfessionalDeduction, RuleBook, TaxBracket,
};
