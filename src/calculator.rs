//! The salary calculator entry point.
//!
//! [`SalaryCalculator`] owns the loaded rule tables and exposes the two
//! operations consumed by the simulators and the enterprise payroll views:
//! gross-to-net and net-to-gross.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::{self, NetTarget};
use crate::config::{ConfigLoader, CountryRules, RuleBook};
use crate::error::EngineResult;
use crate::models::{Country, FamilyStatus, SalaryRequest, SalaryResult};

/// Computes payroll figures against a shared, immutable set of rule tables.
///
/// Cloning is cheap: clones share the same rule tables. Every method takes
/// `&self`, so a calculator can be used from many threads at once.
///
/// # Example
///
/// ```
/// use paye_engine::SalaryCalculator;
/// use paye_engine::models::{Country, FamilyStatus, SalaryRequest};
/// use rust_decimal::Decimal;
///
/// let calculator = SalaryCalculator::builtin().unwrap();
///
/// let result = calculator
///     .compute_net(&SalaryRequest::new(Decimal::from(350_000), Country::Togo))
///     .unwrap();
/// assert_eq!(result.cnss_employe, Decimal::from(31_500));
///
/// let gross = calculator
///     .compute_gross_from_net(
///         result.salaire_net,
///         FamilyStatus::Single,
///         0,
///         Decimal::ZERO,
///         Decimal::ZERO,
///         Country::Togo,
///     )
///     .unwrap();
/// assert!(gross <= Decimal::from(350_000));
/// ```
#[derive(Debug, Clone)]
pub struct SalaryCalculator {
    rules: Arc<RuleBook>,
    as_of: Option<NaiveDate>,
}

impl SalaryCalculator {
    /// Creates a calculator over the given rule tables.
    pub fn new(rules: RuleBook) -> Self {
        Self {
            rules: Arc::new(rules),
            as_of: None,
        }
    }

    /// Creates a calculator over the rule tables compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        Ok(Self::new(ConfigLoader::builtin()?.into_rule_book()))
    }

    /// Creates a calculator over the rule tables found in a directory.
    pub fn from_config_dir<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Ok(Self::new(ConfigLoader::load(path)?.into_rule_book()))
    }

    /// Returns a calculator that applies the rule tables effective on `date`
    /// instead of the latest ones.
    pub fn as_of(&self, date: NaiveDate) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
            as_of: Some(date),
        }
    }

    /// Returns the rule book this calculator reads from.
    pub fn rule_book(&self) -> &RuleBook {
        &self.rules
    }

    /// Returns the rule table applied for a country.
    ///
    /// # Errors
    ///
    /// Returns `CountryNotConfigured` if no table exists for the country, or
    /// `RulesNotFound` if none is effective on the pinned date.
    pub fn rules(&self, country: Country) -> EngineResult<&CountryRules> {
        match self.as_of {
            Some(date) => self.rules.rules_for(country, date),
            None => self.rules.latest(country),
        }
    }

    /// Converts a gross salary into net salary and every derived figure.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for negative or out-of-range amounts, or a
    /// rule lookup error if the country has no applicable table.
    pub fn compute_net(&self, request: &SalaryRequest) -> EngineResult<SalaryResult> {
        let rules = self.rules(request.country)?;
        calculation::compute_net(request, rules)
    }

    /// Finds the gross salary whose net salary is `target_net`.
    ///
    /// See [`calculation::compute_gross_from_net`] for the search contract.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for a non-positive target or negative
    /// allowances, and a `Convergence` error when no verified gross is found.
    pub fn compute_gross_from_net(
        &self,
        target_net: Decimal,
        family_status: FamilyStatus,
        children_count: u32,
        transport_bonus: Decimal,
        housing_bonus: Decimal,
        country: Country,
    ) -> EngineResult<Decimal> {
        let rules = self.rules(country)?;
        let target = NetTarget {
            target_net,
            family_status,
            children_count,
            transport_bonus,
            housing_bonus,
        };
        calculation::compute_gross_from_net(&target, rules)
    }
}
