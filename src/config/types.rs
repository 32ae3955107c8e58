//! Configuration types for country rule tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML rule tables. Rates are expressed in
//! percent, amounts in whole currency units per month.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Country, FamilyStatus};

/// The employee-side social contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRate {
    /// Display label (e.g. "CNSS part salariale").
    pub label: String,
    /// Rate applied to the contributable gross, in percent.
    pub rate: Decimal,
}

/// One employer-side contribution component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerChargeRule {
    /// Stable identifier reported in results.
    pub code: String,
    /// Display label.
    pub label: String,
    /// Rate applied to the contributable gross, in percent.
    pub rate: Decimal,
}

/// Flat professional-expense deduction applied before the bracket tax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalDeduction {
    /// Share of the gross net of contribution that is deducted, in percent.
    pub rate: Decimal,
    /// Monthly ceiling of the deduction, if any.
    #[serde(default)]
    pub cap: Option<Decimal>,
}

/// Family abatement: fixed monthly amounts subtracted from the taxable base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyAbatement {
    /// Amount granted for a spouse.
    #[serde(default)]
    pub spouse: Decimal,
    /// Statuses that qualify for the spouse amount.
    #[serde(default)]
    pub spouse_statuses: Vec<FamilyStatus>,
    /// Amount granted per dependent child.
    #[serde(default)]
    pub per_child: Decimal,
    /// Maximum number of children taken into account.
    #[serde(default)]
    pub max_children: u32,
}

/// Exemption threshold of a single allowance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceExemption {
    /// Portion of the allowance that is exempt from contributions and tax.
    #[serde(default)]
    pub exempt_up_to: Decimal,
}

/// Exemption thresholds of the transport and housing allowances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceExemptions {
    /// Transport allowance.
    #[serde(default)]
    pub transport: AllowanceExemption,
    /// Housing allowance.
    #[serde(default)]
    pub housing: AllowanceExemption,
}

/// A progressive income-tax bracket `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound (inclusive of the slice start).
    pub lower: Decimal,
    /// Upper bound; `None` for the top bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Marginal rate, in percent.
    pub rate: Decimal,
    /// Display label; generated from the bounds when absent.
    #[serde(default)]
    pub label: Option<String>,
}

impl TaxBracket {
    /// Returns the configured label, or one built from the bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use paye_engine::config::TaxBracket;
    /// use rust_decimal::Decimal;
    ///
    /// let bracket = TaxBracket {
    ///     lower: Decimal::from(60_000),
    ///     upper: Some(Decimal::from(150_000)),
    ///     rate: Decimal::from(10),
    ///     label: None,
    /// };
    /// assert_eq!(bracket.display_label(), "60000 - 150000");
    /// ```
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match self.upper {
            Some(upper) => format!("{} - {}", self.lower.normalize(), upper.normalize()),
            None => format!("> {}", self.lower.normalize()),
        }
    }
}

/// A complete rule table for one country, effective from a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRules {
    /// The country this table applies to.
    pub country: Country,
    /// Human-readable name of the rule set.
    pub name: String,
    /// ISO currency code.
    pub currency: String,
    /// Date from which this version applies.
    pub effective_date: NaiveDate,
    /// Where the figures come from.
    #[serde(default)]
    pub source: String,
    /// Statutory monthly minimum wage (SMIG).
    pub minimum_wage: Decimal,
    /// Employee-side social contribution.
    pub employee_contribution: ContributionRate,
    /// Employer-side components, in reporting order.
    pub employer_charges: Vec<EmployerChargeRule>,
    /// Flat professional-expense deduction.
    #[serde(default)]
    pub professional_deduction: ProfessionalDeduction,
    /// Family abatement formula.
    #[serde(default)]
    pub family_abatement: FamilyAbatement,
    /// Allowance exemption thresholds.
    #[serde(default)]
    pub allowances: AllowanceExemptions,
    /// Income-tax brackets, ascending.
    pub brackets: Vec<TaxBracket>,
}

impl CountryRules {
    /// Sum of every employer component rate, in percent.
    pub fn employer_rate(&self) -> Decimal {
        self.employer_charges.iter().map(|c| c.rate).sum()
    }

    /// Checks the table for inconsistencies the calculation relies on.
    ///
    /// The net-to-gross search assumes net salary never decreases as gross
    /// grows, which holds when every rate is below 100 % and brackets tile
    /// `[0, ∞)` in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleTable`] describing the first problem.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidRuleTable {
            country: self.country,
            message,
        };

        check_rate(self.employee_contribution.rate, "employee contribution").map_err(invalid)?;
        check_rate(self.professional_deduction.rate, "professional deduction").map_err(invalid)?;
        for charge in &self.employer_charges {
            check_rate(charge.rate, &format!("employer charge '{}'", charge.code))
                .map_err(invalid)?;
        }

        let non_negative = [
            ("minimum_wage", self.minimum_wage),
            ("family_abatement.spouse", self.family_abatement.spouse),
            ("family_abatement.per_child", self.family_abatement.per_child),
            ("allowances.transport", self.allowances.transport.exempt_up_to),
            ("allowances.housing", self.allowances.housing.exempt_up_to),
        ];
        for (name, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(invalid(format!("{} must not be negative", name)));
            }
        }
        if let Some(cap) = self.professional_deduction.cap {
            if cap < Decimal::ZERO {
                return Err(invalid(
                    "professional_deduction.cap must not be negative".to_string(),
                ));
            }
        }

        self.validate_brackets().map_err(invalid)
    }

    fn validate_brackets(&self) -> Result<(), String> {
        let first = self
            .brackets
            .first()
            .ok_or_else(|| "no tax brackets defined".to_string())?;
        if !first.lower.is_zero() {
            return Err(format!("first bracket starts at {} instead of 0", first.lower));
        }

        for (index, bracket) in self.brackets.iter().enumerate() {
            check_rate(bracket.rate, &format!("bracket {}", index + 1))?;
            let is_last = index + 1 == self.brackets.len();

            match (bracket.upper, is_last) {
                (None, true) => {}
                (None, false) => {
                    return Err(format!("bracket {} is unbounded but not last", index + 1));
                }
                (Some(_), true) => {
                    return Err("last bracket must be unbounded".to_string());
                }
                (Some(upper), false) => {
                    if upper <= bracket.lower {
                        return Err(format!("bracket {} has upper <= lower", index + 1));
                    }
                    let next = &self.brackets[index + 1];
                    if next.lower != upper {
                        return Err(format!(
                            "brackets {} and {} are not contiguous ({} != {})",
                            index + 1,
                            index + 2,
                            upper,
                            next.lower
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_rate(rate: Decimal, what: &str) -> Result<(), String> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE_HUNDRED {
        return Err(format!("{} rate {} is outside [0, 100)", what, rate));
    }
    Ok(())
}

/// Every loaded rule table, grouped by country and sorted by effective date.
///
/// # Example
///
/// ```
/// use paye_engine::config::ConfigLoader;
/// use paye_engine::models::Country;
///
/// let book = ConfigLoader::builtin().unwrap().into_rule_book();
/// let rules = book.latest(Country::Togo).unwrap();
/// assert_eq!(rules.employee_contribution.rate.to_string(), "9");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    tables: BTreeMap<Country, Vec<CountryRules>>,
}

impl RuleBook {
    /// Builds a rule book, validating every table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleTable`] if a table is inconsistent or
    /// two tables share a country and effective date.
    pub fn new(tables: Vec<CountryRules>) -> EngineResult<Self> {
        let mut grouped: BTreeMap<Country, Vec<CountryRules>> = BTreeMap::new();

        for table in tables {
            table.validate()?;
            grouped.entry(table.country).or_default().push(table);
        }

        for (country, versions) in grouped.iter_mut() {
            versions.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
            if let Some(pair) = versions
                .windows(2)
                .find(|w| w[0].effective_date == w[1].effective_date)
            {
                return Err(EngineError::InvalidRuleTable {
                    country: *country,
                    message: format!("two tables effective on {}", pair[0].effective_date),
                });
            }
        }

        Ok(Self { tables: grouped })
    }

    /// Returns the countries that have at least one table.
    pub fn countries(&self) -> impl Iterator<Item = Country> + '_ {
        self.tables.keys().copied()
    }

    /// Returns every version for a country, oldest first.
    pub fn versions(&self, country: Country) -> &[CountryRules] {
        self.tables.get(&country).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the most recent table for a country.
    pub fn latest(&self, country: Country) -> EngineResult<&CountryRules> {
        self.versions(country)
            .last()
            .ok_or(EngineError::CountryNotConfigured { country })
    }

    /// Returns the most recent table effective on or before `date`.
    pub fn rules_for(&self, country: Country, date: NaiveDate) -> EngineResult<&CountryRules> {
        let versions = self.versions(country);
        if versions.is_empty() {
            return Err(EngineError::CountryNotConfigured { country });
        }
        versions
            .iter()
            .rfind(|r| r.effective_date <= date)
            .ok_or(EngineError::RulesNotFound { country, date })
    }
}
