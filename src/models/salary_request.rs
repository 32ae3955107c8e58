//! Salary request model and the enums it is built from.
//!
//! This module defines the [`SalaryRequest`] struct along with the
//! [`Country`] and [`FamilyStatus`] enums used to select rule tables and
//! family abatements.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest monetary amount accepted as input, in whole currency units.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Returns [`MAX_AMOUNT_UNITS`] as a decimal.
pub fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT_UNITS)
}

/// The country whose rule table applies to a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    /// République du Bénin (ITS, CNSS 3.6 %).
    Benin,
    /// République Togolaise (IRPP, CNSS 9 %).
    Togo,
}

impl Country {
    /// Every country with a shipped rule table.
    pub const ALL: [Country; 2] = [Country::Benin, Country::Togo];

    /// Returns the lowercase identifier used in configuration paths and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Benin => "benin",
            Self::Togo => "togo",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = EngineError;

    /// Parses a country name, ignoring case and the accent on "Bénin".
    ///
    /// # Examples
    ///
    /// ```
    /// use paye_engine::models::Country;
    ///
    /// assert_eq!("Bénin".parse::<Country>().unwrap(), Country::Benin);
    /// assert!("ghana".parse::<Country>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "benin" | "bénin" => Ok(Self::Benin),
            "togo" => Ok(Self::Togo),
            other => Err(EngineError::validation(
                "country",
                format!("unknown country '{}'", other),
            )),
        }
    }
}

/// Marital status of the employee, used for the family abatement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyStatus {
    /// Célibataire.
    #[default]
    Single,
    /// Marié(e).
    Married,
    /// Divorcé(e).
    Divorced,
    /// Veuf / veuve.
    Widowed,
}

impl FamilyStatus {
    /// Returns the lowercase identifier used in configuration and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
            Self::Divorced => "divorced",
            Self::Widowed => "widowed",
        }
    }
}

impl fmt::Display for FamilyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "celibataire" | "célibataire" => Ok(Self::Single),
            "married" | "marie" | "marié" | "mariée" => Ok(Self::Married),
            "divorced" | "divorce" | "divorcé" | "divorcée" => Ok(Self::Divorced),
            "widowed" | "veuf" | "veuve" => Ok(Self::Widowed),
            other => Err(EngineError::validation(
                "familyStatus",
                format!("unknown family status '{}'", other),
            )),
        }
    }
}

/// The input of a gross-to-net calculation.
///
/// Field names serialize in camelCase, matching the simulator forms.
///
/// # Example
///
/// ```
/// use paye_engine::models::{Country, FamilyStatus, SalaryRequest};
/// use rust_decimal::Decimal;
///
/// let request = SalaryRequest::new(Decimal::from(350_000), Country::Benin)
///     .with_family(FamilyStatus::Married, 2)
///     .with_bonuses(Decimal::from(20_000), Decimal::ZERO);
///
/// assert_eq!(request.children_count, 2);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRequest {
    /// Monthly gross base salary, in whole currency units.
    pub gross_salary: Decimal,
    /// Marital status of the employee.
    #[serde(default)]
    pub family_status: FamilyStatus,
    /// Number of dependent children.
    #[serde(default)]
    pub children_count: u32,
    /// Monthly transport allowance.
    #[serde(default)]
    pub transport_bonus: Decimal,
    /// Monthly housing allowance.
    #[serde(default)]
    pub housing_bonus: Decimal,
    /// Whether a 13th month is paid; only affects the annual projection.
    #[serde(default)]
    pub include_thirteenth_month: bool,
    /// The country whose rules apply.
    pub country: Country,
}

impl SalaryRequest {
    /// Creates a request for a single employee with no children or allowances.
    pub fn new(gross_salary: Decimal, country: Country) -> Self {
        Self {
            gross_salary,
            family_status: FamilyStatus::Single,
            children_count: 0,
            transport_bonus: Decimal::ZERO,
            housing_bonus: Decimal::ZERO,
            include_thirteenth_month: false,
            country,
        }
    }

    /// Sets the family status and number of children.
    pub fn with_family(mut self, family_status: FamilyStatus, children_count: u32) -> Self {
        self.family_status = family_status;
        self.children_count = children_count;
        self
    }

    /// Sets the transport and housing allowances.
    pub fn with_bonuses(mut self, transport_bonus: Decimal, housing_bonus: Decimal) -> Self {
        self.transport_bonus = transport_bonus;
        self.housing_bonus = housing_bonus;
        self
    }

    /// Includes or excludes the 13th month from the annual projection.
    pub fn with_thirteenth_month(mut self, include: bool) -> Self {
        self.include_thirteenth_month = include;
        self
    }

    /// Checks that every amount is within `[0, MAX_AMOUNT_UNITS]`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] naming the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        check_amount("grossSalary", self.gross_salary)?;
        check_amount("transportBonus", self.transport_bonus)?;
        check_amount("housingBonus", self.housing_bonus)?;
        Ok(())
    }
}

/// Rejects negative amounts and amounts above [`MAX_AMOUNT_UNITS`].
pub(crate) fn check_amount(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::validation(
            field,
            format!("must not be negative (got {})", value),
        ));
    }
    if value > max_amount() {
        return Err(EngineError::validation(
            field,
            format!("must not exceed {} (got {})", MAX_AMOUNT_UNITS, value),
        ));
    }
    Ok(())
}
