//! Error types for the salary engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing payroll figures
//! or loading country rule tables.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Country;

/// The main error type for the salary engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use paye_engine::error::EngineError;
///
/// let error = EngineError::Validation {
///     field: "grossSalary".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid field 'grossSalary': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An input value was malformed or out of its domain.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The net-to-gross search could not produce a verified gross salary.
    #[error("No gross salary found for net {target} after {iterations} iterations: {message}")]
    Convergence {
        /// The net salary that was targeted.
        target: Decimal,
        /// The number of net computations performed before giving up.
        iterations: u32,
        /// Why the search stopped.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rule table was parsed but its content is inconsistent.
    #[error("Invalid rule table for {country}: {message}")]
    InvalidRuleTable {
        /// The country the table belongs to.
        country: Country,
        /// A description of the inconsistency.
        message: String,
    },

    /// No rule table was loaded for the country.
    #[error("No rule table configured for {country}")]
    CountryNotConfigured {
        /// The requested country.
        country: Country,
    },

    /// No rule table is effective for the country on the given date.
    #[error("No rule table for {country} effective on {date}")]
    RulesNotFound {
        /// The requested country.
        country: Country,
        /// The date for which rules were requested.
        date: NaiveDate,
    },
}

impl EngineError {
    /// Builds a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors caused by caller input rather than configuration.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::validation("transportBonus", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid field 'transportBonus': must not be negative"
        );
        assert!(error.is_validation());
    }

    #[test]
    fn test_convergence_displays_target_and_iterations() {
        let error = EngineError::Convergence {
            target: Decimal::from_str("250000").unwrap(),
            iterations: 100,
            message: "iteration budget exhausted".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No gross salary found for net 250000 after 100 iterations: iteration budget exhausted"
        );
        assert!(!error.is_validation());
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/benin".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/benin"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/togo/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/togo/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_rule_table_displays_country() {
        let error = EngineError::InvalidRuleTable {
            country: Country::Togo,
            message: "brackets are not contiguous".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid rule table for togo: brackets are not contiguous"
        );
    }

    #[test]
    fn test_country_not_configured_displays_country() {
        let error = EngineError::CountryNotConfigured {
            country: Country::Benin,
        };
        assert_eq!(error.to_string(), "No rule table configured for benin");
    }

    #[test]
    fn test_rules_not_found_displays_country_and_date() {
        let error = EngineError::RulesNotFound {
            country: Country::Benin,
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No rule table for benin effective on 2020-01-01"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_validation() -> EngineResult<()> {
            Err(EngineError::validation("grossSalary", "must not be negative"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_validation()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
