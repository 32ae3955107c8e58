//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading country rule
//! tables from YAML files, either from a directory or from the copies
//! compiled into the crate.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::Country;

use super::types::{CountryRules, RuleBook};

const BUILTIN_TABLES: [(&str, &str); 2] = [
    (
        "config/benin/2024-01-01.yaml",
        include_str!("../../config/benin/2024-01-01.yaml"),
    ),
    (
        "config/togo/2024-01-01.yaml",
        include_str!("../../config/togo/2024-01-01.yaml"),
    ),
];

/// Loads and provides access to country rule tables.
///
/// # Directory Structure
///
/// The configuration directory holds one sub-directory per country, each
/// containing one file per rule table version:
/// ```text
/// config/
/// ├── benin/
/// │   └── 2024-01-01.yaml
/// └── togo/
///     └── 2024-01-01.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use paye_engine::config::ConfigLoader;
/// use paye_engine::models::Country;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let rules = loader.rule_book().latest(Country::Benin).unwrap();
/// println!("Employee contribution: {}%", rules.employee_contribution.rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    rule_book: RuleBook,
}

impl ConfigLoader {
    /// Loads every rule table found under `path`.
    ///
    /// Country directories that do not exist are skipped; at least one table
    /// must be found overall.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - No rule table is found (`ConfigNotFound`)
    /// - A file contains invalid YAML (`ConfigParseError`)
    /// - A table is stored under the wrong country or is inconsistent (`InvalidRuleTable`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let mut tables = Vec::new();

        for country in Country::ALL {
            let country_dir = path.join(country.as_str());
            if !country_dir.is_dir() {
                continue;
            }
            tables.extend(Self::load_country(country, &country_dir)?);
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rule tables found)", path.display()),
            });
        }

        let loader = Self::from_tables(tables)?;
        info!(path = %path.display(), "Loaded rule tables from directory");
        Ok(loader)
    }

    /// Loads the rule tables compiled into the crate.
    ///
    /// # Example
    ///
    /// ```
    /// use paye_engine::config::ConfigLoader;
    /// use paye_engine::models::Country;
    ///
    /// let loader = ConfigLoader::builtin().unwrap();
    /// assert!(loader.rule_book().latest(Country::Benin).is_ok());
    /// assert!(loader.rule_book().latest(Country::Togo).is_ok());
    /// ```
    pub fn builtin() -> EngineResult<Self> {
        let tables = BUILTIN_TABLES
            .iter()
            .map(|(origin, content)| Self::parse_yaml(content, origin))
            .collect::<EngineResult<Vec<_>>>()?;
        Self::from_tables(tables)
    }

    /// Parses a single rule table from YAML text.
    ///
    /// `origin` is only used in error messages.
    pub fn parse_yaml(content: &str, origin: &str) -> EngineResult<CountryRules> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    fn from_tables(tables: Vec<CountryRules>) -> EngineResult<Self> {
        let rule_book = RuleBook::new(tables)?;
        for country in rule_book.countries() {
            let versions = rule_book.versions(country);
            info!(
                country = %country,
                versions = versions.len(),
                latest = %versions.last().map(|r| r.effective_date.to_string()).unwrap_or_default(),
                "Rule tables ready"
            );
        }
        Ok(Self { rule_book })
    }

    /// Loads every `.yaml` file of a country directory.
    fn load_country(country: Country, dir: &Path) -> EngineResult<Vec<CountryRules>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let table = Self::load_yaml(&path)?;
                if table.country != country {
                    return Err(EngineError::InvalidRuleTable {
                        country,
                        message: format!(
                            "{} declares country '{}'",
                            path.display(),
                            table.country
                        ),
                    });
                }
                tables.push(table);
            }
        }

        Ok(tables)
    }

    /// Loads and parses a YAML file.
    fn load_yaml(path: &Path) -> EngineResult<CountryRules> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    /// Returns the loaded rule tables.
    pub fn rule_book(&self) -> &RuleBook {
        &self.rule_book
    }

    /// Consumes the loader, returning its rule tables.
    pub fn into_rule_book(self) -> RuleBook {
        self.rule_book
    }
}
