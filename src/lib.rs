//! Payroll engine for Bénin and Togo
//!
//! This crate converts monthly gross salaries into net salaries (and back)
//! under the income tax, social contribution and employer charge rules of
//! each country, with an audit trace of every calculation step.

#![warn(missing_docs)]

pub mod calculation;
pub mod calculator;
pub mod config;
pub mod error;
pub mod models;

pub use calculator::SalaryCalculator;
pub use error::{EngineError, EngineResult};
