//! Core data models for the salary engine.
//!
//! This module contains the request and result value objects exchanged
//! with the calculation engine.

mod salary_request;
mod salary_result;

pub(crate) use salary_request::check_amount;
pub use salary_request::{Country, FamilyStatus, MAX_AMOUNT_UNITS, SalaryRequest, max_amount};
pub use salary_result::{
    AnnualProjection, AuditStep, AuditTrace, AuditWarning, EmployerChargeLine, EmployerCharges,
    SalaryResult, TaxBracketDetail,
};
