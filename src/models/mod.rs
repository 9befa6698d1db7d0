//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod bonus;
mod employee;
mod paycheck;
mod summary;

pub use bonus::{BonusDistribution, BonusDistributionRequest, BonusDistributionResponse};
pub use employee::{Business, Employee, Manager, ManagerRole};
pub use paycheck::{Paycheck, PaycheckStatus, PaycheckUpdate, PaycheckView};
pub use summary::PayrollSummary;
