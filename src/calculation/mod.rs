//! Calculation logic for the payroll engine.
//!
//! This module contains the pluggable tax strategies, the insurance rule,
//! paycheck calculation with and without bonus, the paycheck lifecycle rules,
//! bulk bonus distribution with partial-failure handling, and summary
//! aggregation.

mod bonus_distribution;
mod insurance;
pub mod lifecycle;
mod payroll;
mod summary;
mod tax_strategy;

pub use bonus_distribution::BonusDistributor;
pub use insurance::{DEFAULT_INSURANCE_RATE, InsuranceRule};
pub use lifecycle::apply_update;
pub use payroll::{Deductions, PayrollCalculator, pay_period_label};
pub use summary::{summarize, validate_date_range};
pub use tax_strategy::{
    FlatTaxStrategy, ProgressiveTaxStrategy, SharedTaxStrategy, TaxBracket, TaxStrategy,
};
