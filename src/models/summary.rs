//! Aggregated payroll figures for a business over a date range.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived-only totals and averages over a set of paychecks.
///
/// Rates are taken against total compensation (gross plus bonus), since
/// that is the base deductions are computed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// The business summarised.
    pub business_id: String,
    /// First day of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive).
    pub end_date: NaiveDate,
    /// Number of paychecks.
    pub paycheck_count: usize,
    /// Number of distinct employees paid.
    pub employee_count: usize,
    /// Sum of gross pay.
    pub total_gross_pay: Decimal,
    /// Sum of bonuses.
    pub total_bonus: Decimal,
    /// Sum of tax deductions.
    pub total_tax: Decimal,
    /// Sum of insurance deductions.
    pub total_insurance: Decimal,
    /// Sum of net pay.
    pub total_net_pay: Decimal,
    /// Total gross pay per paycheck.
    pub average_gross_pay: Decimal,
    /// Total net pay per paycheck.
    pub average_net_pay: Decimal,
    /// Total tax over total compensation.
    pub average_tax_rate: Decimal,
    /// Total insurance over total compensation.
    pub average_insurance_rate: Decimal,
}
