//! Payroll summary aggregation.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Paycheck, PayrollSummary};

/// Fails unless `start` is on or before `end`.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> EngineResult<()> {
    if start > end {
        return Err(EngineError::validation(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }
    Ok(())
}

fn accumulate(total: Decimal, amount: Decimal, what: &str) -> EngineResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| EngineError::amount_overflow(what))
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Aggregates `paychecks` of a business paid within `[start, end]`.
///
/// Empty input yields a summary of zeros.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::summarize;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();
///
/// let summary = summarize("biz_001", start, end, &[]).unwrap();
/// assert_eq!(summary.paycheck_count, 0);
/// assert_eq!(summary.average_tax_rate, Decimal::ZERO);
/// ```
pub fn summarize(
    business_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    paychecks: &[Paycheck],
) -> EngineResult<PayrollSummary> {
    validate_date_range(start, end)?;

    let mut total_gross_pay = Decimal::ZERO;
    let mut total_bonus = Decimal::ZERO;
    let mut total_tax = Decimal::ZERO;
    let mut total_insurance = Decimal::ZERO;
    let mut total_net_pay = Decimal::ZERO;
    let mut employees = HashSet::new();

    for paycheck in paychecks {
        total_gross_pay = accumulate(total_gross_pay, paycheck.gross_pay(), "total gross pay")?;
        total_bonus = accumulate(
            total_bonus,
            paycheck.bonus().unwrap_or(Decimal::ZERO),
            "total bonus",
        )?;
        total_tax = accumulate(total_tax, paycheck.tax_deduction(), "total tax")?;
        total_insurance = accumulate(
            total_insurance,
            paycheck.insurance_deduction(),
            "total insurance",
        )?;
        total_net_pay = accumulate(total_net_pay, paycheck.net_pay(), "total net pay")?;
        employees.insert(paycheck.employee_id());
    }

    let count = Decimal::from(paychecks.len());
    let total_compensation = accumulate(total_gross_pay, total_bonus, "total compensation")?;

    Ok(PayrollSummary {
        business_id: business_id.to_string(),
        start_date: start,
        end_date: end,
        paycheck_count: paychecks.len(),
        employee_count: employees.len(),
        total_gross_pay,
        total_bonus,
        total_tax,
        total_insurance,
        total_net_pay,
        average_gross_pay: ratio(total_gross_pay, count),
        average_net_pay: ratio(total_net_pay, count),
        average_tax_rate: ratio(total_tax, total_compensation),
        average_insurance_rate: ratio(total_insurance, total_compensation),
    })
}
