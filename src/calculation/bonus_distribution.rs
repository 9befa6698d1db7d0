//! Bulk bonus distribution.
//!
//! A distribution resolves the target employees of a
//! [`BonusDistributionRequest`], calculates a bonus paycheck for each one and
//! keeps going when an individual employee fails. The run only fails as a
//! whole when nobody could be paid.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{BonusDistribution, BonusDistributionRequest, Employee, Paycheck};
use crate::store::EmployeeDirectory;

use super::payroll::PayrollCalculator;

/// Pays one bonus to every employee a request resolves to.
pub struct BonusDistributor<'a> {
    directory: &'a dyn EmployeeDirectory,
    calculator: &'a PayrollCalculator,
}

impl<'a> BonusDistributor<'a> {
    /// Creates a distributor reading employees from `directory`.
    pub fn new(directory: &'a dyn EmployeeDirectory, calculator: &'a PayrollCalculator) -> Self {
        Self {
            directory,
            calculator,
        }
    }

    /// Runs the distribution.
    ///
    /// Each calculated paycheck is handed to `persist`; whatever it returns
    /// is collected as the successful result for that employee. Unknown
    /// employee ids and per-employee calculation or persistence errors are
    /// recorded as failures without stopping the run.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Validation`] for a non-positive bonus, a blank
    ///   business id, or when no employee matches the request.
    /// - [`EngineError::NotFound`] when the business does not exist.
    /// - [`EngineError::BatchFailed`] when every attempted employee failed.
    pub fn distribute<F>(
        &self,
        request: &BonusDistributionRequest,
        pay_date: NaiveDate,
        mut persist: F,
    ) -> EngineResult<BonusDistribution>
    where
        F: FnMut(Paycheck) -> EngineResult<Paycheck>,
    {
        validate_request(request)?;
        if !self.directory.business_exists(&request.business_id)? {
            return Err(EngineError::not_found("Business", &request.business_id));
        }

        let mut outcome = BonusDistribution::default();
        let employees = self.resolve_employees(request, &mut outcome.failures)?;

        if employees.is_empty() {
            return Err(EngineError::validation(format!(
                "no employees of business '{}' match the bonus distribution request",
                request.business_id
            )));
        }

        for employee in &employees {
            let result = self
                .calculator
                .calculate_with_bonus(employee, request.bonus_amount, pay_date)
                .and_then(&mut persist);

            match result {
                Ok(paycheck) => outcome.paychecks.push(paycheck),
                Err(err) => {
                    warn!(
                        employee_id = %employee.id,
                        error = %err,
                        "Bonus calculation failed"
                    );
                    outcome.failures.push(format!("{}: {}", employee.id, err));
                }
            }
        }

        if outcome.paychecks.is_empty() && !outcome.failures.is_empty() {
            return Err(EngineError::BatchFailed {
                failures: outcome.failures,
            });
        }

        info!(
            business_id = %request.business_id,
            bonus_amount = %request.bonus_amount,
            successes = outcome.paychecks.len(),
            failures = outcome.failures.len(),
            "Bonus distribution completed"
        );
        Ok(outcome)
    }

    fn resolve_employees(
        &self,
        request: &BonusDistributionRequest,
        failures: &mut Vec<String>,
    ) -> EngineResult<Vec<Employee>> {
        let department = request.department_filter();

        let Some(ids) = request.explicit_employee_ids() else {
            return match department {
                Some(department) => self
                    .directory
                    .find_employees_by_manager_department(&request.business_id, department),
                None => self.directory.find_employees_by_business(&request.business_id),
            };
        };

        let mut employees = Vec::with_capacity(ids.len());
        for id in ids {
            match self.directory.find_employee(id)? {
                Some(employee) if employee.business_id == request.business_id => {
                    employees.push(employee)
                }
                Some(employee) => {
                    warn!(
                        employee_id = %id,
                        employee_business_id = %employee.business_id,
                        business_id = %request.business_id,
                        "Skipping employee of another business in bonus distribution"
                    );
                    failures.push(format!(
                        "{}: employee belongs to business '{}', not '{}'",
                        id, employee.business_id, request.business_id
                    ));
                }
                None => {
                    warn!(employee_id = %id, "Skipping unknown employee in bonus distribution");
                    failures.push(EngineError::not_found("Employee", id).to_string());
                }
            }
        }

        if let Some(department) = department {
            employees.retain(|e| e.reports_to_department(department));
        }
        Ok(employees)
    }
}

fn validate_request(request: &BonusDistributionRequest) -> EngineResult<()> {
    if request.business_id.trim().is_empty() {
        return Err(EngineError::validation("business id is required"));
    }
    if request.bonus_amount <= Decimal::ZERO {
        return Err(EngineError::validation(format!(
            "bonus amount must be positive, got {}",
            request.bonus_amount
        )));
    }
    Ok(())
}
