//! The caller-facing payroll API.
//!
//! [`PayrollService`] resolves ids through the storage collaborators, runs
//! the calculation rules and persists the results. Every operation returns
//! detached [`PaycheckView`]s rather than stored entities.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{
    BonusDistributor, PayrollCalculator, TaxStrategy, apply_update, summarize, validate_date_range,
};
use crate::config::{ConfigLoader, PayrollConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BonusDistributionRequest, BonusDistributionResponse, Employee, Paycheck, PaycheckStatus,
    PaycheckUpdate, PaycheckView, PayrollSummary,
};
use crate::store::{EmployeeDirectory, PaycheckRepository};

/// Payroll operations over an employee directory and a paycheck repository.
///
/// Clones share the collaborators and the tax strategy slot, so a strategy
/// set through one clone is seen by all of them.
#[derive(Clone)]
pub struct PayrollService {
    employees: Arc<dyn EmployeeDirectory>,
    paychecks: Arc<dyn PaycheckRepository>,
    calculator: PayrollCalculator,
}

impl PayrollService {
    /// Creates a service using `calculator` for every paycheck.
    pub fn new(
        employees: Arc<dyn EmployeeDirectory>,
        paychecks: Arc<dyn PaycheckRepository>,
        calculator: PayrollCalculator,
    ) -> Self {
        Self {
            employees,
            paychecks,
            calculator,
        }
    }

    /// Creates a service from a payroll configuration.
    pub fn from_config(
        employees: Arc<dyn EmployeeDirectory>,
        paychecks: Arc<dyn PaycheckRepository>,
        config: &PayrollConfig,
    ) -> EngineResult<Self> {
        let calculator = ConfigLoader::from_config(config.clone()).calculator()?;
        Ok(Self::new(employees, paychecks, calculator))
    }

    /// The calculator in use.
    pub fn calculator(&self) -> &PayrollCalculator {
        &self.calculator
    }

    /// Calculates and stores a salary-only paycheck.
    pub fn calculate_payroll(&self, employee_id: &str) -> EngineResult<PaycheckView> {
        let employee = self.employee(employee_id)?;
        let paycheck = self.calculator.calculate_regular(&employee, today())?;
        self.store_new(paycheck)
    }

    /// Calculates and stores a paycheck paying `amount` as a bonus.
    pub fn calculate_payroll_with_bonus(
        &self,
        employee_id: &str,
        amount: Decimal,
    ) -> EngineResult<PaycheckView> {
        let employee = self.employee(employee_id)?;
        let paycheck = self
            .calculator
            .calculate_with_bonus(&employee, amount, today())?;
        self.store_new(paycheck)
    }

    /// Calculates and stores a paycheck with an optional additional amount.
    ///
    /// A missing or zero amount behaves like [`Self::calculate_payroll`].
    pub fn calculate_additional_pay(
        &self,
        employee_id: &str,
        amount: Option<Decimal>,
    ) -> EngineResult<PaycheckView> {
        let employee = self.employee(employee_id)?;
        let paycheck = self
            .calculator
            .calculate_additional(&employee, amount, today())?;
        self.store_new(paycheck)
    }

    /// Calculates a paycheck without storing it.
    pub fn preview_payroll(
        &self,
        employee_id: &str,
        amount: Option<Decimal>,
    ) -> EngineResult<PaycheckView> {
        let employee = self.employee(employee_id)?;
        let paycheck = self
            .calculator
            .calculate_additional(&employee, amount, today())?;
        Ok(PaycheckView::from(paycheck))
    }

    /// Pays one bonus to every employee the request resolves to.
    ///
    /// Each successful paycheck is stored as it is produced.
    pub fn distribute_bonuses(
        &self,
        request: &BonusDistributionRequest,
    ) -> EngineResult<BonusDistributionResponse> {
        let distributor = BonusDistributor::new(self.employees.as_ref(), &self.calculator);
        let outcome = distributor.distribute(request, today(), |p| self.paychecks.save(p))?;
        Ok(outcome.into())
    }

    /// Replaces the tax strategy used by all later calculations.
    pub fn set_tax_strategy(&self, strategy: Arc<dyn TaxStrategy>) {
        self.calculator.tax_strategy().replace(strategy);
    }

    /// Name of the tax strategy currently in force.
    pub fn current_tax_strategy_name(&self) -> String {
        self.calculator.tax_strategy().current_name()
    }

    /// Returns one stored paycheck.
    pub fn get_paycheck(&self, id: Uuid) -> EngineResult<PaycheckView> {
        self.paycheck(id).map(PaycheckView::from)
    }

    /// Changes the amounts of a DRAFT paycheck.
    pub fn update_paycheck(&self, id: Uuid, update: &PaycheckUpdate) -> EngineResult<PaycheckView> {
        let mut paycheck = self.paycheck(id)?;
        apply_update(&mut paycheck, update, &self.calculator)?;
        let saved = self.paychecks.save(paycheck)?;
        info!(paycheck_id = %id, net_pay = %saved.net_pay(), "Paycheck updated");
        Ok(saved.into())
    }

    /// Deletes a DRAFT paycheck.
    pub fn delete_paycheck(&self, id: Uuid) -> EngineResult<()> {
        let paycheck = self.paycheck(id)?;
        paycheck.ensure_deletable()?;
        self.paychecks.delete(&paycheck)?;
        info!(paycheck_id = %id, "Paycheck deleted");
        Ok(())
    }

    /// Moves a paycheck through its lifecycle.
    pub fn set_paycheck_status(
        &self,
        id: Uuid,
        status: PaycheckStatus,
    ) -> EngineResult<PaycheckView> {
        let mut paycheck = self.paycheck(id)?;
        let previous = paycheck.status();
        paycheck.transition_to(status)?;
        let saved = self.paychecks.save(paycheck)?;
        info!(paycheck_id = %id, from = %previous, to = %status, "Paycheck status changed");
        Ok(saved.into())
    }

    /// Returns an employee's paychecks, newest first.
    ///
    /// `start` and `end` restrict the history to an inclusive date range and
    /// must be given together.
    pub fn payroll_history(
        &self,
        employee_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> EngineResult<Vec<PaycheckView>> {
        let paychecks = match (start, end) {
            (None, None) => {
                self.employee(employee_id)?;
                self.paychecks.find_by_employee(employee_id)?
            }
            (Some(start), Some(end)) => {
                validate_date_range(start, end)?;
                self.employee(employee_id)?;
                self.paychecks
                    .find_by_employee_and_date_range(employee_id, start, end)?
            }
            _ => {
                return Err(EngineError::validation(
                    "start and end dates must be given together",
                ));
            }
        };
        Ok(paychecks.into_iter().map(PaycheckView::from).collect())
    }

    /// Aggregates a business's paychecks paid within `[start, end]`.
    ///
    /// The range is validated before storage is queried.
    pub fn payroll_summary(
        &self,
        business_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<PayrollSummary> {
        validate_date_range(start, end)?;
        if !self.employees.business_exists(business_id)? {
            return Err(EngineError::not_found("Business", business_id));
        }
        let paychecks = self
            .paychecks
            .find_by_business_and_date_range(business_id, start, end)?;
        summarize(business_id, start, end, &paychecks)
    }

    fn employee(&self, id: &str) -> EngineResult<Employee> {
        self.employees
            .find_employee(id)?
            .ok_or_else(|| EngineError::not_found("Employee", id))
    }

    fn paycheck(&self, id: Uuid) -> EngineResult<Paycheck> {
        self.paychecks
            .find_by_id(id)?
            .ok_or_else(|| EngineError::not_found("Paycheck", id))
    }

    fn store_new(&self, paycheck: Paycheck) -> EngineResult<PaycheckView> {
        let saved = self.paychecks.save(paycheck)?;
        info!(
            paycheck_id = ?saved.id(),
            employee_id = %saved.employee_id(),
            gross_pay = %saved.gross_pay(),
            net_pay = %saved.net_pay(),
            "Paycheck calculated"
        );
        Ok(saved.into())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
