//! Storage collaborators consumed by the payroll engine.
//!
//! The engine never talks to a database directly. It reads employees through
//! an [`EmployeeDirectory`] and persists paychecks through a
//! [`PaycheckRepository`]; transactional guarantees belong to the
//! implementations. In-memory implementations live in [`memory`].

pub mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Employee, Paycheck};

pub use memory::{InMemoryEmployeeDirectory, InMemoryPaycheckRepository};

/// Read access to employees and the businesses they belong to.
pub trait EmployeeDirectory: Send + Sync {
    /// Looks up one employee.
    fn find_employee(&self, id: &str) -> EngineResult<Option<Employee>>;

    /// Returns every employee of a business.
    fn find_employees_by_business(&self, business_id: &str) -> EngineResult<Vec<Employee>>;

    /// Returns the employees of a business whose manager heads `department`.
    fn find_employees_by_manager_department(
        &self,
        business_id: &str,
        department: &str,
    ) -> EngineResult<Vec<Employee>> {
        Ok(self
            .find_employees_by_business(business_id)?
            .into_iter()
            .filter(|e| e.reports_to_department(department))
            .collect())
    }

    /// Returns true if the business id resolves.
    fn business_exists(&self, business_id: &str) -> EngineResult<bool>;
}

/// Persistence for paychecks.
pub trait PaycheckRepository: Send + Sync {
    /// Stores a paycheck, assigning an id on first save.
    fn save(&self, paycheck: Paycheck) -> EngineResult<Paycheck>;

    /// Looks up one paycheck.
    fn find_by_id(&self, id: Uuid) -> EngineResult<Option<Paycheck>>;

    /// Returns an employee's paychecks, newest pay date first.
    fn find_by_employee(&self, employee_id: &str) -> EngineResult<Vec<Paycheck>>;

    /// Returns an employee's paychecks paid within `[start, end]`.
    fn find_by_employee_and_date_range(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Paycheck>> {
        Ok(self
            .find_by_employee(employee_id)?
            .into_iter()
            .filter(|p| p.pay_date() >= start && p.pay_date() <= end)
            .collect())
    }

    /// Returns a business's paychecks paid within `[start, end]`.
    fn find_by_business_and_date_range(
        &self,
        business_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Paycheck>>;

    /// Removes a paycheck.
    fn delete(&self, paycheck: &Paycheck) -> EngineResult<()>;
}
