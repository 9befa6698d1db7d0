//! In-memory storage collaborators.
//!
//! Used by tests, benchmarks and the HTTP layer when no database is wired in.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Business, Employee, Paycheck};

use super::{EmployeeDirectory, PaycheckRepository};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Businesses and employees held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeDirectory {
    businesses: RwLock<HashMap<String, Business>>,
    employees: RwLock<Vec<Employee>>,
}

impl InMemoryEmployeeDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a business.
    pub fn add_business(&self, business: Business) {
        write(&self.businesses).insert(business.id.clone(), business);
    }

    /// Adds an employee, replacing any employee with the same id.
    ///
    /// Fails when the employee's business has not been registered.
    pub fn add_employee(&self, employee: Employee) -> EngineResult<()> {
        if !read(&self.businesses).contains_key(&employee.business_id) {
            return Err(EngineError::not_found("Business", &employee.business_id));
        }
        let mut employees = write(&self.employees);
        match employees.iter_mut().find(|e| e.id == employee.id) {
            Some(existing) => *existing = employee,
            None => employees.push(employee),
        }
        Ok(())
    }
}

impl EmployeeDirectory for InMemoryEmployeeDirectory {
    fn find_employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(read(&self.employees).iter().find(|e| e.id == id).cloned())
    }

    fn find_employees_by_business(&self, business_id: &str) -> EngineResult<Vec<Employee>> {
        Ok(read(&self.employees)
            .iter()
            .filter(|e| e.business_id == business_id)
            .cloned()
            .collect())
    }

    fn business_exists(&self, business_id: &str) -> EngineResult<bool> {
        Ok(read(&self.businesses).contains_key(business_id))
    }
}

/// Paychecks held in memory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryPaycheckRepository {
    paychecks: RwLock<HashMap<Uuid, Paycheck>>,
}

impl InMemoryPaycheckRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored paychecks.
    pub fn len(&self) -> usize {
        read(&self.paychecks).len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collect_sorted<F>(&self, predicate: F) -> Vec<Paycheck>
    where
        F: Fn(&Paycheck) -> bool,
    {
        let mut found: Vec<Paycheck> = read(&self.paychecks)
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.pay_date()
                .cmp(&a.pay_date())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });
        found
    }
}

impl PaycheckRepository for InMemoryPaycheckRepository {
    fn save(&self, mut paycheck: Paycheck) -> EngineResult<Paycheck> {
        let id = match paycheck.id() {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                paycheck.assign_id(id);
                id
            }
        };
        write(&self.paychecks).insert(id, paycheck.clone());
        Ok(paycheck)
    }

    fn find_by_id(&self, id: Uuid) -> EngineResult<Option<Paycheck>> {
        Ok(read(&self.paychecks).get(&id).cloned())
    }

    fn find_by_employee(&self, employee_id: &str) -> EngineResult<Vec<Paycheck>> {
        Ok(self.collect_sorted(|p| p.employee_id() == employee_id))
    }

    fn find_by_business_and_date_range(
        &self,
        business_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Paycheck>> {
        Ok(self.collect_sorted(|p| {
            p.business_id() == business_id && p.pay_date() >= start && p.pay_date() <= end
        }))
    }

    fn delete(&self, paycheck: &Paycheck) -> EngineResult<()> {
        let id = paycheck
            .id()
            .ok_or_else(|| EngineError::validation("cannot delete an unsaved paycheck"))?;
        match write(&self.paychecks).remove(&id) {
            Some(_) => Ok(()),
            None => Err(EngineError::not_found("Paycheck", id)),
        }
    }
}
