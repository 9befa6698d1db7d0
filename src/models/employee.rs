//! Employee model and the manager roles the payroll engine cares about.
//!
//! Only the parts of a person record that payroll needs are modelled here:
//! the salary that drives gross pay, the business the employee belongs to,
//! and the manager whose department is used by bonus filtering.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A company employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    /// Unique identifier for the business.
    pub id: String,
    /// Display name of the business.
    pub name: String,
}

/// The role a manager holds within the business.
///
/// Only employers carry a department; a manager who is themselves an
/// employee has no department concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManagerRole {
    /// An employer, optionally heading a department.
    Employer {
        /// The department the employer heads, if any.
        #[serde(default)]
        department: Option<String>,
    },
    /// A regular employee acting as a manager.
    Employee,
}

/// The manager an employee reports to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    /// Unique identifier for the manager.
    pub id: String,
    /// The manager's display name.
    pub name: String,
    /// The role the manager holds.
    pub role: ManagerRole,
}

impl Manager {
    /// Returns the manager's department, if the role has one.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Manager, ManagerRole};
    ///
    /// let manager = Manager {
    ///     id: "mgr_001".to_string(),
    ///     name: "Dana Reyes".to_string(),
    ///     role: ManagerRole::Employer { department: Some("Engineering".to_string()) },
    /// };
    /// assert_eq!(manager.department(), Some("Engineering"));
    /// ```
    pub fn department(&self) -> Option<&str> {
        match &self.role {
            ManagerRole::Employer { department } => department.as_deref(),
            ManagerRole::Employee => None,
        }
    }
}

/// Represents an employee subject to payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The business the employee works for.
    pub business_id: String,
    /// The employee's first name.
    pub first_name: String,
    /// The employee's last name.
    pub last_name: String,
    /// Base salary per pay event. `None` means no salary is on record.
    #[serde(default)]
    pub salary: Option<Decimal>,
    /// The manager the employee reports to.
    #[serde(default)]
    pub manager: Option<Manager>,
}

impl Employee {
    /// Returns the employee's full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the employee's manager heads `department`.
    ///
    /// The comparison is case-insensitive. Employees without a manager, or
    /// whose manager has no department, never match.
    pub fn reports_to_department(&self, department: &str) -> bool {
        self.manager
            .as_ref()
            .and_then(Manager::department)
            .is_some_and(|d| d.eq_ignore_ascii_case(department))
    }
}
