//! Bonus distribution request and outcome types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Paycheck, PaycheckView};

/// A request to pay the same bonus to a set of employees.
///
/// Without `employee_ids` every employee of the business is targeted.
/// `department` keeps only employees whose manager heads that department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusDistributionRequest {
    /// The business whose employees receive the bonus.
    pub business_id: String,
    /// The bonus paid to each employee; must be positive.
    pub bonus_amount: Decimal,
    /// Explicit employees to target instead of the whole business.
    #[serde(default)]
    pub employee_ids: Option<Vec<String>>,
    /// Department of the employees' manager, matched case-insensitively.
    #[serde(default)]
    pub department: Option<String>,
    /// Free text carried along with the request; not interpreted.
    #[serde(default)]
    pub description: Option<String>,
}

impl BonusDistributionRequest {
    /// Creates a request targeting every employee of `business_id`.
    pub fn for_business(business_id: impl Into<String>, bonus_amount: Decimal) -> Self {
        Self {
            business_id: business_id.into(),
            bonus_amount,
            employee_ids: None,
            department: None,
            description: None,
        }
    }

    /// Restricts the request to the given employees.
    pub fn with_employee_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.employee_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts the request to employees whose manager heads `department`.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// The explicit employee ids, if a non-empty list was given.
    pub fn explicit_employee_ids(&self) -> Option<&[String]> {
        self.employee_ids
            .as_deref()
            .filter(|ids| !ids.is_empty())
    }

    /// The trimmed department filter, if a non-blank one was given.
    pub fn department_filter(&self) -> Option<&str> {
        self.department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// The outcome of a bonus run: created paychecks plus per-employee failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BonusDistribution {
    /// Paychecks created, in the order employees were resolved.
    pub paychecks: Vec<Paycheck>,
    /// One description per employee that could not be paid.
    pub failures: Vec<String>,
}

/// Caller-facing form of a [`BonusDistribution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusDistributionResponse {
    /// Paychecks created.
    pub successes: Vec<PaycheckView>,
    /// Per-employee failure descriptions.
    pub failures: Vec<String>,
}

impl From<BonusDistribution> for BonusDistributionResponse {
    fn from(distribution: BonusDistribution) -> Self {
        Self {
            successes: distribution
                .paychecks
                .iter()
                .map(PaycheckView::from)
                .collect(),
            failures: distribution.failures,
        }
    }
}
