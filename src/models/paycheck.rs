//! Paycheck model and its status.
//!
//! A [`Paycheck`] keeps its fields private so that the net pay invariant
//! (`net = gross + bonus - tax - insurance`) and the status rules in
//! [`crate::calculation::lifecycle`] cannot be bypassed.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::lifecycle;
use crate::error::{EngineError, EngineResult};

/// Lifecycle state of a paycheck.
///
/// ```text
/// DRAFT ──> PENDING ──> PAID
///   │          │          │
///   └──────────┴──────────┴──> VOIDED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaycheckStatus {
    /// Freshly calculated; the only mutable state.
    Draft,
    /// Approved and awaiting payment.
    Pending,
    /// Paid out.
    Paid,
    /// Cancelled. Terminal.
    Voided,
}

impl PaycheckStatus {
    /// Returns the upper-case name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaycheckStatus::Draft => "DRAFT",
            PaycheckStatus::Pending => "PENDING",
            PaycheckStatus::Paid => "PAID",
            PaycheckStatus::Voided => "VOIDED",
        }
    }
}

impl fmt::Display for PaycheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One computed pay event for an employee.
#[derive(Debug, Clone, PartialEq)]
pub struct Paycheck {
    id: Option<Uuid>,
    employee_id: String,
    business_id: String,
    gross_pay: Decimal,
    bonus: Option<Decimal>,
    tax_deduction: Decimal,
    insurance_deduction: Decimal,
    net_pay: Decimal,
    pay_date: NaiveDate,
    pay_period: Option<String>,
    created_at: DateTime<Utc>,
    status: PaycheckStatus,
}

impl Paycheck {
    /// Creates a new, unsaved paycheck in [`PaycheckStatus::Draft`].
    ///
    /// A zero bonus is stored as "no bonus". Net pay is derived from the
    /// other amounts; fails when any amount is negative or the totals leave
    /// the decimal range.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Paycheck, PaycheckStatus};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let paycheck = Paycheck::new_draft(
    ///     "emp_001",
    ///     "biz_001",
    ///     Decimal::new(5000, 0),
    ///     Some(Decimal::new(1000, 0)),
    ///     Decimal::new(900, 0),
    ///     Decimal::new(300, 0),
    ///     NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(paycheck.net_pay(), Decimal::new(4800, 0));
    /// assert_eq!(paycheck.status(), PaycheckStatus::Draft);
    /// assert!(paycheck.id().is_none());
    /// ```
    pub fn new_draft(
        employee_id: impl Into<String>,
        business_id: impl Into<String>,
        gross_pay: Decimal,
        bonus: Option<Decimal>,
        tax_deduction: Decimal,
        insurance_deduction: Decimal,
        pay_date: NaiveDate,
    ) -> EngineResult<Self> {
        let mut paycheck = Self {
            id: None,
            employee_id: employee_id.into(),
            business_id: business_id.into(),
            gross_pay: Decimal::ZERO,
            bonus: None,
            tax_deduction: Decimal::ZERO,
            insurance_deduction: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            pay_date,
            pay_period: None,
            created_at: Utc::now(),
            status: PaycheckStatus::Draft,
        };
        paycheck.write_amounts(gross_pay, bonus, tax_deduction, insurance_deduction)?;
        Ok(paycheck)
    }

    /// Attaches a pay-period label.
    pub fn with_pay_period(mut self, label: impl Into<String>) -> Self {
        self.pay_period = Some(label.into());
        self
    }

    /// Records the id assigned by storage.
    pub fn assign_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    /// The storage-assigned id, `None` until first saved.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// The employee this paycheck pays.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// The business the employee belonged to when the paycheck was calculated.
    pub fn business_id(&self) -> &str {
        &self.business_id
    }

    /// Base salary amount, excluding bonus.
    pub fn gross_pay(&self) -> Decimal {
        self.gross_pay
    }

    /// Bonus amount, if any.
    pub fn bonus(&self) -> Option<Decimal> {
        self.bonus
    }

    /// Gross pay plus bonus.
    ///
    /// Every write checks this sum, so it is always representable.
    pub fn total_compensation(&self) -> Decimal {
        self.gross_pay + self.bonus.unwrap_or(Decimal::ZERO)
    }

    /// Tax withheld.
    pub fn tax_deduction(&self) -> Decimal {
        self.tax_deduction
    }

    /// Insurance withheld.
    pub fn insurance_deduction(&self) -> Decimal {
        self.insurance_deduction
    }

    /// Gross plus bonus minus deductions.
    pub fn net_pay(&self) -> Decimal {
        self.net_pay
    }

    /// The date the paycheck is paid on.
    pub fn pay_date(&self) -> NaiveDate {
        self.pay_date
    }

    /// Optional pay-period label.
    pub fn pay_period(&self) -> Option<&str> {
        self.pay_period.as_deref()
    }

    /// When the paycheck was calculated.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current lifecycle status.
    pub fn status(&self) -> PaycheckStatus {
        self.status
    }

    /// Replaces the gross pay. Only allowed while DRAFT.
    pub fn set_gross_pay(&mut self, gross_pay: Decimal) -> EngineResult<()> {
        self.ensure_mutable()?;
        self.write_amounts(gross_pay, self.bonus, self.tax_deduction, self.insurance_deduction)
    }

    /// Replaces the bonus; `None` or zero clears it. Only allowed while DRAFT.
    pub fn set_bonus(&mut self, bonus: Option<Decimal>) -> EngineResult<()> {
        self.ensure_mutable()?;
        self.write_amounts(self.gross_pay, bonus, self.tax_deduction, self.insurance_deduction)
    }

    /// Replaces the tax deduction. Only allowed while DRAFT.
    pub fn set_tax_deduction(&mut self, tax: Decimal) -> EngineResult<()> {
        self.ensure_mutable()?;
        self.write_amounts(self.gross_pay, self.bonus, tax, self.insurance_deduction)
    }

    /// Replaces the insurance deduction. Only allowed while DRAFT.
    pub fn set_insurance_deduction(&mut self, insurance: Decimal) -> EngineResult<()> {
        self.ensure_mutable()?;
        self.write_amounts(self.gross_pay, self.bonus, self.tax_deduction, insurance)
    }

    /// Moves the paycheck to `next` if the lifecycle allows it.
    pub fn transition_to(&mut self, next: PaycheckStatus) -> EngineResult<()> {
        lifecycle::ensure_transition(self.id_or_nil(), self.status, next)?;
        self.status = next;
        Ok(())
    }

    /// Fails unless the paycheck may be deleted.
    pub fn ensure_deletable(&self) -> EngineResult<()> {
        lifecycle::ensure_deletable(self.id_or_nil(), self.status)
    }

    /// Fails unless the paycheck's amounts may be changed.
    pub fn ensure_mutable(&self) -> EngineResult<()> {
        lifecycle::ensure_mutable(self.id_or_nil(), self.status)
    }

    fn id_or_nil(&self) -> Uuid {
        self.id.unwrap_or_else(Uuid::nil)
    }

    /// Validates a full set of amounts and stores them with the derived net
    /// pay. Nothing is written on failure.
    fn write_amounts(
        &mut self,
        gross_pay: Decimal,
        bonus: Option<Decimal>,
        tax_deduction: Decimal,
        insurance_deduction: Decimal,
    ) -> EngineResult<()> {
        ensure_non_negative("gross pay", gross_pay)?;
        if let Some(amount) = bonus {
            ensure_non_negative("bonus", amount)?;
        }
        ensure_non_negative("tax deduction", tax_deduction)?;
        ensure_non_negative("insurance deduction", insurance_deduction)?;

        let bonus = bonus.filter(|b| !b.is_zero());
        let total = gross_pay
            .checked_add(bonus.unwrap_or(Decimal::ZERO))
            .ok_or_else(|| EngineError::amount_overflow("gross pay plus bonus"))?;
        let net_pay = total
            .checked_sub(tax_deduction)
            .and_then(|n| n.checked_sub(insurance_deduction))
            .ok_or_else(|| EngineError::amount_overflow("net pay"))?;

        self.gross_pay = gross_pay;
        self.bonus = bonus;
        self.tax_deduction = tax_deduction;
        self.insurance_deduction = insurance_deduction;
        self.net_pay = net_pay;
        Ok(())
    }
}

fn ensure_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::validation(format!(
            "{} cannot be negative: {}",
            field, value
        )));
    }
    Ok(())
}

/// Field changes requested for a DRAFT paycheck.
///
/// Absent fields are left untouched. See
/// [`lifecycle::apply_update`](crate::calculation::lifecycle::apply_update)
/// for how tax and insurance are recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaycheckUpdate {
    /// New gross pay.
    #[serde(default)]
    pub gross_pay: Option<Decimal>,
    /// New bonus; zero clears the bonus.
    #[serde(default)]
    pub bonus: Option<Decimal>,
    /// Explicit tax deduction, overriding recomputation.
    #[serde(default)]
    pub tax_deduction: Option<Decimal>,
    /// Explicit insurance deduction, overriding recomputation.
    #[serde(default)]
    pub insurance_deduction: Option<Decimal>,
}

/// Caller-facing representation of a paycheck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaycheckView {
    /// Storage-assigned id; absent for previews.
    pub id: Option<Uuid>,
    /// The employee paid.
    pub employee_id: String,
    /// The employee's business.
    pub business_id: String,
    /// Base salary amount.
    pub gross_pay: Decimal,
    /// Bonus amount, if any.
    pub bonus: Option<Decimal>,
    /// Gross pay plus bonus.
    pub total_compensation: Decimal,
    /// Tax withheld.
    pub tax_deduction: Decimal,
    /// Insurance withheld.
    pub insurance_deduction: Decimal,
    /// Amount paid out.
    pub net_pay: Decimal,
    /// Date of payment.
    pub pay_date: NaiveDate,
    /// Pay-period label.
    pub pay_period: Option<String>,
    /// Calculation timestamp.
    pub created_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: PaycheckStatus,
}

impl From<&Paycheck> for PaycheckView {
    fn from(paycheck: &Paycheck) -> Self {
        Self {
            id: paycheck.id(),
            employee_id: paycheck.employee_id().to_string(),
            business_id: paycheck.business_id().to_string(),
            gross_pay: paycheck.gross_pay(),
            bonus: paycheck.bonus(),
            total_compensation: paycheck.total_compensation(),
            tax_deduction: paycheck.tax_deduction(),
            insurance_deduction: paycheck.insurance_deduction(),
            net_pay: paycheck.net_pay(),
            pay_date: paycheck.pay_date(),
            pay_period: paycheck.pay_period().map(str::to_string),
            created_at: paycheck.created_at(),
            status: paycheck.status(),
        }
    }
}

impl From<Paycheck> for PaycheckView {
    fn from(paycheck: Paycheck) -> Self {
        PaycheckView::from(&paycheck)
    }
}
