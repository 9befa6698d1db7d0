//! Paycheck lifecycle rules.
//!
//! ## Transitions
//!
//! | From    | Allowed targets     |
//! |---------|---------------------|
//! | DRAFT   | PENDING, VOIDED     |
//! | PENDING | PAID, VOIDED        |
//! | PAID    | VOIDED              |
//! | VOIDED  | (none, terminal)    |
//!
//! The table is deliberately narrower than "VOIDED is terminal, PAID may only
//! be voided": a DRAFT cannot skip straight to PAID, a paycheck never moves
//! back (PENDING to DRAFT, for one), and a move to the current status is
//! rejected rather than treated as a no-op.
//!
//! Amounts may only change, and a paycheck may only be deleted, while it is
//! DRAFT.

use tracing::warn;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Paycheck, PaycheckStatus, PaycheckUpdate};

use super::payroll::PayrollCalculator;

impl PaycheckStatus {
    /// Returns true if a paycheck in this status may move to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::PaycheckStatus;
    ///
    /// assert!(PaycheckStatus::Paid.can_transition_to(PaycheckStatus::Voided));
    /// assert!(!PaycheckStatus::Paid.can_transition_to(PaycheckStatus::Pending));
    /// assert!(!PaycheckStatus::Voided.can_transition_to(PaycheckStatus::Draft));
    /// ```
    pub fn can_transition_to(self, next: PaycheckStatus) -> bool {
        use PaycheckStatus::*;
        matches!(
            (self, next),
            (Draft, Pending) | (Draft, Voided) | (Pending, Paid) | (Pending, Voided) | (Paid, Voided)
        )
    }

    /// Returns true if amounts may be changed in this status.
    pub fn is_mutable(self) -> bool {
        self == PaycheckStatus::Draft
    }

    /// Returns true if a paycheck in this status may be deleted.
    pub fn is_deletable(self) -> bool {
        self == PaycheckStatus::Draft
    }

    /// Returns true if no further transition is possible.
    pub fn is_terminal(self) -> bool {
        self == PaycheckStatus::Voided
    }
}

fn violation(paycheck_id: Uuid, status: PaycheckStatus, operation: String) -> EngineError {
    warn!(
        paycheck_id = %paycheck_id,
        status = %status,
        operation = %operation,
        "Paycheck lifecycle violation"
    );
    EngineError::LifecycleViolation {
        paycheck_id,
        status,
        operation,
    }
}

/// Fails unless `from` may move to `to`.
pub fn ensure_transition(
    paycheck_id: Uuid,
    from: PaycheckStatus,
    to: PaycheckStatus,
) -> EngineResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(violation(paycheck_id, from, format!("transition to {}", to)))
    }
}

/// Fails unless amounts may change in `status`.
pub fn ensure_mutable(paycheck_id: Uuid, status: PaycheckStatus) -> EngineResult<()> {
    if status.is_mutable() {
        Ok(())
    } else {
        Err(violation(paycheck_id, status, "update".to_string()))
    }
}

/// Fails unless a paycheck in `status` may be deleted.
pub fn ensure_deletable(paycheck_id: Uuid, status: PaycheckStatus) -> EngineResult<()> {
    if status.is_deletable() {
        Ok(())
    } else {
        Err(violation(paycheck_id, status, "delete".to_string()))
    }
}

/// Applies `update` to a DRAFT paycheck.
///
/// The bonus is applied first. When gross pay changes, tax and insurance are
/// recomputed with the calculator's current strategy over the new total
/// compensation; an explicit tax or insurance value in the same update wins
/// over the recomputed one. Either every change is applied or none is.
pub fn apply_update(
    paycheck: &mut Paycheck,
    update: &PaycheckUpdate,
    calculator: &PayrollCalculator,
) -> EngineResult<()> {
    paycheck.ensure_mutable()?;

    let mut updated = paycheck.clone();

    if let Some(bonus) = update.bonus {
        updated.set_bonus(Some(bonus))?;
    }

    if let Some(gross_pay) = update.gross_pay {
        updated.set_gross_pay(gross_pay)?;
        let deductions = calculator.deductions_for(updated.total_compensation())?;
        if update.tax_deduction.is_none() {
            updated.set_tax_deduction(deductions.tax)?;
        }
        if update.insurance_deduction.is_none() {
            updated.set_insurance_deduction(deductions.insurance)?;
        }
    }

    if let Some(tax) = update.tax_deduction {
        updated.set_tax_deduction(tax)?;
    }
    if let Some(insurance) = update.insurance_deduction {
        updated.set_insurance_deduction(insurance)?;
    }

    *paycheck = updated;
    Ok(())
}
