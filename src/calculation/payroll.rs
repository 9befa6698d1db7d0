//! Paycheck calculation.
//!
//! This module builds [`Paycheck`] records from an employee's salary and an
//! optional bonus. Tax and insurance are both computed on total compensation
//! (salary plus bonus), while the bonus itself is kept separate from gross pay.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Paycheck};

use super::insurance::InsuranceRule;
use super::tax_strategy::{SharedTaxStrategy, TaxStrategy};

/// Tax and insurance withheld on one compensation amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deductions {
    /// Tax owed under the strategy in force.
    pub tax: Decimal,
    /// Insurance withheld.
    pub insurance: Decimal,
}

/// Builds DRAFT paychecks using the current tax strategy and insurance rule.
///
/// Clones share the tax strategy slot, so replacing the strategy through
/// one clone affects all of them.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{FlatTaxStrategy, InsuranceRule, PayrollCalculator};
/// use payroll_engine::models::Employee;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
/// use std::sync::Arc;
///
/// let calculator = PayrollCalculator::new(
///     Arc::new(FlatTaxStrategy::new(Decimal::from_str("0.15").unwrap()).unwrap()),
///     InsuranceRule::default(),
/// );
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     business_id: "biz_001".to_string(),
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     salary: Some(Decimal::from(50000)),
///     manager: None,
/// };
///
/// let pay_date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
/// let paycheck = calculator
///     .calculate_with_bonus(&employee, Decimal::from(10000), pay_date)
///     .unwrap();
///
/// assert_eq!(paycheck.gross_pay(), Decimal::from(50000));
/// assert_eq!(paycheck.tax_deduction(), Decimal::from(9000));
/// assert_eq!(paycheck.insurance_deduction(), Decimal::from(3000));
/// assert_eq!(paycheck.net_pay(), Decimal::from(48000));
/// ```
#[derive(Debug, Clone)]
pub struct PayrollCalculator {
    strategy: SharedTaxStrategy,
    insurance: InsuranceRule,
}

impl PayrollCalculator {
    /// Creates a calculator with its own tax strategy slot.
    pub fn new(strategy: Arc<dyn TaxStrategy>, insurance: InsuranceRule) -> Self {
        Self::with_shared_strategy(SharedTaxStrategy::new(strategy), insurance)
    }

    /// Creates a calculator reading from an existing strategy slot.
    pub fn with_shared_strategy(strategy: SharedTaxStrategy, insurance: InsuranceRule) -> Self {
        Self {
            strategy,
            insurance,
        }
    }

    /// The strategy slot this calculator reads from.
    pub fn tax_strategy(&self) -> &SharedTaxStrategy {
        &self.strategy
    }

    /// The insurance rule in use.
    pub fn insurance_rule(&self) -> InsuranceRule {
        self.insurance
    }

    /// Computes tax and insurance on `total_compensation` with the strategy
    /// currently in force.
    pub fn deductions_for(&self, total_compensation: Decimal) -> EngineResult<Deductions> {
        let strategy = self.strategy.current();
        let tax = strategy.calculate_tax(total_compensation)?;
        let insurance = self.insurance.calculate(total_compensation);
        debug!(
            strategy = strategy.name(),
            total_compensation = %total_compensation,
            tax = %tax,
            insurance = %insurance,
            "Deductions calculated"
        );
        Ok(Deductions { tax, insurance })
    }

    /// Calculates a salary-only paycheck.
    pub fn calculate_regular(
        &self,
        employee: &Employee,
        pay_date: NaiveDate,
    ) -> EngineResult<Paycheck> {
        let salary = salary_of(employee)?;
        let deductions = self.deductions_for(salary).map_err(|e| calculation_failed(employee, e))?;
        build_paycheck(employee, salary, None, deductions, pay_date)
    }

    /// Calculates a paycheck paying `bonus` on top of the salary.
    ///
    /// The bonus must be positive. It is taxed and insured together with the
    /// salary but stored separately from gross pay.
    pub fn calculate_with_bonus(
        &self,
        employee: &Employee,
        bonus: Decimal,
        pay_date: NaiveDate,
    ) -> EngineResult<Paycheck> {
        if bonus <= Decimal::ZERO {
            return Err(EngineError::validation(format!(
                "bonus amount must be positive, got {}",
                bonus
            )));
        }
        let salary = salary_of(employee)?;
        let total = salary.checked_add(bonus).ok_or_else(|| {
            calculation_failed(employee, EngineError::amount_overflow("salary plus bonus"))
        })?;
        let deductions = self
            .deductions_for(total)
            .map_err(|e| calculation_failed(employee, e))?;
        build_paycheck(employee, salary, Some(bonus), deductions, pay_date)
    }

    /// Calculates a paycheck with an optional additional amount.
    ///
    /// A missing or zero amount is a regular paycheck; a positive amount is
    /// paid as a bonus.
    pub fn calculate_additional(
        &self,
        employee: &Employee,
        amount: Option<Decimal>,
        pay_date: NaiveDate,
    ) -> EngineResult<Paycheck> {
        match amount {
            None => self.calculate_regular(employee, pay_date),
            Some(amount) if amount.is_zero() => self.calculate_regular(employee, pay_date),
            Some(amount) => self.calculate_with_bonus(employee, amount, pay_date),
        }
    }
}

/// Label used for the pay period of a paycheck paid on `pay_date`.
pub fn pay_period_label(pay_date: NaiveDate) -> String {
    pay_date.format("%B %Y").to_string()
}

fn salary_of(employee: &Employee) -> EngineResult<Decimal> {
    match employee.salary {
        None => Err(EngineError::CalculationFailed {
            employee_id: employee.id.clone(),
            message: "salary is not set".to_string(),
        }),
        Some(salary) if salary < Decimal::ZERO => Err(EngineError::CalculationFailed {
            employee_id: employee.id.clone(),
            message: format!("salary cannot be negative: {}", salary),
        }),
        Some(salary) => Ok(salary),
    }
}

fn calculation_failed(employee: &Employee, error: EngineError) -> EngineError {
    EngineError::CalculationFailed {
        employee_id: employee.id.clone(),
        message: error.to_string(),
    }
}

fn build_paycheck(
    employee: &Employee,
    salary: Decimal,
    bonus: Option<Decimal>,
    deductions: Deductions,
    pay_date: NaiveDate,
) -> EngineResult<Paycheck> {
    let paycheck = Paycheck::new_draft(
        employee.id.clone(),
        employee.business_id.clone(),
        salary,
        bonus,
        deductions.tax,
        deductions.insurance,
        pay_date,
    )
    .map_err(|e| calculation_failed(employee, e))?;
    Ok(paycheck.with_pay_period(pay_period_label(pay_date)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{FlatTaxStrategy, ProgressiveTaxStrategy, TaxBracket};
    use crate::models::PaycheckStatus;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pay_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn create_test_employee(salary: Option<&str>) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            business_id: "biz_001".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            salary: salary.map(dec),
            manager: None,
        }
    }

    fn flat_calculator() -> PayrollCalculator {
        PayrollCalculator::new(
            Arc::new(FlatTaxStrategy::new(dec("0.15")).unwrap()),
            InsuranceRule::default(),
        )
    }

    #[test]
    fn test_regular_paycheck_uses_salary_as_gross() {
        let paycheck = flat_calculator()
            .calculate_regular(&create_test_employee(Some("50000")), pay_date())
            .unwrap();

        assert_eq!(paycheck.gross_pay(), dec("50000"));
        assert!(paycheck.bonus().is_none());
        assert_eq!(paycheck.tax_deduction(), dec("7500"));
        assert_eq!(paycheck.insurance_deduction(), dec("2500"));
        assert_eq!(paycheck.net_pay(), dec("40000"));
        assert_eq!(paycheck.status(), PaycheckStatus::Draft);
        assert_eq!(paycheck.pay_date(), pay_date());
        assert_eq!(paycheck.pay_period(), Some("October 2026"));
        assert_eq!(paycheck.business_id(), "biz_001");
    }

    #[test]
    fn test_regular_paycheck_requires_salary() {
        let result = flat_calculator().calculate_regular(&create_test_employee(None), pay_date());
        assert!(matches!(
            result,
            Err(EngineError::CalculationFailed { ref employee_id, .. }) if employee_id == "emp_001"
        ));
    }

    #[test]
    fn test_negative_salary_fails_calculation() {
        let result =
            flat_calculator().calculate_regular(&create_test_employee(Some("-1")), pay_date());
        assert!(matches!(result, Err(EngineError::CalculationFailed { .. })));
    }

    #[test]
    fn test_zero_salary_is_allowed() {
        let paycheck = flat_calculator()
            .calculate_regular(&create_test_employee(Some("0")), pay_date())
            .unwrap();
        assert_eq!(paycheck.net_pay(), Decimal::ZERO);
    }

    #[test]
    fn test_bonus_is_taxed_with_salary_but_kept_separate() {
        let paycheck = flat_calculator()
            .calculate_with_bonus(&create_test_employee(Some("50000")), dec("10000"), pay_date())
            .unwrap();

        assert_eq!(paycheck.gross_pay(), dec("50000"));
        assert_eq!(paycheck.bonus(), Some(dec("10000")));
        assert_eq!(paycheck.tax_deduction(), dec("9000"));
        assert_eq!(paycheck.insurance_deduction(), dec("3000"));
        assert_eq!(paycheck.net_pay(), dec("48000"));
    }

    #[test]
    fn test_bonus_must_be_positive() {
        let calculator = flat_calculator();
        let employee = create_test_employee(Some("50000"));

        assert!(matches!(
            calculator.calculate_with_bonus(&employee, Decimal::ZERO, pay_date()),
            Err(EngineError::Validation { .. })
        ));
        assert!(matches!(
            calculator.calculate_with_bonus(&employee, dec("-5"), pay_date()),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_bonus_beyond_decimal_range_fails_instead_of_panicking() {
        let calculator = flat_calculator();
        let employee = create_test_employee(Some("50000"));

        let result = calculator.calculate_with_bonus(&employee, Decimal::MAX, pay_date());

        assert!(matches!(
            result,
            Err(EngineError::CalculationFailed { ref employee_id, ref message })
                if employee_id == &employee.id && message.contains("salary plus bonus")
        ));
    }

    #[test]
    fn test_additional_without_amount_is_regular() {
        let calculator = flat_calculator();
        let employee = create_test_employee(Some("50000"));

        let none = calculator.calculate_additional(&employee, None, pay_date()).unwrap();
        let zero = calculator
            .calculate_additional(&employee, Some(Decimal::ZERO), pay_date())
            .unwrap();
        let regular = calculator.calculate_regular(&employee, pay_date()).unwrap();

        assert_eq!(none.net_pay(), regular.net_pay());
        assert_eq!(zero.net_pay(), regular.net_pay());
        assert!(zero.bonus().is_none());
    }

    #[test]
    fn test_additional_with_amount_is_bonus() {
        let paycheck = flat_calculator()
            .calculate_additional(&create_test_employee(Some("50000")), Some(dec("500")), pay_date())
            .unwrap();
        assert_eq!(paycheck.bonus(), Some(dec("500")));
    }

    #[test]
    fn test_progressive_bonus_spans_brackets() {
        let strategy = ProgressiveTaxStrategy::new(vec![
            TaxBracket {
                threshold: dec("10000"),
                rate: dec("0.10"),
            },
            TaxBracket {
                threshold: dec("50000"),
                rate: dec("0.20"),
            },
        ])
        .unwrap();
        let calculator = PayrollCalculator::new(Arc::new(strategy), InsuranceRule::default());

        let paycheck = calculator
            .calculate_with_bonus(&create_test_employee(Some("50000")), dec("10000"), pay_date())
            .unwrap();

        assert_eq!(paycheck.tax_deduction(), dec("11000"));
        assert_eq!(paycheck.insurance_deduction(), dec("3000"));
        assert_eq!(paycheck.net_pay(), dec("46000"));
    }

    #[test]
    fn test_replacing_strategy_affects_later_calculations_only() {
        let calculator = flat_calculator();
        let employee = create_test_employee(Some("1000"));

        let before = calculator.calculate_regular(&employee, pay_date()).unwrap();
        calculator
            .tax_strategy()
            .replace(Arc::new(FlatTaxStrategy::new(dec("0.30")).unwrap()));
        let after = calculator.calculate_regular(&employee, pay_date()).unwrap();

        assert_eq!(before.tax_deduction(), dec("150"));
        assert_eq!(after.tax_deduction(), dec("300"));
    }

    #[test]
    fn test_pay_period_label_uses_month_and_year() {
        let date = NaiveDate::from_ymd_opt(2027, 1, 31).unwrap();
        assert_eq!(pay_period_label(date), "January 2027");
    }
}
