//! Insurance deduction rule.
//!
//! Insurance is withheld as a flat percentage of total compensation.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// The default insurance rate (5%).
pub const DEFAULT_INSURANCE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Computes the insurance deduction for a compensation amount.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::InsuranceRule;
/// use rust_decimal::Decimal;
///
/// let rule = InsuranceRule::default();
/// assert_eq!(rule.calculate(Decimal::from(50000)), Decimal::from(2500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsuranceRule {
    rate: Decimal,
}

impl InsuranceRule {
    /// Creates a rule withholding `rate` of compensation. The rate must lie in `[0, 1]`.
    pub fn new(rate: Decimal) -> EngineResult<Self> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(EngineError::validation(format!(
                "insurance rate must be between 0 and 1, got {}",
                rate
            )));
        }
        Ok(Self { rate })
    }

    /// The configured rate.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Returns the insurance deduction on `amount`.
    pub fn calculate(&self, amount: Decimal) -> Decimal {
        amount * self.rate
    }
}

impl Default for InsuranceRule {
    fn default() -> Self {
        Self {
            rate: DEFAULT_INSURANCE_RATE,
        }
    }
}
