//! Request types for the payroll API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::PaycheckStatus;

/// Body for endpoints taking an optional additional amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmountRequest {
    /// Additional amount; absent or zero means salary only.
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// Body for the single-employee bonus endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusRequest {
    /// Bonus amount; must be positive.
    pub amount: Decimal,
}

/// Body for the paycheck status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    /// Target status, e.g. `"PENDING"`.
    pub status: PaycheckStatus,
}

/// Query string carrying an optional inclusive date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeQuery {
    /// First day of the range.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Last day of the range.
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateRangeQuery {
    /// Returns both bounds, failing when either is missing.
    pub fn require(&self) -> EngineResult<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(EngineError::validation(
                "both 'start' and 'end' query parameters are required",
            )),
        }
    }
}

/// Body returned by the tax strategy endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxStrategyResponse {
    /// Name of the strategy in force.
    pub name: String,
}
