//! HTTP API for the payroll engine.
//!
//! A thin REST mapping of the [`PayrollService`](crate::service::PayrollService)
//! operations. Amounts travel as decimal strings.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AmountRequest, BonusRequest, DateRangeQuery, StatusRequest, TaxStrategyResponse};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
