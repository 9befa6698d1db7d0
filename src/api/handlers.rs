//! HTTP request handlers for the payroll API.
//!
//! Every handler delegates to [`PayrollService`](crate::service::PayrollService)
//! and maps engine errors through [`ApiErrorResponse`].

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::TaxStrategyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{BonusDistributionRequest, PaycheckUpdate};

use super::request::{AmountRequest, BonusRequest, DateRangeQuery, StatusRequest, TaxStrategyResponse};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/employees/:id", post(calculate_handler))
        .route("/payroll/employees/:id/bonus", post(bonus_handler))
        .route("/payroll/employees/:id/additional", post(additional_handler))
        .route("/payroll/employees/:id/preview", post(preview_handler))
        .route("/payroll/employees/:id/history", get(history_handler))
        .route("/payroll/bonuses", post(distribute_handler))
        .route(
            "/payroll/tax-strategy",
            get(get_tax_strategy_handler).put(set_tax_strategy_handler),
        )
        .route(
            "/payroll/paychecks/:id",
            get(get_paycheck_handler)
                .patch(update_paycheck_handler)
                .delete(delete_paycheck_handler),
        )
        .route("/payroll/paychecks/:id/status", put(status_handler))
        .route("/payroll/businesses/:id/summary", get(summary_handler))
        .with_state(state)
}

/// Handler for POST /payroll/employees/:id.
async fn calculate_handler(State(state): State<AppState>, Path(employee_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing payroll request");

    let result = state.service().calculate_payroll(&employee_id);
    finish(correlation_id, StatusCode::CREATED, result)
}

/// Handler for POST /payroll/employees/:id/bonus.
async fn bonus_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<BonusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing bonus payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state
        .service()
        .calculate_payroll_with_bonus(&employee_id, request.amount);
    finish(correlation_id, StatusCode::CREATED, result)
}

/// Handler for POST /payroll/employees/:id/additional.
async fn additional_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing additional pay request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state
        .service()
        .calculate_additional_pay(&employee_id, request.amount);
    finish(correlation_id, StatusCode::CREATED, result)
}

/// Handler for POST /payroll/employees/:id/preview.
///
/// Nothing is stored.
async fn preview_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Processing payroll preview");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state.service().preview_payroll(&employee_id, request.amount);
    finish(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /payroll/employees/:id/history.
async fn history_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let range = match query {
        Ok(Query(range)) => range,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    let result = state
        .service()
        .payroll_history(&employee_id, range.start, range.end);
    finish(correlation_id, StatusCode::OK, result)
}

/// Handler for POST /payroll/bonuses.
async fn distribute_handler(
    State(state): State<AppState>,
    payload: Result<Json<BonusDistributionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        business_id = %request.business_id,
        bonus_amount = %request.bonus_amount,
        "Processing bonus distribution"
    );

    let start_time = Instant::now();
    let result = state.service().distribute_bonuses(&request);
    if let Ok(response) = &result {
        info!(
            correlation_id = %correlation_id,
            successes = response.successes.len(),
            failures = response.failures.len(),
            duration_us = start_time.elapsed().as_micros(),
            "Bonus distribution finished"
        );
    }
    finish(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /payroll/tax-strategy.
async fn get_tax_strategy_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        TaxStrategyResponse {
            name: state.service().current_tax_strategy_name(),
        },
    )
}

/// Handler for PUT /payroll/tax-strategy.
async fn set_tax_strategy_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaxStrategyConfig>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let config = match payload {
        Ok(Json(config)) => config,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = config.build().map(|strategy| {
        state.service().set_tax_strategy(strategy);
        TaxStrategyResponse {
            name: state.service().current_tax_strategy_name(),
        }
    });
    finish(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /payroll/paychecks/:id.
async fn get_paycheck_handler(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = parse_paycheck_id(&raw_id).and_then(|id| state.service().get_paycheck(id));
    finish(correlation_id, StatusCode::OK, result)
}

/// Handler for PATCH /payroll/paychecks/:id.
async fn update_paycheck_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PaycheckUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, paycheck_id = %raw_id, "Processing paycheck update");

    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result =
        parse_paycheck_id(&raw_id).and_then(|id| state.service().update_paycheck(id, &update));
    finish(correlation_id, StatusCode::OK, result)
}

/// Handler for DELETE /payroll/paychecks/:id.
async fn delete_paycheck_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, paycheck_id = %raw_id, "Processing paycheck deletion");

    match parse_paycheck_id(&raw_id).and_then(|id| state.service().delete_paycheck(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PUT /payroll/paychecks/:id/status.
async fn status_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        paycheck_id = %raw_id,
        status = %request.status,
        "Processing paycheck status change"
    );
    let result = parse_paycheck_id(&raw_id)
        .and_then(|id| state.service().set_paycheck_status(id, request.status));
    finish(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /payroll/businesses/:id/summary.
async fn summary_handler(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let range = match query {
        Ok(Query(range)) => range,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    let result = range
        .require()
        .and_then(|(start, end)| state.service().payroll_summary(&business_id, start, end));
    finish(correlation_id, StatusCode::OK, result)
}

fn parse_paycheck_id(raw: &str) -> EngineResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| EngineError::validation(format!("invalid paycheck id: {}", raw)))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn finish<T: Serialize>(correlation_id: Uuid, status: StatusCode, result: EngineResult<T>) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, status = status.as_u16(), "Request completed");
            json_response(status, body)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query string error"
    );
    json_response(StatusCode::BAD_REQUEST, ApiError::validation_error(body_text))
}
