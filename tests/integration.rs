//! HTTP integration tests for the payroll engine.
//!
//! This suite drives the router end to end over in-memory storage:
//! - Regular, bonus and additional pay calculation
//! - Previews
//! - Bulk bonus distribution with partial failures
//! - Paycheck updates and the lifecycle rules
//! - Tax strategy replacement
//! - History and summaries
//! - Error cases

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::PayrollConfig;
use payroll_engine::models::{Business, Employee, Manager, ManagerRole};
use payroll_engine::service::PayrollService;
use payroll_engine::store::{InMemoryEmployeeDirectory, InMemoryPaycheckRepository};

// =============================================================================
// Test Helpers
// =============================================================================

fn employee(id: &str, salary: Option<&str>, department: &str) -> Employee {
    Employee {
        id: id.to_string(),
        business_id: "biz_001".to_string(),
        first_name: "Alex".to_string(),
        last_name: id.to_string(),
        salary: salary.map(decimal),
        manager: Some(Manager {
            id: format!("mgr_{}", department.to_lowercase()),
            name: "Dana Reyes".to_string(),
            role: ManagerRole::Employer {
                department: Some(department.to_string()),
            },
        }),
    }
}

fn create_router_for_test() -> Router {
    let directory = InMemoryEmployeeDirectory::new();
    directory.add_business(Business {
        id: "biz_001".to_string(),
        name: "Acme Pty Ltd".to_string(),
    });
    directory
        .add_employee(employee("emp_001", Some("50000"), "Engineering"))
        .unwrap();
    directory
        .add_employee(employee("emp_002", Some("50000"), "Engineering"))
        .unwrap();
    directory
        .add_employee(employee("emp_003", Some("60000"), "Sales"))
        .unwrap();
    directory
        .add_employee(employee("emp_004", None, "Sales"))
        .unwrap();

    let service = PayrollService::from_config(
        Arc::new(directory),
        Arc::new(InMemoryPaycheckRepository::new()),
        &PayrollConfig::default(),
    )
    .unwrap();
    create_router(AppState::new(service))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn amount(value: &Value) -> Decimal {
    match value {
        Value::String(s) => decimal(s),
        other => decimal(&other.to_string()),
    }
}

fn today() -> String {
    Utc::now().date_naive().to_string()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn create_paycheck(router: &Router, employee_id: &str) -> String {
    let (status, body) = send(router, "POST", &format!("/payroll/employees/{}", employee_id), None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn set_status(router: &Router, id: &str, status: &str) -> (StatusCode, Value) {
    send(
        router,
        "PUT",
        &format!("/payroll/paychecks/{}/status", id),
        Some(json!({ "status": status })),
    )
    .await
}

// =============================================================================
// Calculation
// =============================================================================

#[tokio::test]
async fn test_regular_payroll_uses_default_flat_tax() {
    let router = create_router_for_test();

    let (status, body) = send(&router, "POST", "/payroll/employees/emp_001", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["employee_id"], "emp_001");
    assert_eq!(body["business_id"], "biz_001");
    assert_eq!(amount(&body["gross_pay"]), decimal("50000"));
    assert_eq!(amount(&body["tax_deduction"]), decimal("7500"));
    assert_eq!(amount(&body["insurance_deduction"]), decimal("2500"));
    assert_eq!(amount(&body["net_pay"]), decimal("40000"));
    assert!(body["bonus"].is_null());
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_bonus_payroll_taxes_total_compensation() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/employees/emp_001/bonus",
        Some(json!({ "amount": "10000" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(amount(&body["gross_pay"]), decimal("50000"));
    assert_eq!(amount(&body["bonus"]), decimal("10000"));
    assert_eq!(amount(&body["total_compensation"]), decimal("60000"));
    assert_eq!(amount(&body["tax_deduction"]), decimal("9000"));
    assert_eq!(amount(&body["insurance_deduction"]), decimal("3000"));
    assert_eq!(amount(&body["net_pay"]), decimal("48000"));
}

#[tokio::test]
async fn test_non_positive_bonus_is_rejected() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/employees/emp_001/bonus",
        Some(json!({ "amount": "0" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_additional_pay_without_amount_is_regular() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/employees/emp_001/additional",
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["bonus"].is_null());
    assert_eq!(amount(&body["net_pay"]), decimal("40000"));
}

#[tokio::test]
async fn test_preview_is_idempotent_and_not_stored() {
    let router = create_router_for_test();
    let body = Some(json!({ "amount": "2500" }));

    let (status_a, first) = send(&router, "POST", "/payroll/employees/emp_001/preview", body.clone()).await;
    let (status_b, second) = send(&router, "POST", "/payroll/employees/emp_001/preview", body).await;
    let (_, history) = send(&router, "GET", "/payroll/employees/emp_001/history", None).await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert!(first["id"].is_null());
    assert_eq!(first["net_pay"], second["net_pay"]);
    assert_eq!(first["tax_deduction"], second["tax_deduction"]);
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_employee_is_404() {
    let router = create_router_for_test();

    let (status, body) = send(&router, "POST", "/payroll/employees/emp_999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("emp_999"));
}

#[tokio::test]
async fn test_missing_salary_is_calculation_failure() {
    let router = create_router_for_test();

    let (status, body) = send(&router, "POST", "/payroll/employees/emp_004", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CALCULATION_FAILED");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let router = create_router_for_test();

    let request = Request::builder()
        .method("POST")
        .uri("/payroll/employees/emp_001/bonus")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_amount_field_is_validation_error() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/employees/emp_001/bonus",
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Tax strategy
// =============================================================================

#[tokio::test]
async fn test_progressive_strategy_swap() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "PUT",
        "/payroll/tax-strategy",
        Some(json!({
            "kind": "progressive",
            "brackets": [
                { "threshold": "50000", "rate": "0.20" },
                { "threshold": "10000", "rate": "0.10" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Progressive Tax (2 brackets)");

    let (_, current) = send(&router, "GET", "/payroll/tax-strategy", None).await;
    assert_eq!(current["name"], "Progressive Tax (2 brackets)");

    let (_, paycheck) = send(&router, "POST", "/payroll/employees/emp_003", None).await;
    assert_eq!(amount(&paycheck["tax_deduction"]), decimal("11000"));
}

#[tokio::test]
async fn test_invalid_strategy_keeps_current_one() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "PUT",
        "/payroll/tax-strategy",
        Some(json!({ "kind": "flat", "rate": "1.5" })),
    )
    .await;
    let (_, current) = send(&router, "GET", "/payroll/tax-strategy", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(current["name"], "Flat Tax (15%)");
}

// =============================================================================
// Bonus distribution
// =============================================================================

#[tokio::test]
async fn test_distribution_with_unknown_id_is_partial_success() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/bonuses",
        Some(json!({
            "business_id": "biz_001",
            "bonus_amount": "1000",
            "employee_ids": ["emp_001", "emp_unknown"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let successes = body["successes"].as_array().unwrap();
    let failures = body["failures"].as_array().unwrap();
    assert_eq!(successes.len(), 1);
    assert_eq!(failures.len(), 1);
    assert_eq!(successes[0]["employee_id"], "emp_001");
    assert!(failures[0].as_str().unwrap().contains("emp_unknown"));
}

#[tokio::test]
async fn test_distribution_by_department() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/bonuses",
        Some(json!({
            "business_id": "biz_001",
            "bonus_amount": "500",
            "department": "engineering",
            "description": "Q3 delivery"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["successes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["employee_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["emp_001", "emp_002"]);
    assert!(body["failures"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_distribution_where_everyone_fails_is_422() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/bonuses",
        Some(json!({
            "business_id": "biz_001",
            "bonus_amount": "500",
            "employee_ids": ["emp_004"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "BATCH_FAILED");
    assert!(body["details"].as_str().unwrap().contains("emp_004"));
}

#[tokio::test]
async fn test_distribution_for_unknown_business_is_404() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "POST",
        "/payroll/bonuses",
        Some(json!({ "business_id": "biz_404", "bonus_amount": "500" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Paycheck lifecycle
// =============================================================================

#[tokio::test]
async fn test_update_draft_recomputes_net_pay() {
    let router = create_router_for_test();
    let id = create_paycheck(&router, "emp_001").await;

    let (status, body) = send(
        &router,
        "PATCH",
        &format!("/payroll/paychecks/{}", id),
        Some(json!({ "gross_pay": "40000" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["tax_deduction"]), decimal("6000"));
    assert_eq!(amount(&body["insurance_deduction"]), decimal("2000"));
    assert_eq!(amount(&body["net_pay"]), decimal("32000"));

    let (_, fetched) = send(&router, "GET", &format!("/payroll/paychecks/{}", id), None).await;
    assert_eq!(amount(&fetched["net_pay"]), decimal("32000"));
}

#[tokio::test]
async fn test_paid_paycheck_rejects_update_and_delete_but_can_be_voided() {
    let router = create_router_for_test();
    let id = create_paycheck(&router, "emp_001").await;
    assert_eq!(set_status(&router, &id, "PENDING").await.0, StatusCode::OK);
    assert_eq!(set_status(&router, &id, "PAID").await.0, StatusCode::OK);

    let (update_status, update_body) = send(
        &router,
        "PATCH",
        &format!("/payroll/paychecks/{}", id),
        Some(json!({ "bonus": "100" })),
    )
    .await;
    let (delete_status, _) = send(&router, "DELETE", &format!("/payroll/paychecks/{}", id), None).await;
    let (void_status, voided) = set_status(&router, &id, "VOIDED").await;

    assert_eq!(update_status, StatusCode::CONFLICT);
    assert_eq!(update_body["code"], "LIFECYCLE_VIOLATION");
    assert_eq!(delete_status, StatusCode::CONFLICT);
    assert_eq!(void_status, StatusCode::OK);
    assert_eq!(voided["status"], "VOIDED");
}

#[tokio::test]
async fn test_voided_paycheck_rejects_everything() {
    let router = create_router_for_test();
    let id = create_paycheck(&router, "emp_001").await;
    assert_eq!(set_status(&router, &id, "VOIDED").await.0, StatusCode::OK);

    let (update_status, _) = send(
        &router,
        "PATCH",
        &format!("/payroll/paychecks/{}", id),
        Some(json!({ "gross_pay": "1" })),
    )
    .await;
    let (delete_status, _) = send(&router, "DELETE", &format!("/payroll/paychecks/{}", id), None).await;

    assert_eq!(update_status, StatusCode::CONFLICT);
    assert_eq!(delete_status, StatusCode::CONFLICT);
    for next in ["DRAFT", "PENDING", "PAID", "VOIDED"] {
        assert_eq!(set_status(&router, &id, next).await.0, StatusCode::CONFLICT);
    }
}

#[tokio::test]
async fn test_draft_cannot_skip_to_paid() {
    let router = create_router_for_test();
    let id = create_paycheck(&router, "emp_001").await;

    let (status, body) = set_status(&router, &id, "PAID").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("DRAFT"));
}

#[tokio::test]
async fn test_delete_draft_returns_no_content() {
    let router = create_router_for_test();
    let id = create_paycheck(&router, "emp_001").await;

    let (status, body) = send(&router, "DELETE", &format!("/payroll/paychecks/{}", id), None).await;
    let (get_status, _) = send(&router, "GET", &format!("/payroll/paychecks/{}", id), None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert_eq!(get_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_paycheck_id_is_bad_request() {
    let router = create_router_for_test();

    let (status, body) = send(&router, "GET", "/payroll/paychecks/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// History and summary
// =============================================================================

#[tokio::test]
async fn test_history_lists_stored_paychecks() {
    let router = create_router_for_test();
    create_paycheck(&router, "emp_001").await;
    create_paycheck(&router, "emp_001").await;
    create_paycheck(&router, "emp_002").await;
    let today = today();

    let (status, all) = send(&router, "GET", "/payroll/employees/emp_001/history", None).await;
    let (_, ranged) = send(
        &router,
        "GET",
        &format!("/payroll/employees/emp_001/history?start={}&end={}", today, today),
        None,
    )
    .await;
    let (half_status, _) = send(
        &router,
        "GET",
        &format!("/payroll/employees/emp_001/history?start={}", today),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(ranged.as_array().unwrap().len(), 2);
    assert_eq!(half_status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary_rates_over_total_compensation() {
    let router = create_router_for_test();
    create_paycheck(&router, "emp_001").await;
    create_paycheck(&router, "emp_002").await;
    create_paycheck(&router, "emp_003").await;
    let today = today();

    let (status, body) = send(
        &router,
        "GET",
        &format!("/payroll/businesses/biz_001/summary?start={}&end={}", today, today),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paycheck_count"], 3);
    assert_eq!(body["employee_count"], 3);
    assert_eq!(amount(&body["total_gross_pay"]), decimal("160000"));
    assert_eq!(amount(&body["total_net_pay"]), decimal("128000"));
    assert_eq!(amount(&body["average_tax_rate"]), decimal("0.15"));
    assert_eq!(amount(&body["average_insurance_rate"]), decimal("0.05"));
}

#[tokio::test]
async fn test_summary_with_inverted_dates_is_rejected() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "GET",
        "/payroll/businesses/biz_404/summary?start=2026-10-31&end=2026-10-01",
        None,
    )
    .await;

    // Rejected on the range before the unknown business is looked up.
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_summary_requires_both_dates() {
    let router = create_router_for_test();

    let (status, body) = send(
        &router,
        "GET",
        "/payroll/businesses/biz_001/summary?start=2026-10-01",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_summary_for_unknown_business_is_404() {
    let router = create_router_for_test();

    let (status, _) = send(
        &router,
        "GET",
        "/payroll/businesses/biz_404/summary?start=2026-10-01&end=2026-10-31",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
