#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use maintenance_scheduler::{
    DashboardSummary, FrequencyUnit, MaintenanceRecord, MaintenanceRegister, SchedulerConfig,
    http_api,
};
use serde_json::json;
use tower::util::ServiceExt;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_router() -> axum::Router {
    let state = http_api::AppState::new(MaintenanceRegister::new(), &SchedulerConfig::default());
    http_api::router(state)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn record_lifecycle_via_http_api() {
    let app = new_router();
    let record = MaintenanceRecord::new(
        1,
        "TRK-001",
        "Cambio de aceite",
        date(2024, 1, 1),
        5,
        FrequencyUnit::Days,
    )
    .with_business_days(true);
    let payload = serde_json::to_value(&record).unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: MaintenanceRecord = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(created.next_due, Some(date(2024, 1, 8)));

    // Creating the same id again conflicts
    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Update switches to calendar days
    let mut updated = record.clone();
    updated.use_business_days = false;
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/records/1",
            &serde_json::to_value(&updated).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: MaintenanceRecord = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(fetched.next_due, Some(date(2024, 1, 6)));

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/records/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", "/records/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("not_found"));
}

#[tokio::test]
async fn update_with_mismatched_id_is_rejected() {
    let app = new_router();
    let record = MaintenanceRecord::new(
        2,
        "TRK-002",
        "Frenos",
        date(2024, 1, 1),
        1,
        FrequencyUnit::Months,
    );
    let response = app
        .oneshot(json_request(
            "PUT",
            "/records/1",
            &serde_json::to_value(&record).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_record_returns_bad_request() {
    let app = new_router();
    let payload = json!({
        "id": 1,
        "vehicle": "TRK-001",
        "program": "Aceite",
        "base_date": "2024-01-01",
        "frequency_value": 0,
        "frequency_unit": "days"
    });
    let response = app
        .oneshot(json_request("POST", "/records", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("invalid_request"));
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("at least 1")
    );
}

#[tokio::test]
async fn dashboard_classifies_against_query_date() {
    let register = MaintenanceRegister::from_records(vec![
        MaintenanceRecord::new(
            1,
            "TRK-001",
            "Aceite",
            date(2024, 1, 1),
            1,
            FrequencyUnit::Months,
        ),
        MaintenanceRecord::new(
            2,
            "TRK-002",
            "Frenos",
            date(2024, 1, 30),
            7,
            FrequencyUnit::Days,
        ),
        MaintenanceRecord::new(
            3,
            "TRK-003",
            "Llantas",
            date(2024, 1, 25),
            1,
            FrequencyUnit::Years,
        ),
    ])
    .unwrap();
    let state = http_api::AppState::new(register, &SchedulerConfig::default());
    let app = http_api::router(state);

    let response = app
        .oneshot(empty_request("GET", "/dashboard?now=2024-02-02&window=7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary: DashboardSummary = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(summary.as_of, date(2024, 2, 2));
    assert_eq!(summary.overdue, 1);
    assert_eq!(summary.due_soon, 1);
    assert_eq!(summary.pending, 1);
    let alert_ids: Vec<i32> = summary.critical_alerts.iter().map(|c| c.record.id).collect();
    assert_eq!(alert_ids, vec![1, 2]);
    assert_eq!(summary.critical_alerts[1].days_until_due, 4);
}

#[tokio::test]
async fn next_due_endpoint_computes_and_validates() {
    let app = new_router();
    let payload = json!({
        "base_date": "2024-01-31",
        "frequency_value": 1,
        "frequency_unit": "Meses"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/next-due", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["next_due"], json!("2024-02-29"));

    let payload = json!({
        "base_date": "2024-01-01",
        "frequency_value": 2,
        "frequency_unit": "Quincenas",
        "use_business_days": true
    });
    let response = app
        .oneshot(json_request("POST", "/next-due", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("invalid_request"));
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = new_router();
    let negative = json!({
        "id": 1,
        "vehicle": "TRK-001",
        "program": "Aceite",
        "base_date": "2024-01-01",
        "frequency_value": -1,
        "frequency_unit": "days"
    });
    let impossible_date = json!({
        "base_date": "2024-02-30",
        "frequency_value": 1,
        "frequency_unit": "Meses"
    });
    let cases = [
        json_request("POST", "/records", &negative),
        json_request("POST", "/next-due", &impossible_date),
        empty_request("GET", "/records/abc"),
        empty_request("GET", "/dashboard?now=2024-13-01"),
    ];
    for request in cases {
        let uri = request.uri().to_string();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["error"], json!("invalid_request"), "{uri}");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()), "{uri}");
    }
}

#[tokio::test]
async fn records_accept_spanish_unit_labels() {
    let app = new_router();
    let payload = json!({
        "id": 7,
        "vehicle": "GRU-07",
        "program": "Revisión",
        "base_date": "2024-01-31",
        "frequency_value": 1,
        "frequency_unit": "Meses"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["frequency_unit"], json!("months"));
    assert_eq!(body["next_due"], json!("2024-02-29"));

    let mut unknown = payload.clone();
    unknown["id"] = json!(8);
    unknown["frequency_unit"] = json!("Quincenas");
    let response = app
        .oneshot(json_request("POST", "/records", &unknown))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap_or_default().contains("Quincenas"));
}

#[tokio::test]
async fn next_due_beyond_the_business_day_ceiling_is_rejected() {
    let app = new_router();
    // From a Thursday, 715 business days need more than 1000 calendar days.
    let payload = json!({
        "base_date": "2024-01-04",
        "frequency_value": 715,
        "frequency_unit": "dias",
        "use_business_days": true
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/next-due", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("invalid_request"));

    let payload = json!({
        "base_date": "2024-01-04",
        "frequency_value": 714,
        "frequency_unit": "dias",
        "use_business_days": true
    });
    let response = app
        .oneshot(json_request("POST", "/next-due", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
