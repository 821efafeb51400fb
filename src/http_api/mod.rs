use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    DashboardSummary, MaintenanceRecord, MaintenanceRegister, RegisterError, ScheduleSpec,
    SchedulerConfig, ValidationError,
};

#[derive(Clone)]
pub struct AppState {
    register: Arc<RwLock<MaintenanceRegister>>,
    due_soon_window_days: u32,
}

impl AppState {
    pub fn new(register: MaintenanceRegister, config: &SchedulerConfig) -> Self {
        Self {
            register: Arc::new(RwLock::new(register)),
            due_soon_window_days: config.due_soon_window_days,
        }
    }

    pub fn with_shared(
        register: Arc<RwLock<MaintenanceRegister>>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            register,
            due_soon_window_days: config.due_soon_window_days,
        }
    }

    fn register(&self) -> Arc<RwLock<MaintenanceRegister>> {
        self.register.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl From<RegisterError> for ApiError {
    fn from(value: RegisterError) -> Self {
        match value {
            RegisterError::NotFound(id) => ApiError::NotFound(format!("record {id} not found")),
            RegisterError::Validation(err) => err.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    now: Option<NaiveDate>,
    window: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct NextDuePayload {
    base_date: NaiveDate,
    frequency_value: i64,
    frequency_unit: String,
    #[serde(default)]
    use_business_days: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextDueResponse {
    pub next_due: NaiveDate,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/records", get(list_records).post(create_record))
        .route(
            "/records/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/dashboard", get(dashboard))
        .route("/next-due", post(next_due))
        .with_state(state)
}

pub async fn serve(
    addr: SocketAddr,
    register: MaintenanceRegister,
    config: &SchedulerConfig,
) -> std::io::Result<()> {
    let state = AppState::new(register, config);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "maintenance scheduler HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_records(State(state): State<AppState>) -> Json<Vec<MaintenanceRecord>> {
    let register = state.register();
    let records = {
        let guard = register.read();
        guard.records().to_vec()
    };
    Json(records)
}

async fn get_record(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<MaintenanceRecord>, ApiError> {
    let Path(record_id) = path?;
    let register = state.register();
    let result = {
        let guard = register.read();
        guard.get(record_id).cloned()
    };
    match result {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::not_found(format!("record {record_id} not found"))),
    }
}

async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<MaintenanceRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<MaintenanceRecord>), ApiError> {
    let Json(record) = payload?;
    let register = state.register();
    let created = {
        let mut guard = register.write();
        if guard.get(record.id).is_some() {
            return Err(ApiError::Conflict(format!(
                "record {} already exists",
                record.id
            )));
        }
        guard.upsert(record)?.clone()
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_record(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MaintenanceRecord>, JsonRejection>,
) -> Result<Json<MaintenanceRecord>, ApiError> {
    let Path(record_id) = path?;
    let Json(record) = payload?;
    if record.id != record_id {
        return Err(ApiError::invalid(
            "record id in payload does not match path parameter",
        ));
    }
    let register = state.register();
    let updated = {
        let mut guard = register.write();
        guard.update(record)?.clone()
    };
    Ok(Json(updated))
}

async fn delete_record(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(record_id) = path?;
    let register = state.register();
    let removed = {
        let mut guard = register.write();
        guard.remove(record_id)
    };
    if !removed {
        return Err(ApiError::not_found(format!("record {record_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let Query(query) = query?;
    // One clock sample per request keeps every record on the same `now`.
    let now = query.now.unwrap_or_else(|| Utc::now().date_naive());
    let window = query.window.unwrap_or(state.due_soon_window_days);
    let register = state.register();
    let summary = {
        let guard = register.read();
        guard.dashboard(now, window)
    };
    Ok(Json(summary))
}

async fn next_due(
    payload: Result<Json<NextDuePayload>, JsonRejection>,
) -> Result<Json<NextDueResponse>, ApiError> {
    let Json(payload) = payload?;
    let spec = ScheduleSpec::from_raw(
        payload.base_date,
        payload.frequency_value,
        &payload.frequency_unit,
        payload.use_business_days,
    )?;
    let next_due = spec.try_next_due_date().ok_or_else(|| {
        ApiError::invalid("next due date falls outside the supported calendar range")
    })?;
    Ok(Json(NextDueResponse { next_due }))
}
