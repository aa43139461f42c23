//! Maintenance tasks, maintenance log and schedule endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{Datelike, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        maintenance::{CreateMaintenanceRecord, CreateMaintenanceTask, ScheduleQuery},
        MaintenanceRecord, MaintenanceTask, ScheduleRow,
    },
    services::export::{self, Sheet},
    AppState,
};

use super::{sheet_response, AuthenticatedUser, ExportFormat, PaginatedResponse, SchedulePage};

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordsQuery {
    /// Only records of this equipment
    pub equipment_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ScheduleOptionsQuery {
    /// Calendar year (default: current year)
    pub year: Option<i32>,
    /// Narrows the `model` options
    pub manufacturer: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// Export format (csv or json)
    pub format: Option<ExportFormat>,
}

/// List maintenance tasks
#[utoipa::path(
    get,
    path = "/maintenance/tasks",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Maintenance tasks", body = Vec<MaintenanceTask>)
    )
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<MaintenanceTask>>> {
    claims.require_equipment_module()?;
    Ok(Json(state.services.maintenance.tasks().await))
}

/// Schedule a maintenance task
#[utoipa::path(
    post,
    path = "/maintenance/tasks",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceTask,
    responses(
        (status = 201, description = "Task created", body = MaintenanceTask),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateMaintenanceTask>,
) -> AppResult<(StatusCode, Json<MaintenanceTask>)> {
    claims.require_write_equipment()?;
    data.validate()?;

    let task = state.services.maintenance.create_task(data).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Mark a task as completed
#[utoipa::path(
    put,
    path = "/maintenance/tasks/{id}/complete",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task completed", body = MaintenanceTask),
        (status = 404, description = "Task not found")
    )
)]
pub async fn complete_task(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MaintenanceTask>> {
    claims.require_write_equipment()?;
    Ok(Json(state.services.maintenance.complete_task(&id).await?))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/maintenance/tasks/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_write_equipment()?;

    state.services.maintenance.delete_task(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Maintenance log, newest first
#[utoipa::path(
    get,
    path = "/maintenance/records",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(RecordsQuery),
    responses(
        (status = 200, description = "Maintenance records", body = Vec<MaintenanceRecord>)
    )
)]
pub async fn list_records(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RecordsQuery>,
) -> AppResult<Json<Vec<MaintenanceRecord>>> {
    claims.require_equipment_module()?;

    let records = state
        .services
        .maintenance
        .records(query.equipment_id.as_deref())
        .await;
    Ok(Json(records))
}

/// Log executed maintenance work
#[utoipa::path(
    post,
    path = "/maintenance/records",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceRecord,
    responses(
        (status = 201, description = "Record created", body = MaintenanceRecord),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateMaintenanceRecord>,
) -> AppResult<(StatusCode, Json<MaintenanceRecord>)> {
    claims.require_write_equipment()?;
    data.validate()?;

    let record = state.services.maintenance.create_record(data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Yearly maintenance schedule
#[utoipa::path(
    get,
    path = "/maintenance/schedule",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Current page of schedule rows", body = SchedulePage)
    )
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<PaginatedResponse<ScheduleRow>>> {
    claims.require_equipment_module()?;

    let today = Utc::now().date_naive();
    let page = state.services.maintenance.schedule_page(&query, today).await;
    Ok(Json(page.into()))
}

/// Distinct values for the schedule filters
#[utoipa::path(
    get,
    path = "/maintenance/schedule/options",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(ScheduleOptionsQuery),
    responses(
        (status = 200, description = "Option set per filter field, keyed by field name")
    )
)]
pub async fn schedule_options(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ScheduleOptionsQuery>,
) -> AppResult<Json<IndexMap<String, Vec<String>>>> {
    claims.require_equipment_module()?;

    let today = Utc::now().date_naive();
    let options = state
        .services
        .maintenance
        .schedule_options(query.year.unwrap_or_else(|| today.year()), query.manufacturer.as_deref(), today)
        .await;
    Ok(Json(options))
}

/// Export the filtered schedule
#[utoipa::path(
    get,
    path = "/maintenance/schedule/export",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(ScheduleQuery, ExportQuery),
    responses(
        (status = 200, description = "CSV attachment, or the sheet structure when format=json", body = Sheet)
    )
)]
pub async fn export_schedule(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ScheduleQuery>,
    Query(export_query): Query<ExportQuery>,
) -> AppResult<Response> {
    claims.require_equipment_module()?;

    let (rows, _) = state
        .services
        .maintenance
        .select_schedule(&query, Utc::now().date_naive())
        .await;
    let sheet = export::schedule_sheet(&rows);
    tracing::info!(rows = sheet.rows.len(), "Maintenance schedule exported");

    Ok(sheet_response(
        sheet,
        export_query.format.unwrap_or_default(),
        export::SCHEDULE_FILE_NAME,
    ))
}
