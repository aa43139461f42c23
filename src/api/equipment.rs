//! Equipment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        dates::parse_date,
        equipment::{AttachDocument, CreateEquipment, UpdateEquipment},
        DocumentType, Equipment, EquipmentDocument,
    },
    query::{Direction, ListView, SortSpec},
    services::{
        compliance::{self, DocumentationStatus, EquipmentSummary},
        equipment::inventory_filters,
        export::{self, Sheet},
    },
    AppState,
};

use super::{sheet_response, AuthenticatedUser, EquipmentPage, ExportFormat, PaginatedResponse};

/// Equipment list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EquipmentQuery {
    /// Free-text search over every field (case and accent insensitive)
    pub search: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub risk: Option<String>,
    pub status: Option<String>,
    pub sede: Option<String>,
    pub location: Option<String>,
    /// Sort field (default: name)
    pub sort: Option<String>,
    pub direction: Option<Direction>,
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Export format (csv or json)
    pub format: Option<ExportFormat>,
}

impl EquipmentQuery {
    fn list_view(&self) -> ListView {
        let mut view = ListView::new(inventory_filters());
        view.set_search(self.search.as_deref().unwrap_or_default());

        // Governing fields first so their dependents survive
        let filters = [
            ("manufacturer", &self.manufacturer),
            ("model", &self.model),
            ("risk", &self.risk),
            ("status", &self.status),
            ("sede", &self.sede),
            ("location", &self.location),
        ];
        for (field, value) in filters {
            view.set_filter(field, value.as_deref().unwrap_or_default());
        }

        view.set_sort(SortSpec::new(
            self.sort.as_deref().filter(|s| !s.is_empty()).unwrap_or("name"),
            self.direction.unwrap_or_default(),
        ));
        view
    }
}

/// Option set query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct OptionsQuery {
    /// Narrows the `model` options
    pub manufacturer: Option<String>,
    /// Narrows the `location` options
    pub sede: Option<String>,
}

/// List equipment with search, filters, sort and pagination
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Current page of equipment", body = EquipmentPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<PaginatedResponse<Equipment>>> {
    claims.require_equipment_module()?;

    let mut view = query.list_view();
    let all = state.services.equipment.all().await;
    if let Some(page) = query.page {
        // Out-of-range pages keep page 1
        view.go_to_page(all.as_slice(), usize::try_from(page).unwrap_or(0));
    }

    Ok(Json(state.services.equipment.list(&view).await.into()))
}

/// Distinct values for the list filters
#[utoipa::path(
    get,
    path = "/equipment/options",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(OptionsQuery),
    responses(
        (status = 200, description = "Option set per filter field, keyed by field name")
    )
)]
pub async fn equipment_options(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<OptionsQuery>,
) -> AppResult<Json<IndexMap<String, Vec<String>>>> {
    claims.require_equipment_module()?;

    let options = state
        .services
        .equipment
        .options(query.manufacturer.as_deref(), query.sede.as_deref())
        .await;
    Ok(Json(options))
}

/// Export the filtered and sorted inventory
#[utoipa::path(
    get,
    path = "/equipment/export",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "CSV attachment, or the sheet structure when format=json", body = Sheet)
    )
)]
pub async fn export_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Response> {
    claims.require_equipment_module()?;

    let selected = state.services.equipment.select(&query.list_view()).await;
    let sheet = export::inventory_sheet(&selected);
    tracing::info!(rows = sheet.rows.len(), "Inventory exported");

    Ok(sheet_response(sheet, query.format.unwrap_or_default(), export::INVENTORY_FILE_NAME))
}

/// Create a new equipment record
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_write_equipment()?;
    data.validate()?;

    let created = state.services.equipment.add(data).await;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment record", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Equipment>> {
    claims.require_equipment_module()?;

    let equipment = state.services.equipment.get_by_id(&id).await?;
    Ok(Json(equipment))
}

/// Replace every field of an equipment record
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(update): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_write_equipment()?;
    update.validate()?;

    state
        .services
        .equipment
        .update(&id, update.data, update.documents)
        .await
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// Retire an equipment record (status "Dado de Baja")
#[utoipa::path(
    post,
    path = "/equipment/{id}/retire",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment retired", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn retire_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Equipment>> {
    claims.require_write_equipment()?;

    let retired = state.services.equipment.retire(&id).await.ok_or_else(|| not_found(&id))?;
    tracing::info!(id = %retired.id, "Equipment retired");
    Ok(Json(retired))
}

/// Detail-page figures of one equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/summary",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment summary", body = EquipmentSummary),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn equipment_summary(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<EquipmentSummary>> {
    claims.require_equipment_module()?;

    let equipment = state.services.equipment.get_by_id(&id).await?;
    let records = state.services.maintenance.records(Some(&id)).await;
    let tasks = state.services.maintenance.tasks().await;
    Ok(Json(compliance::equipment_summary(&equipment, &records, &tasks)))
}

/// Attachment state of each required documentation kind
#[utoipa::path(
    get,
    path = "/equipment/{id}/documentation",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Documentation completeness", body = Vec<DocumentationStatus>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn documentation_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<DocumentationStatus>>> {
    claims.require_equipment_module()?;

    let equipment = state.services.equipment.get_by_id(&id).await?;
    Ok(Json(compliance::required_documentation_completeness(&equipment)))
}

/// Attach a document, replacing any document of the same type
#[utoipa::path(
    put,
    path = "/equipment/{id}/documents",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = AttachDocument,
    responses(
        (status = 200, description = "Document attached", body = Equipment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn attach_document(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<AttachDocument>,
) -> AppResult<Json<Equipment>> {
    claims.require_write_equipment()?;
    request.validate()?;

    let date = match request.date.filter(|d| !d.trim().is_empty()) {
        Some(date) => {
            parse_date(&date).ok_or_else(|| AppError::Validation(format!("Invalid document date: {}", date)))?;
            date
        }
        None => Utc::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let document = EquipmentDocument {
        doc_type: request.doc_type,
        name: request.name,
        date,
    };

    state
        .services
        .equipment
        .add_document(&id, document)
        .await
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// Remove the document of a type (no-op when none is attached)
#[utoipa::path(
    delete,
    path = "/equipment/{id}/documents/{doc_type}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Equipment ID"),
        ("doc_type" = DocumentType, Path, description = "Document type")
    ),
    responses(
        (status = 200, description = "Document removed", body = Equipment),
        (status = 400, description = "Unknown document type"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_document(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, doc_type)): Path<(String, String)>,
) -> AppResult<Json<Equipment>> {
    claims.require_write_equipment()?;

    let doc_type: DocumentType = doc_type.parse().map_err(AppError::BadRequest)?;
    state
        .services
        .equipment
        .delete_document(&id, doc_type)
        .await
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Equipment {} not found", id))
}
