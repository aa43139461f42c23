//! API handlers for Dotación REST endpoints

pub mod advisory;
pub mod dashboard;
pub mod documents;
pub mod equipment;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod settings;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE},
        request::Parts,
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{user::UserClaims, Equipment, ScheduleRow},
    query::Page,
    services::export::Sheet,
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(EquipmentPage = PaginatedResponse<Equipment>, SchedulePage = PaginatedResponse<ScheduleRow>)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records of the current page
    pub items: Vec<T>,
    /// Number of records matching the query
    pub total: usize,
    /// Current page number (1-based)
    pub page: usize,
    /// Records per page
    pub per_page: usize,
    pub total_pages: usize,
}

impl<T> From<Page<T>> for PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

/// Export format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Render a sheet as a CSV attachment or as its JSON structure
pub fn sheet_response(sheet: Sheet, format: ExportFormat, file_name: &str) -> Response {
    match format {
        ExportFormat::Json => Json(sheet).into_response(),
        ExportFormat::Csv => (
            [
                (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
            ],
            sheet.to_csv(),
        )
            .into_response(),
    }
}

/// Every API v1 route, relative to the `/api/v1` mount point
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard))
        // Equipment
        .route("/equipment", get(equipment::list_equipment).post(equipment::create_equipment))
        .route("/equipment/options", get(equipment::equipment_options))
        .route("/equipment/export", get(equipment::export_equipment))
        .route("/equipment/:id", get(equipment::get_equipment).put(equipment::update_equipment))
        .route("/equipment/:id/retire", post(equipment::retire_equipment))
        .route("/equipment/:id/summary", get(equipment::equipment_summary))
        .route("/equipment/:id/documentation", get(equipment::documentation_status))
        .route("/equipment/:id/documents", put(equipment::attach_document))
        .route("/equipment/:id/documents/:doc_type", delete(equipment::delete_document))
        .route("/equipment/:id/eol-forecast", post(advisory::equipment_eol_forecast))
        // Maintenance
        .route("/maintenance/tasks", get(maintenance::list_tasks).post(maintenance::create_task))
        .route("/maintenance/tasks/:id/complete", put(maintenance::complete_task))
        .route("/maintenance/tasks/:id", delete(maintenance::delete_task))
        .route("/maintenance/records", get(maintenance::list_records).post(maintenance::create_record))
        .route("/maintenance/schedule", get(maintenance::get_schedule))
        .route("/maintenance/schedule/options", get(maintenance::schedule_options))
        .route("/maintenance/schedule/export", get(maintenance::export_schedule))
        // Advisory
        .route("/advisory/eol-forecast", post(advisory::eol_forecast))
        .route("/advisory/compliance", post(advisory::compliance_suggestions))
        // Settings
        .route("/company", get(settings::get_company).put(settings::update_company))
        .route("/profile", get(settings::get_profile).put(settings::update_profile))
        .route("/standards", get(settings::list_standards))
        // Documents
        .route("/documents", get(documents::list_categories))
        .route("/documents/:category/files", post(documents::add_file))
        .route(
            "/documents/:category/files/:file",
            put(documents::rename_file).delete(documents::delete_file),
        )
        .with_state(state)
}
