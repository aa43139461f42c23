//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{advisory, dashboard, documents, equipment, health, maintenance, settings};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dotación API",
        version = "1.0.0",
        description = "Medical equipment inventory and Resolution 3100 compliance REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Dashboard
        dashboard::get_dashboard,
        // Equipment
        equipment::list_equipment,
        equipment::equipment_options,
        equipment::export_equipment,
        equipment::create_equipment,
        equipment::get_equipment,
        equipment::update_equipment,
        equipment::retire_equipment,
        equipment::equipment_summary,
        equipment::documentation_status,
        equipment::attach_document,
        equipment::delete_document,
        // Maintenance
        maintenance::list_tasks,
        maintenance::create_task,
        maintenance::complete_task,
        maintenance::delete_task,
        maintenance::list_records,
        maintenance::create_record,
        maintenance::get_schedule,
        maintenance::schedule_options,
        maintenance::export_schedule,
        // Advisory
        advisory::eol_forecast,
        advisory::equipment_eol_forecast,
        advisory::compliance_suggestions,
        // Settings
        settings::get_company,
        settings::update_company,
        settings::get_profile,
        settings::update_profile,
        settings::list_standards,
        // Documents
        documents::list_categories,
        documents::add_file,
        documents::rename_file,
        documents::delete_file,
    ),
    components(
        schemas(
            // Equipment
            crate::models::Equipment,
            crate::models::EquipmentData,
            crate::models::EquipmentDocument,
            crate::models::equipment::TechnicalParameters,
            crate::models::equipment::Supply,
            crate::models::equipment::Accessory,
            crate::models::equipment::Price,
            crate::models::equipment::RequiredDocumentation,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::AttachDocument,
            crate::models::RiskClass,
            crate::models::EquipmentStatus,
            crate::models::Period,
            crate::models::Currency,
            crate::models::DocumentType,
            crate::api::EquipmentPage,
            crate::api::ExportFormat,
            crate::query::Direction,
            crate::services::compliance::DashboardStats,
            crate::services::compliance::DocumentationStatus,
            crate::services::compliance::EquipmentSummary,
            crate::services::export::Sheet,
            crate::services::export::Column,
            // Maintenance
            crate::models::MaintenanceTask,
            crate::models::MaintenanceRecord,
            crate::models::ScheduleRow,
            crate::models::TaskType,
            crate::models::MaintenanceKind,
            crate::models::ScheduleStatus,
            crate::models::maintenance::CreateMaintenanceTask,
            crate::models::maintenance::CreateMaintenanceRecord,
            crate::models::maintenance::ScheduledTask,
            crate::models::maintenance::CellState,
            crate::api::SchedulePage,
            // Advisory
            crate::models::advisory::EolForecastInput,
            crate::models::advisory::EquipmentEolRequest,
            crate::models::advisory::EolForecast,
            crate::models::advisory::ComplianceAction,
            crate::models::advisory::ComplianceReport,
            crate::models::Priority,
            // Settings
            crate::models::CompanyProfile,
            crate::models::UserProfile,
            crate::models::Standard,
            crate::models::Organization,
            crate::models::User,
            crate::models::Role,
            crate::models::user::Customization,
            crate::models::user::StandardStatus,
            // Documents
            crate::models::DocumentCategory,
            crate::models::DocumentFile,
            crate::models::library::AddDocumentFile,
            crate::models::library::RenameDocumentFile,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Headline compliance figures"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "maintenance", description = "Maintenance tasks, log and schedule"),
        (name = "advisory", description = "AI end-of-life and compliance advisors"),
        (name = "settings", description = "Company and user profile"),
        (name = "documents", description = "Organization document library")
    )
)]
pub struct ApiDoc;

pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
