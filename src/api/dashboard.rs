//! Dashboard endpoint

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    error::AppResult,
    services::compliance::{self, DashboardStats},
    AppState,
};

use super::AuthenticatedUser;

/// Headline figures of the equipment collection
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardStats),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Equipment standard not enabled")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardStats>> {
    claims.require_equipment_module()?;

    let equipment = state.services.equipment.all().await;
    Ok(Json(compliance::dashboard_stats(&equipment, Utc::now().date_naive())))
}
