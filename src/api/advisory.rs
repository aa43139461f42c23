//! AI advisory endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::advisory::{ComplianceReport, EolForecast, EolForecastInput, EquipmentEolRequest},
    AppState,
};

use super::AuthenticatedUser;

/// Forecast end of life from raw equipment data
#[utoipa::path(
    post,
    path = "/advisory/eol-forecast",
    tag = "advisory",
    security(("bearer_auth" = [])),
    request_body = EolForecastInput,
    responses(
        (status = 200, description = "End-of-life forecast", body = EolForecast),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Advisor unavailable or returned an invalid answer")
    )
)]
pub async fn eol_forecast(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(input): Json<EolForecastInput>,
) -> AppResult<Json<EolForecast>> {
    claims.require_equipment_module()?;
    Ok(Json(state.services.advisory.forecast_eol(input).await?))
}

/// Forecast end of life of a stored equipment record
#[utoipa::path(
    post,
    path = "/equipment/{id}/eol-forecast",
    tag = "advisory",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = EquipmentEolRequest,
    responses(
        (status = 200, description = "End-of-life forecast", body = EolForecast),
        (status = 404, description = "Equipment not found"),
        (status = 502, description = "Advisor unavailable or returned an invalid answer")
    )
)]
pub async fn equipment_eol_forecast(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<EquipmentEolRequest>,
) -> AppResult<Json<EolForecast>> {
    claims.require_equipment_module()?;

    let equipment = state.services.equipment.get_by_id(&id).await?;
    let forecast = state
        .services
        .advisory
        .forecast_equipment_eol(&equipment, request)
        .await?;
    Ok(Json(forecast))
}

/// Suggest corrective actions for Resolution 3100 compliance over the
/// whole collection and maintenance log
#[utoipa::path(
    post,
    path = "/advisory/compliance",
    tag = "advisory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Compliance assessment", body = ComplianceReport),
        (status = 502, description = "Advisor unavailable or returned an invalid answer")
    )
)]
pub async fn compliance_suggestions(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ComplianceReport>> {
    claims.require_equipment_module()?;

    let equipment = state.services.equipment.all().await;
    let records = state.services.maintenance.records(None).await;
    let report = state
        .services
        .advisory
        .suggest_compliance_actions(&equipment, &records)
        .await?;
    Ok(Json(report))
}
