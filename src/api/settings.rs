//! Company profile, user profile and standards endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{user::StandardStatus, CompanyProfile, UserProfile},
    AppState,
};

use super::AuthenticatedUser;

/// Get company profile
#[utoipa::path(
    get,
    path = "/company",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Company profile", body = CompanyProfile)
    )
)]
pub async fn get_company(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<CompanyProfile>> {
    Ok(Json(state.services.settings.company().await))
}

/// Replace company profile
#[utoipa::path(
    put,
    path = "/company",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = CompanyProfile,
    responses(
        (status = 200, description = "Company profile updated", body = CompanyProfile),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Insufficient rights")
    )
)]
pub async fn update_company(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(company): Json<CompanyProfile>,
) -> AppResult<Json<CompanyProfile>> {
    claims.require_write_settings()?;
    Ok(Json(state.services.settings.update_company(company).await?))
}

/// Get the header user profile
#[utoipa::path(
    get,
    path = "/profile",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User profile", body = UserProfile)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.services.settings.profile().await))
}

/// Replace the header user profile
#[utoipa::path(
    put,
    path = "/profile",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UserProfile,
    responses(
        (status = 200, description = "User profile updated", body = UserProfile),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(profile): Json<UserProfile>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.services.settings.update_profile(profile).await?))
}

/// Resolution 3100 standards, with enablement for the caller
#[utoipa::path(
    get,
    path = "/standards",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Standards", body = Vec<StandardStatus>)
    )
)]
pub async fn list_standards(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Json<Vec<StandardStatus>> {
    Json(state.services.settings.standards_for(&claims))
}
