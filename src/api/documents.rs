//! Organization document library endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        library::{AddDocumentFile, RenameDocumentFile},
        DocumentCategory, DocumentFile,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List document categories with their files
#[utoipa::path(
    get,
    path = "/documents",
    tag = "documents",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Document categories", body = Vec<DocumentCategory>)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<DocumentCategory>>> {
    Ok(Json(state.services.documents.categories().await))
}

/// Add a file to a category
#[utoipa::path(
    post,
    path = "/documents/{category}/files",
    tag = "documents",
    security(("bearer_auth" = [])),
    params(("category" = String, Path, description = "Category ID")),
    request_body = AddDocumentFile,
    responses(
        (status = 201, description = "File added", body = DocumentFile),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn add_file(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(category): Path<String>,
    Json(request): Json<AddDocumentFile>,
) -> AppResult<(StatusCode, Json<DocumentFile>)> {
    claims.require_write_documents()?;

    let file = state.services.documents.add_file(&category, request).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

/// Rename a file
#[utoipa::path(
    put,
    path = "/documents/{category}/files/{file}",
    tag = "documents",
    security(("bearer_auth" = [])),
    params(
        ("category" = String, Path, description = "Category ID"),
        ("file" = String, Path, description = "File ID")
    ),
    request_body = RenameDocumentFile,
    responses(
        (status = 200, description = "File renamed", body = DocumentFile),
        (status = 404, description = "Category or file not found")
    )
)]
pub async fn rename_file(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((category, file)): Path<(String, String)>,
    Json(request): Json<RenameDocumentFile>,
) -> AppResult<Json<DocumentFile>> {
    claims.require_write_documents()?;
    Ok(Json(state.services.documents.rename_file(&category, &file, request).await?))
}

/// Delete a file
#[utoipa::path(
    delete,
    path = "/documents/{category}/files/{file}",
    tag = "documents",
    security(("bearer_auth" = [])),
    params(
        ("category" = String, Path, description = "Category ID"),
        ("file" = String, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, description = "Category or file not found")
    )
)]
pub async fn delete_file(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((category, file)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    claims.require_write_documents()?;

    state.services.documents.delete_file(&category, &file).await?;
    Ok(StatusCode::NO_CONTENT)
}
