//! Company profile and organization-wide document library

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Company letterhead data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CompanyProfile {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub name: String,
    pub logo: Option<String>,
    pub icon: Option<String>,
    pub address: String,
    /// Tax id
    pub nit: String,
    pub phone: String,
    pub city: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Novamed".to_string(),
            logo: Some("/logo-novamed-white.png".to_string()),
            icon: Some("/icon-novamed-white.png".to_string()),
            address: "Calle 123 # 45-67".to_string(),
            nit: "900.123.456-7".to_string(),
            phone: "300 123 4567".to_string(),
            city: "Bogotá, D.C.".to_string(),
        }
    }
}

/// A category of organization documents (plans, protocols, contracts…)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<DocumentFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentFile {
    pub id: String,
    pub name: String,
    /// Human readable size, e.g. "2.5 MB"
    pub size: String,
    /// Human readable upload date, e.g. "Subido el 15 de enero de 2024"
    pub date: String,
}

/// Add file request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddDocumentFile {
    #[validate(length(min = 1, message = "File name is required"))]
    pub name: String,
    /// Upload date (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
    /// Size in bytes
    pub size_bytes: Option<u64>,
}

/// Rename file request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenameDocumentFile {
    #[validate(length(min = 1, message = "File name is required"))]
    pub name: String,
}
