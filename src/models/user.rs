//! Organizations, users and JWT claims

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{Role, Standard};
use crate::error::AppError;

/// Tenant organization
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub customization: Customization,
    /// Enabled standard ids (`standard_1` … `standard_7`)
    #[serde(default)]
    pub enabled_standards: Vec<Standard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Platform user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub organization_id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Profile shown in the header of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserProfile {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Jane Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            avatar: String::new(),
        }
    }
}

/// Standard with its enablement for the caller's organization
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StandardStatus {
    pub id: Standard,
    pub name: String,
    pub enabled: bool,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: String,
    pub organization_id: String,
    pub role: Role,
    #[serde(default)]
    pub enabled_standards: Vec<Standard>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrador
    }

    pub fn has_standard(&self, standard: Standard) -> bool {
        self.is_admin() || self.enabled_standards.contains(&standard)
    }

    // Authorization checks

    /// Equipment, maintenance and advisory routes live under standard 3
    pub fn require_equipment_module(&self) -> Result<(), AppError> {
        if self.has_standard(Standard::Equipment) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Standard '{}' is not enabled for this organization",
                Standard::Equipment.name()
            )))
        }
    }

    pub fn require_write_equipment(&self) -> Result<(), AppError> {
        self.require_equipment_module()?;
        match self.role {
            Role::Administrador | Role::OrgAdmin | Role::Tech => Ok(()),
            Role::Viewer => Err(AppError::Authorization(
                "Insufficient rights to write equipment".to_string(),
            )),
        }
    }

    pub fn require_write_documents(&self) -> Result<(), AppError> {
        match self.role {
            Role::Administrador | Role::OrgAdmin | Role::Tech => Ok(()),
            Role::Viewer => Err(AppError::Authorization(
                "Insufficient rights to manage documents".to_string(),
            )),
        }
    }

    pub fn require_write_settings(&self) -> Result<(), AppError> {
        match self.role {
            Role::Administrador | Role::OrgAdmin => Ok(()),
            _ => Err(AppError::Authorization(
                "Insufficient rights to write settings".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, standards: Vec<Standard>) -> UserClaims {
        UserClaims {
            sub: "user@example.com".to_string(),
            user_id: "user_1".to_string(),
            organization_id: "org_1".to_string(),
            role,
            enabled_standards: standards,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let original = claims(Role::Tech, vec![Standard::Equipment]);
        let token = original.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, "user_1");
        assert_eq!(parsed.role, Role::Tech);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_viewer_cannot_write() {
        let viewer = claims(Role::Viewer, vec![Standard::Equipment]);
        assert!(viewer.require_equipment_module().is_ok());
        assert!(viewer.require_write_equipment().is_err());
        assert!(viewer.require_write_documents().is_err());
    }

    #[test]
    fn test_standard_gating() {
        let tech = claims(Role::Tech, vec![Standard::HumanTalent]);
        assert!(tech.require_equipment_module().is_err());
        assert!(tech.require_write_equipment().is_err());

        let admin = claims(Role::Administrador, vec![]);
        assert!(admin.require_write_equipment().is_ok());
        assert!(admin.require_write_settings().is_ok());
    }

    #[test]
    fn test_settings_rights() {
        assert!(claims(Role::OrgAdmin, vec![]).require_write_settings().is_ok());
        assert!(claims(Role::Tech, vec![]).require_write_settings().is_err());
    }
}
