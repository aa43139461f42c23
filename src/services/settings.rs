//! Settings service: company letterhead, the header user profile and the
//! organization directory

use std::sync::Arc;

use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{user::StandardStatus, CompanyProfile, Organization, Standard, UserClaims, UserProfile},
    repository::{keys, Repository},
    seed,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    company: Arc<RwLock<CompanyProfile>>,
    profile: Arc<RwLock<UserProfile>>,
    organizations: Arc<Vec<Organization>>,
}

impl SettingsService {
    pub async fn load(repository: Repository) -> Self {
        let (company, seeded) = repository
            .load::<CompanyProfile>(keys::COMPANY_PROFILE)
            .await
            .or_seed(keys::COMPANY_PROFILE, seed::company_profile);
        if seeded {
            repository.persist(keys::COMPANY_PROFILE, &company).await;
        }

        let (profile, seeded) = repository
            .load::<UserProfile>(keys::USER_PROFILE)
            .await
            .or_seed(keys::USER_PROFILE, seed::user_profile);
        if seeded {
            repository.persist(keys::USER_PROFILE, &profile).await;
        }

        Self {
            repository,
            company: Arc::new(RwLock::new(company)),
            profile: Arc::new(RwLock::new(profile)),
            organizations: Arc::new(seed::organizations()),
        }
    }

    /// Get company profile
    pub async fn company(&self) -> CompanyProfile {
        self.company.read().await.clone()
    }

    /// Replace company profile
    pub async fn update_company(&self, company: CompanyProfile) -> AppResult<CompanyProfile> {
        company.validate()?;

        let mut current = self.company.write().await;
        *current = company;
        self.repository.persist(keys::COMPANY_PROFILE, &*current).await;

        tracing::info!(name = %current.name, "Company profile updated");
        Ok(current.clone())
    }

    pub async fn profile(&self) -> UserProfile {
        self.profile.read().await.clone()
    }

    pub async fn update_profile(&self, profile: UserProfile) -> AppResult<UserProfile> {
        profile.validate()?;

        let mut current = self.profile.write().await;
        *current = profile;
        self.repository.persist(keys::USER_PROFILE, &*current).await;
        Ok(current.clone())
    }

    pub fn organization(&self, id: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == id)
    }

    /// The seven standards with their enablement for the caller. A standard is
    /// enabled when the token grants it and the caller's organization, if known,
    /// has not switched it off.
    pub fn standards_for(&self, claims: &UserClaims) -> Vec<StandardStatus> {
        let organization = self.organization(&claims.organization_id);
        Standard::ALL
            .iter()
            .map(|standard| {
                let enabled = claims.is_admin()
                    || (claims.has_standard(*standard)
                        && organization.map_or(true, |org| org.enabled_standards.contains(standard)));
                StandardStatus {
                    id: *standard,
                    name: standard.name().to_string(),
                    enabled,
                }
            })
            .collect()
    }
}
