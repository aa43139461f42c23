//! Business logic services

pub mod advisory;
pub mod compliance;
pub mod documents;
pub mod equipment;
pub mod export;
pub mod maintenance;
pub mod schedule;
pub mod settings;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub equipment: equipment::EquipmentService,
    pub maintenance: maintenance::MaintenanceService,
    pub settings: settings::SettingsService,
    pub documents: documents::DocumentsService,
    pub advisory: advisory::AdvisoryService,
}

impl Services {
    /// Hydrate every store from the repository (seeding what is missing)
    pub async fn new(repository: Repository, advisory_model: Arc<dyn advisory::AdvisoryModel>) -> Self {
        let equipment = equipment::EquipmentService::load(repository.clone()).await;
        let maintenance = maintenance::MaintenanceService::load(repository.clone(), equipment.clone()).await;

        Self {
            equipment,
            maintenance,
            settings: settings::SettingsService::load(repository.clone()).await,
            documents: documents::DocumentsService::load(repository.clone()).await,
            advisory: advisory::AdvisoryService::new(advisory_model),
            repository,
        }
    }
}
