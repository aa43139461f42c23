//! Equipment record store
//!
//! The collection lives in memory and is written back as one snapshot after
//! every mutation.

use std::sync::Arc;

use indexmap::IndexMap;
use snowflaked::sync::Generator;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, EquipmentData},
        enums::DocumentType,
        Equipment, EquipmentDocument, EquipmentStatus,
    },
    query::{FilterSet, ListView, Page, Queryable},
    repository::{keys, Repository},
    seed,
};

static GENERATOR: Generator = Generator::new(0);

/// Fields offered as list filters, in selector order
pub const FILTER_FIELDS: [&str; 6] = ["manufacturer", "model", "risk", "status", "sede", "location"];

impl Queryable for Equipment {}

/// Filter set with the inventory dependencies (model by manufacturer,
/// location by sede)
pub fn inventory_filters() -> FilterSet {
    FilterSet::new()
        .with_dependency("manufacturer", "model")
        .with_dependency("sede", "location")
}

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    equipment: Arc<RwLock<Vec<Equipment>>>,
}

impl EquipmentService {
    /// Hydrate from the `equipment-list` snapshot, falling back to seed data
    pub async fn load(repository: Repository) -> Self {
        let snapshot = repository.load::<Vec<Equipment>>(keys::EQUIPMENT).await;
        let (mut equipment, mut seeded) = snapshot.or_seed(keys::EQUIPMENT, seed::equipment);
        if equipment.is_empty() {
            tracing::info!("Persisted equipment list is empty, using seed data");
            equipment = seed::equipment();
            seeded = true;
        }
        if seeded {
            repository.persist(keys::EQUIPMENT, &equipment).await;
        }
        tracing::info!(count = equipment.len(), "Equipment collection loaded");

        Self {
            repository,
            equipment: Arc::new(RwLock::new(equipment)),
        }
    }

    /// Snapshot of the whole collection
    pub async fn all(&self) -> Vec<Equipment> {
        self.equipment.read().await.clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Equipment> {
        self.equipment.read().await.iter().find(|e| e.id == id).cloned()
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Equipment> {
        self.find_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Current page of the list view
    pub async fn list(&self, view: &ListView) -> Page<Equipment> {
        let list = self.equipment.read().await;
        view.paginate(list.as_slice())
    }

    /// Search/filter/sort result without pagination (exports)
    pub async fn select(&self, view: &ListView) -> Vec<Equipment> {
        let list = self.equipment.read().await;
        view.select(list.as_slice())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Distinct filter values; `model` narrowed by manufacturer and
    /// `location` by sede
    pub async fn options(&self, manufacturer: Option<&str>, sede: Option<&str>) -> IndexMap<String, Vec<String>> {
        let mut filters = inventory_filters();
        filters.set("manufacturer", manufacturer.unwrap_or_default());
        filters.set("sede", sede.unwrap_or_default());

        let list = self.equipment.read().await;
        filters.options(list.as_slice(), &FILTER_FIELDS)
    }

    /// Assign a fresh id, append and persist
    pub async fn add(&self, data: CreateEquipment) -> Equipment {
        let mut list = self.equipment.write().await;
        let id = loop {
            let candidate = format!("EQP-{}", GENERATOR.generate::<u64>());
            if !list.iter().any(|e| e.id == candidate) {
                break candidate;
            }
        };

        let created = Equipment {
            id,
            data: data.data,
            documents: dedup_documents(data.documents),
        };
        list.push(created.clone());
        self.repository.persist(keys::EQUIPMENT, &*list).await;

        tracing::info!(id = %created.id, name = %created.data.name, "Equipment created");
        created
    }

    /// Replace every field of `id`. Attachments are kept when `documents`
    /// is `None`. Returns `None` (and changes nothing) for an unknown id.
    pub async fn update(
        &self,
        id: &str,
        data: EquipmentData,
        documents: Option<Vec<EquipmentDocument>>,
    ) -> Option<Equipment> {
        let mut list = self.equipment.write().await;
        let record = list.iter_mut().find(|e| e.id == id)?;
        record.data = data;
        if let Some(documents) = documents {
            record.documents = dedup_documents(documents);
        }
        let updated = record.clone();
        self.repository.persist(keys::EQUIPMENT, &*list).await;

        tracing::info!(id, "Equipment updated");
        Some(updated)
    }

    /// Logical retirement (status `Dado de Baja`)
    pub async fn retire(&self, id: &str) -> Option<Equipment> {
        self.mutate(id, |record| {
            record.data.status = EquipmentStatus::DadoDeBaja;
        })
        .await
    }

    /// Attach `document`, replacing any document of the same type
    pub async fn add_document(&self, id: &str, document: EquipmentDocument) -> Option<Equipment> {
        self.mutate(id, |record| record.upsert_document(document)).await
    }

    /// Remove the document of `doc_type`, if any
    pub async fn delete_document(&self, id: &str, doc_type: DocumentType) -> Option<Equipment> {
        self.mutate(id, |record| {
            record.remove_document(doc_type);
        })
        .await
    }

    async fn mutate<F>(&self, id: &str, change: F) -> Option<Equipment>
    where
        F: FnOnce(&mut Equipment),
    {
        let mut list = self.equipment.write().await;
        let record = list.iter_mut().find(|e| e.id == id)?;
        change(record);
        let updated = record.clone();
        self.repository.persist(keys::EQUIPMENT, &*list).await;
        Some(updated)
    }
}

/// Keep the last document of each type
fn dedup_documents(documents: Vec<EquipmentDocument>) -> Vec<EquipmentDocument> {
    let mut holder = Equipment {
        id: String::new(),
        data: EquipmentData::default(),
        documents: Vec::new(),
    };
    for document in documents {
        holder.upsert_document(document);
    }
    holder.documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{Direction, SortSpec},
        repository::Snapshot,
    };

    fn create(name: &str) -> CreateEquipment {
        CreateEquipment {
            data: EquipmentData {
                name: name.to_string(),
                manufacturer: "Philips".to_string(),
                ..EquipmentData::default()
            },
            documents: Vec::new(),
        }
    }

    fn invima(name: &str) -> EquipmentDocument {
        EquipmentDocument {
            doc_type: DocumentType::Invima,
            name: name.to_string(),
            date: "2024-03-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_absent_snapshot_seeds_and_persists() {
        let repository = Repository::in_memory();
        let service = EquipmentService::load(repository.clone()).await;

        assert_eq!(service.all().await.len(), seed::equipment().len());
        match repository.load::<Vec<Equipment>>(keys::EQUIPMENT).await {
            Snapshot::Loaded(stored) => assert_eq!(stored.len(), seed::equipment().len()),
            other => panic!("seed was not persisted: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_snapshot_uses_seed() {
        let repository = Repository::in_memory();
        repository.save(keys::EQUIPMENT, &Vec::<Equipment>::new()).await.unwrap();
        let service = EquipmentService::load(repository).await;
        assert!(!service.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_assigns_unique_ids_and_persists() {
        let repository = Repository::in_memory();
        let service = EquipmentService::load(repository.clone()).await;

        let a = service.add(create("Monitor")).await;
        let b = service.add(create("Monitor")).await;
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("EQP-"));

        let reloaded = EquipmentService::load(repository).await;
        assert_eq!(reloaded.get_by_id(&b.id).await.unwrap().data.name, "Monitor");
    }

    #[tokio::test]
    async fn test_update_preserves_documents_when_absent() {
        let service = EquipmentService::load(Repository::in_memory()).await;
        let created = service.add(create("Monitor")).await;
        service.add_document(&created.id, invima("registro.pdf")).await.unwrap();

        let mut data = created.data.clone();
        data.location = "UCI".to_string();
        let updated = service.update(&created.id, data, None).await.unwrap();
        assert_eq!(updated.data.location, "UCI");
        assert_eq!(updated.documents.len(), 1);

        let cleared = service
            .update(&created.id, updated.data.clone(), Some(Vec::new()))
            .await
            .unwrap();
        assert!(cleared.documents.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let service = EquipmentService::load(Repository::in_memory()).await;
        let before = service.all().await;
        assert!(service.update("missing", EquipmentData::default(), None).await.is_none());
        assert_eq!(service.all().await, before);
    }

    #[tokio::test]
    async fn test_add_document_twice_keeps_second() {
        let service = EquipmentService::load(Repository::in_memory()).await;
        let created = service.add(create("Monitor")).await;
        service.add_document(&created.id, invima("v1.pdf")).await.unwrap();
        let updated = service.add_document(&created.id, invima("v2.pdf")).await.unwrap();

        let invimas: Vec<_> = updated
            .documents
            .iter()
            .filter(|d| d.doc_type == DocumentType::Invima)
            .collect();
        assert_eq!(invimas.len(), 1);
        assert_eq!(invimas[0].name, "v2.pdf");

        let removed = service.delete_document(&created.id, DocumentType::Invima).await.unwrap();
        assert!(removed.documents.is_empty());
        // Removing again is a no-op
        assert!(service.delete_document(&created.id, DocumentType::Invima).await.is_some());
    }

    #[tokio::test]
    async fn test_retire() {
        let service = EquipmentService::load(Repository::in_memory()).await;
        let retired = service.retire("eq_001").await.unwrap();
        assert!(retired.data.status.is_retired());
        assert!(service.retire("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let service = EquipmentService::load(Repository::in_memory()).await;
        let mut view = ListView::new(inventory_filters());
        view.set_filter("manufacturer", "Philips");
        view.set_sort(SortSpec::new("name", Direction::Descending));

        let page = service.list(&view).await;
        let names: Vec<_> = page.items.iter().map(|e| e.data.name.as_str()).collect();
        assert_eq!(names, vec!["Electrocardiógrafo Portátil", "Desfibrilador"]);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_options_narrowed_by_governing_field() {
        let service = EquipmentService::load(Repository::in_memory()).await;
        let all = service.options(None, None).await;
        assert_eq!(all.keys().collect::<Vec<_>>(), FILTER_FIELDS.iter().collect::<Vec<_>>());

        let philips = service.options(Some("Philips"), None).await;
        assert_eq!(philips["model"], vec!["HeartStart XL+", "PageWriter TC20"]);
        assert!(philips["model"].len() < all["model"].len());
    }
}
