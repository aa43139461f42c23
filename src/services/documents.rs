//! Organization document library
//!
//! Categories are fixed; only their file lists change. A persisted snapshot
//! whose category ids no longer match the seeded set is replaced by the seed.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        dates::{format_long_date, parse_date},
        library::{AddDocumentFile, RenameDocumentFile},
        DocumentCategory, DocumentFile,
    },
    repository::{keys, Repository},
    seed,
};

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// "1.5 MB" style size, base 1024, at most two decimals
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < SIZE_UNITS.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[exponent])
}

pub fn upload_label(date: NaiveDate) -> String {
    format!("Subido el {}", format_long_date(date))
}

fn same_categories(stored: &[DocumentCategory], seeded: &[DocumentCategory]) -> bool {
    stored.len() == seeded.len() && stored.iter().zip(seeded).all(|(a, b)| a.id == b.id)
}

#[derive(Clone)]
pub struct DocumentsService {
    repository: Repository,
    categories: Arc<RwLock<Vec<DocumentCategory>>>,
}

impl DocumentsService {
    pub async fn load(repository: Repository) -> Self {
        let (mut categories, mut seeded) = repository
            .load::<Vec<DocumentCategory>>(keys::DOCUMENT_CATEGORIES)
            .await
            .or_seed(keys::DOCUMENT_CATEGORIES, seed::document_categories);

        let expected = seed::document_categories();
        if !same_categories(&categories, &expected) {
            tracing::warn!("Stored document categories are out of date, resetting to seed data");
            categories = expected;
            seeded = true;
        }
        if seeded {
            repository.persist(keys::DOCUMENT_CATEGORIES, &categories).await;
        }

        Self {
            repository,
            categories: Arc::new(RwLock::new(categories)),
        }
    }

    pub async fn categories(&self) -> Vec<DocumentCategory> {
        self.categories.read().await.clone()
    }

    pub async fn add_file(&self, category_id: &str, request: AddDocumentFile) -> AppResult<DocumentFile> {
        request.validate()?;

        let uploaded = match request.date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(date) => parse_date(date)
                .ok_or_else(|| AppError::Validation(format!("Invalid upload date: {}", date)))?,
            None => Utc::now().date_naive(),
        };

        let file = DocumentFile {
            id: format!("file-{}", Uuid::new_v4()),
            name: request.name,
            size: format_bytes(request.size_bytes.unwrap_or(0)),
            date: upload_label(uploaded),
        };

        let mut categories = self.categories.write().await;
        let category = find_category(&mut categories, category_id)?;
        category.files.push(file.clone());
        self.repository.persist(keys::DOCUMENT_CATEGORIES, &*categories).await;

        tracing::info!(category = category_id, file = %file.name, "Document uploaded");
        Ok(file)
    }

    pub async fn rename_file(
        &self,
        category_id: &str,
        file_id: &str,
        request: RenameDocumentFile,
    ) -> AppResult<DocumentFile> {
        request.validate()?;

        let mut categories = self.categories.write().await;
        let category = find_category(&mut categories, category_id)?;
        let file = category
            .files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", file_id)))?;
        file.name = request.name;
        let renamed = file.clone();

        self.repository.persist(keys::DOCUMENT_CATEGORIES, &*categories).await;
        Ok(renamed)
    }

    pub async fn delete_file(&self, category_id: &str, file_id: &str) -> AppResult<()> {
        let mut categories = self.categories.write().await;
        let category = find_category(&mut categories, category_id)?;
        let before = category.files.len();
        category.files.retain(|f| f.id != file_id);
        if category.files.len() == before {
            return Err(AppError::NotFound(format!("Document {} not found", file_id)));
        }

        self.repository.persist(keys::DOCUMENT_CATEGORIES, &*categories).await;
        tracing::info!(category = category_id, file = file_id, "Document deleted");
        Ok(())
    }
}

fn find_category<'a>(categories: &'a mut [DocumentCategory], id: &str) -> AppResult<&'a mut DocumentCategory> {
    categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Document category {} not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(500), "500 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(2_621_440), "2.5 MB");
        assert_eq!(format_bytes(1_288_490_189), "1.2 GB");
    }

    #[test]
    fn test_upload_label() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(upload_label(date), "Subido el 15 de enero de 2024");
    }

    #[tokio::test]
    async fn test_stale_categories_reset() {
        let repository = Repository::in_memory();
        let stale = vec![DocumentCategory {
            id: "legacy".to_string(),
            title: "Legacy".to_string(),
            description: String::new(),
            files: Vec::new(),
        }];
        repository.save(keys::DOCUMENT_CATEGORIES, &stale).await.unwrap();

        let service = DocumentsService::load(repository).await;
        let ids: Vec<_> = service.categories().await.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["informes", "plan", "protocolos", "tecnovigilancia", "contratos", "otros"]);
    }

    #[tokio::test]
    async fn test_file_lifecycle() {
        let service = DocumentsService::load(Repository::in_memory()).await;
        let file = service
            .add_file(
                "contratos",
                AddDocumentFile {
                    name: "Contrato-Mantenimiento.pdf".to_string(),
                    date: Some("2024-03-01".to_string()),
                    size_bytes: Some(1_572_864),
                },
            )
            .await
            .unwrap();
        assert!(file.id.starts_with("file-"));
        assert_eq!(file.size, "1.5 MB");
        assert_eq!(file.date, "Subido el 1 de marzo de 2024");

        let renamed = service
            .rename_file("contratos", &file.id, RenameDocumentFile { name: "Contrato-2024.pdf".to_string() })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Contrato-2024.pdf");

        service.delete_file("contratos", &file.id).await.unwrap();
        assert!(matches!(
            service.delete_file("contratos", &file.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let service = DocumentsService::load(Repository::in_memory()).await;
        let result = service
            .add_file(
                "missing",
                AddDocumentFile {
                    name: "x.pdf".to_string(),
                    date: None,
                    size_bytes: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
