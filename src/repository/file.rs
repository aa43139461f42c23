//! File-system snapshot store: one `<key>.json` file per key

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::SnapshotStore;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct FileSnapshotStore {
    directory: PathBuf,
}

impl FileSnapshotStore {
    /// Create the store, creating `directory` if needed
    pub async fn new(directory: impl AsRef<Path>) -> AppResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&directory).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create snapshot directory {}: {}",
                directory.display(),
                e
            ))
        })?;
        Ok(Self { directory })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!("Failed to read snapshot '{}': {}", key, e))),
        }
    }

    async fn save(&self, key: &str, body: &str) -> AppResult<()> {
        // Write then rename so a crash never leaves a truncated snapshot
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write snapshot '{}': {}", key, e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to replace snapshot '{}': {}", key, e)))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).await.unwrap();
        assert_eq!(store.load("equipment-list").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested")).await.unwrap();
        store.save("company-profile", "{\"name\":\"A\"}").await.unwrap();
        store.save("company-profile", "{\"name\":\"B\"}").await.unwrap();

        let body = store.load("company-profile").await.unwrap();
        assert_eq!(body.as_deref(), Some("{\"name\":\"B\"}"));
        assert!(dir.path().join("nested/company-profile.json").exists());
    }
}
