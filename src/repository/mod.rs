//! Repository layer: keyed JSON snapshots
//!
//! Every collection is stored as one JSON document under a fixed key and is
//! rewritten in full on each change (last write wins).

pub mod file;
pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};

pub use self::{file::FileSnapshotStore, memory::MemorySnapshotStore, redis::RedisSnapshotStore};

/// Fixed snapshot keys
pub mod keys {
    pub const EQUIPMENT: &str = "equipment-list";
    pub const COMPANY_PROFILE: &str = "company-profile";
    pub const USER_PROFILE: &str = "user-profile";
    pub const DOCUMENT_CATEGORIES: &str = "document-categories";
    pub const MAINTENANCE_TASKS: &str = "maintenance-tasks";
    pub const MAINTENANCE_RECORDS: &str = "maintenance-records";
}

/// Raw key/value backend for snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Stored body for `key`, `None` when nothing was ever saved
    async fn load(&self, key: &str) -> AppResult<Option<String>>;

    /// Replace the body stored under `key`
    async fn save(&self, key: &str, body: &str) -> AppResult<()>;

    /// Short backend name for logs and readiness checks
    fn backend_name(&self) -> &'static str;
}

/// Outcome of reading a typed snapshot
#[derive(Debug)]
pub enum Snapshot<T> {
    Loaded(T),
    Absent,
    /// Present but unreadable (backend failure or malformed JSON)
    Corrupt(String),
}

impl<T> Snapshot<T> {
    /// Loaded value, or the seed when absent/corrupt. The flag tells whether
    /// the seed was used.
    pub fn or_seed(self, key: &str, seed: impl FnOnce() -> T) -> (T, bool) {
        match self {
            Snapshot::Loaded(value) => (value, false),
            Snapshot::Absent => {
                tracing::info!(key, "No persisted snapshot, using seed data");
                (seed(), true)
            }
            Snapshot::Corrupt(reason) => {
                tracing::warn!(key, %reason, "Discarding unreadable snapshot, using seed data");
                (seed(), true)
            }
        }
    }
}

/// Typed access to the snapshot store
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn SnapshotStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// In-memory repository (tests and ephemeral runs)
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySnapshotStore::new()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Read and decode the snapshot under `key`
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Snapshot<T> {
        match self.store.load(key).await {
            Ok(None) => Snapshot::Absent,
            Ok(Some(body)) => match serde_json::from_str(&body) {
                Ok(value) => Snapshot::Loaded(value),
                Err(e) => Snapshot::Corrupt(format!("invalid JSON: {}", e)),
            },
            Err(e) => Snapshot::Corrupt(e.to_string()),
        }
    }

    /// Encode and write `value` under `key`
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let body = serde_json::to_string(value)
            .map_err(|e| AppError::Storage(format!("Failed to encode snapshot '{}': {}", key, e)))?;
        self.store.save(key, &body).await
    }

    /// Write `value`, logging instead of failing. The in-memory state stays
    /// authoritative when the write is lost.
    pub async fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.save(key, value).await {
            tracing::error!(key, error = %e, "Failed to persist snapshot");
        }
    }

    /// Round-trip a probe through the backend
    pub async fn ping(&self) -> AppResult<()> {
        self.store.load(keys::EQUIPMENT).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
    }

    #[tokio::test]
    async fn test_absent_snapshot() {
        let repository = Repository::in_memory();
        let snapshot: Snapshot<Profile> = repository.load("profile").await;
        assert!(matches!(snapshot, Snapshot::Absent));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let repository = Repository::in_memory();
        let profile = Profile { name: "Novamed".to_string() };
        repository.save("profile", &profile).await.unwrap();

        match repository.load::<Profile>("profile").await {
            Snapshot::Loaded(loaded) => assert_eq!(loaded, profile),
            other => panic!("unexpected snapshot: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_corrupt() {
        let store = Arc::new(MemorySnapshotStore::new());
        store.save("profile", "{not json").await.unwrap();
        let repository = Repository::new(store);

        let snapshot: Snapshot<Profile> = repository.load("profile").await;
        assert!(matches!(snapshot, Snapshot::Corrupt(_)));

        let (profile, seeded) = snapshot.or_seed("profile", || Profile { name: "seed".to_string() });
        assert!(seeded);
        assert_eq!(profile.name, "seed");
    }
}
