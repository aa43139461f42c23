//! Redis snapshot store: one string value per key under a namespace prefix

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use super::SnapshotStore;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisSnapshotStore {
    client: Client,
    prefix: String,
}

impl RedisSnapshotStore {
    /// Create a new Redis store and check the connection
    pub async fn new(url: &str, prefix: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Storage(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Storage(format!("Redis connection test failed: {}", e)))?;

        Ok(Self {
            client,
            prefix: prefix.to_string(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection().await?;
        conn.get(self.namespaced(key))
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read '{}' from Redis: {}", key, e)))
    }

    async fn save(&self, key: &str, body: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(self.namespaced(key), body)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write '{}' to Redis: {}", key, e)))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
