mod error;
mod memory;
mod upstash;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use upstash::RedisClient;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::config::StorageConfig;

/// Flat string key-value store. No transactions, no TTLs: the last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn put(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed JSON access on top of a [`KeyValueStore`], with `prefix:id` key building.
#[derive(Clone)]
pub struct StorageManager {
    store: Arc<dyn KeyValueStore>,
}

impl StorageManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn init(config: &StorageConfig) -> Result<Self, StorageError> {
        match &config.redis_url {
            Some(url) => {
                let redis = RedisClient::new(url).await?;
                Ok(Self::new(Arc::new(redis)))
            }
            None => {
                warn!("No Redis configured, falling back to in-memory storage");
                Ok(Self::new(Arc::new(MemoryStore::new())))
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, prefix: &str, id: &str) -> Result<Option<T>, StorageError> {
        let key = build_key(prefix, id);

        match self.store.get(&key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Like [`get`](Self::get), but a value that no longer deserializes is
    /// logged and treated as absent.
    pub async fn get_or_discard<T: DeserializeOwned>(&self, prefix: &str, id: &str) -> Result<Option<T>, StorageError> {
        match self.get(prefix, id).await {
            Err(StorageError::Serde(e)) => {
                warn!("Discarding unreadable value at {}: {}", build_key(prefix, id), e);
                Ok(None)
            }
            other => other,
        }
    }

    pub async fn set<T: Serialize + Sync>(&self, prefix: &str, id: &str, value: &T) -> Result<(), StorageError> {
        let key = build_key(prefix, id);
        let json = serde_json::to_string(value)?;
        self.store.put(&key, json).await
    }

    pub async fn del(&self, prefix: &str, id: &str) -> Result<(), StorageError> {
        let key = build_key(prefix, id);
        self.store.delete(&key).await
    }
}

fn build_key(prefix: &str, id: &str) -> String {
    if id.is_empty() {
        prefix.to_string()
    } else {
        format!("{}:{}", prefix, id)
    }
}
