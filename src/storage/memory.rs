use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::{KeyValueStore, StorageError};

/// Process-local store used when no Redis is configured, and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.get(key).map(|value| value.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key);
        Ok(())
    }
}
