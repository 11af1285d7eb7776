use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use std::sync::Arc;

use super::{KeyValueStore, StorageError};

#[derive(Clone)]
pub struct RedisClient {
    inner: Arc<redis::Client>,
}

impl RedisClient {
    pub async fn new(url: &str) -> Result<Self, StorageError> {
        info!("Initializing RedisClient...");
        let redis = Arc::new(Client::open(url)?);

        let mut conn = redis.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong != "PONG" {
            return Err(StorageError::Redis("Redis connection test failed".to_string()));
        }
        info!("Redis connection test successful");
        info!("RedisClient initialized");
        Ok(Self { inner: redis })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, StorageError> {
        let conn = self.inner.get_multiplexed_async_connection().await?;
        Ok(conn)
    }
}

#[async_trait]
impl KeyValueStore for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut conn = self.get_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.get_connection().await?;
        conn.del::<_, i32>(key).await?;
        Ok(())
    }
}
