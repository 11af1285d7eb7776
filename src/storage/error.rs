use redis::RedisError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(String),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<RedisError> for StorageError {
    fn from(error: RedisError) -> Self {
        StorageError::Redis(error.to_string())
    }
}
