// Storage trait for durable client-local state
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing {key}: {size} bytes > {quota} bytes")]
    QuotaExceeded { key: String, size: usize, quota: usize },
    #[error("storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Byte-oriented key-value store. Each call is atomic for its key.
pub trait KeyValueStorage: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}
