// In-memory key-value storage with an optional byte quota
use crate::application::key_value_storage::{KeyValueStorage, StorageError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    quota: Mutex<Option<usize>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest single payload accepted by `write`; `None` lifts the limit.
    pub fn set_quota(&self, quota: Option<usize>) {
        *self.quota.lock().unwrap_or_else(PoisonError::into_inner) = quota;
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let quota = *self.quota.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(quota) = quota {
            if bytes.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size: bytes.len(),
                    quota,
                });
            }
        }

        self.entries().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}
