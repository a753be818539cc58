// History store - Bounded, durable collection of past analyses
use crate::application::key_value_storage::{KeyValueStorage, StorageError};
use crate::domain::history::{HISTORY_CAPACITY, HistoryItem, prepend_bounded};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_HISTORY_KEY: &str = "pcb_salvage_history";

/// Newest-first history persisted as one JSON array under a single key.
///
/// The in-memory copy is the source of truth once loaded. Storage failures
/// are logged and swallowed: a rejected write leaves the persisted payload
/// stale until the next successful write replaces it wholesale.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    items: Mutex<Vec<HistoryItem>>,
    /// Held across every storage call; taken before `items`.
    writes: Mutex<()>,
}

impl HistoryStore {
    /// Create a store and load whatever is already persisted under `key`.
    pub fn open(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let store = Self {
            storage,
            key: key.into(),
            items: Mutex::new(Vec::new()),
            writes: Mutex::new(()),
        };
        let loaded = store.load();
        tracing::info!("Loaded {} history items from '{}'", loaded.len(), store.key);
        store
    }

    /// Re-read the persisted collection, falling back to empty on any failure.
    pub fn load(&self) -> Vec<HistoryItem> {
        let mut items = self.lock();
        *items = self.read_persisted();
        items.clone()
    }

    pub fn snapshot(&self) -> Vec<HistoryItem> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<HistoryItem> {
        self.lock().iter().find(|item| item.id == id).cloned()
    }

    pub fn add(&self, item: HistoryItem) -> Vec<HistoryItem> {
        let items = self.record(item);
        self.flush();
        items
    }

    /// Prepend `item` in memory only; `flush` makes it durable.
    pub fn record(&self, item: HistoryItem) -> Vec<HistoryItem> {
        let mut items = self.lock();
        let updated = prepend_bounded(&items, item);
        *items = updated;
        items.clone()
    }

    /// Write the current collection to storage.
    ///
    /// The payload is taken under the write lock, so concurrent flushes
    /// always leave the latest collection persisted.
    pub fn flush(&self) {
        let _writes = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        let items = self.snapshot();
        self.persist(&items);
    }

    pub fn remove(&self, id: &str) -> Vec<HistoryItem> {
        let remaining = {
            let mut items = self.lock();
            let before = items.len();
            items.retain(|item| item.id != id);
            if items.len() == before {
                tracing::debug!("History item {} not found, nothing removed", id);
            }
            items.clone()
        };
        self.flush();
        remaining
    }

    pub fn clear(&self) -> Vec<HistoryItem> {
        let _writes = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        self.lock().clear();
        if let Err(e) = self.storage.delete(&self.key) {
            tracing::warn!("Failed to erase persisted history: {}", e);
        }
        Vec::new()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HistoryItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_persisted(&self) -> Vec<HistoryItem> {
        let bytes = match self.storage.read(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read persisted history: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<HistoryItem>>(&bytes) {
            Ok(mut items) => {
                items.truncate(HISTORY_CAPACITY);
                items
            }
            Err(e) => {
                tracing::warn!("Discarding unparseable history payload: {}", e);
                Vec::new()
            }
        }
    }

    fn persist(&self, items: &[HistoryItem]) {
        let result = serde_json::to_vec(items)
            .map_err(|e| StorageError::Io {
                key: self.key.clone(),
                source: e.into(),
            })
            .and_then(|payload| self.storage.write(&self.key, &payload));

        if let Err(e) = result {
            tracing::warn!(
                "History not persisted, keeping {} items in memory: {}",
                items.len(),
                e
            );
        }
    }
}
