//! In-memory document store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::error::StoreError;
use super::{Collection, DocumentStore};

/// Document store that keeps everything in memory.
///
/// Cheap to clone; clones share the same documents, so a test can hand one
/// clone to the extractor and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<Collection, Vec<Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All documents in `collection`, in insertion order.
    pub fn documents(&self, collection: Collection) -> Vec<Value> {
        self.inner
            .lock()
            .ok()
            .and_then(|guard| guard.get(&collection).cloned())
            .unwrap_or_default()
    }

    /// Number of documents in `collection`.
    pub fn count(&self, collection: Collection) -> usize {
        self.inner
            .lock()
            .ok()
            .and_then(|guard| guard.get(&collection).map(Vec::len))
            .unwrap_or(0)
    }
}

impl DocumentStore for MemoryStore {
    fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        guard.remove(&collection);
        Ok(())
    }

    fn insert_one(&self, collection: Collection, document: &Value) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        guard.entry(collection).or_default().push(document.clone());
        Ok(())
    }
}
