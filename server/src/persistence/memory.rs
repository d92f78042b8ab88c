use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde_json::Value;

use super::{KeyValueStore, PersistenceError};

type Entries = HashMap<(String, String), Value>;

/// In-memory [`KeyValueStore`]. Clones share the same entries, which lets a
/// test hand one clone to a server, drop that server, and start another on
/// the surviving data.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<Entries>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys across every namespace
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read without going through the trait, for assertions
    pub fn peek(&self, namespace: &str, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(&(namespace.to_string(), key.to_string())).cloned())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, PersistenceError> {
        let entries = self.entries.lock().map_err(|_| PersistenceError::ReadFailed {
            namespace: namespace.to_string(),
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;
        Ok(entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&mut self, namespace: &str, key: &str, value: Value) -> Result<(), PersistenceError> {
        let mut entries = self.entries.lock().map_err(|_| PersistenceError::WriteFailed {
            namespace: namespace.to_string(),
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;
        entries.insert((namespace.to_string(), key.to_string()), value);
        Ok(())
    }
}
