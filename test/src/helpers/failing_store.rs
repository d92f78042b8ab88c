use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde_json::Value;

use wyterm_server::{KeyValueStore, MemoryKeyValueStore, PersistenceError};

/// A memory store whose writes can be switched to fail
#[derive(Clone, Default)]
pub struct FailingKeyValueStore {
    inner: MemoryKeyValueStore,
    fail_writes: Arc<AtomicBool>,
}

impl FailingKeyValueStore {
    pub fn new(inner: MemoryKeyValueStore) -> Self {
        Self {
            inner,
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryKeyValueStore {
        &self.inner
    }
}

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, PersistenceError> {
        self.inner.get(namespace, key)
    }

    fn set(&mut self, namespace: &str, key: &str, value: Value) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteFailed {
                namespace: namespace.to_string(),
                key: key.to_string(),
                reason: "disk full".to_string(),
            });
        }
        self.inner.set(namespace, key, value)
    }
}
