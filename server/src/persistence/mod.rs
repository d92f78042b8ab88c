//! Durable key-value storage the authority persists replicated regions into.
//!
//! The host supplies the real store; [`MemoryKeyValueStore`] backs tests and
//! single-process deployments.

mod error;
mod memory;

pub use error::PersistenceError;
pub use memory::MemoryKeyValueStore;

use serde_json::Value;

/// Namespaced JSON key-value storage. Each replicated region is stored under
/// its own key so a failed write only loses that region.
pub trait KeyValueStore: Send {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, PersistenceError>;

    fn set(&mut self, namespace: &str, key: &str, value: Value) -> Result<(), PersistenceError>;
}
