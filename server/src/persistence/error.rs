use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("Failed to read '{namespace}.{key}': {reason}")]
    ReadFailed {
        namespace: String,
        key: String,
        reason: String,
    },

    #[error("Failed to write '{namespace}.{key}': {reason}")]
    WriteFailed {
        namespace: String,
        key: String,
        reason: String,
    },

    #[error("Stored value '{namespace}.{key}' is unreadable: {reason}")]
    Corrupt {
        namespace: String,
        key: String,
        reason: String,
    },
}
