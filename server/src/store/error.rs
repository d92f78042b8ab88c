use thiserror::Error;

use wyterm_shared::{Clearance, RegionError};

use crate::{persistence::PersistenceError, store::ChangeSet};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The in-memory copy changed but at least one region failed to persist.
    /// `changes` still has to reach the replicas.
    #[error("Change to {changes:?} applied in memory but not persisted: {source}")]
    Unpersisted {
        changes: ChangeSet,
        #[source]
        source: PersistenceError,
    },

    #[error(transparent)]
    Region(#[from] RegionError),

    /// Clearance only ever moves up outside of an explicit reset
    #[error("Clearance of '{user_id}' is {current}, which {requested} does not raise")]
    NotARaise {
        user_id: String,
        current: Clearance,
        requested: Clearance,
    },
}

impl StoreError {
    /// Regions that changed in memory despite the error
    pub fn unbroadcast_changes(&self) -> Option<&ChangeSet> {
        match self {
            StoreError::Unpersisted { changes, .. } => Some(changes),
            _ => None,
        }
    }
}
