use thiserror::Error;

use crate::store::{ChangeSet, StoreError};

#[derive(Debug, Error)]
pub enum ActionError {
    /// `setField` named something other than `shipStatus` or `crew:<NAME>`
    #[error("Unknown setField target '{target}'")]
    UnknownTarget { target: String },

    #[error("Unknown crew field '{field}', expected location, status or task")]
    UnknownCrewField { field: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ActionError {
    /// Changes the action made in memory that failed to persist
    pub fn unbroadcast_changes(&self) -> Option<&ChangeSet> {
        match self {
            ActionError::Store(err) => err.unbroadcast_changes(),
            _ => None,
        }
    }
}
