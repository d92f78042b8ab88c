use thiserror::Error;

use wyterm_shared::{Clearance, ClockAdjustment, DurationError, IoError, MessageError};

use crate::{
    entities::EntityStoreError,
    store::{ChangeSet, StoreError},
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    InvalidDuration(#[from] DurationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Elevation of '{user_id}' to {requested} rejected: {reason}")]
    ElevationRejected {
        user_id: String,
        requested: Clearance,
        reason: String,
    },

    #[error("Move of token '{token_id}' on '{scene_id}' by '{user_id}' rejected: {reason}")]
    TokenMoveRejected {
        user_id: String,
        scene_id: String,
        token_id: String,
        reason: String,
    },

    #[error(transparent)]
    Entities(#[from] EntityStoreError),

    #[error("Clock adjustment {0:?} leaves the representable calendar")]
    ClockOutOfRange(ClockAdjustment),

    #[error(transparent)]
    Io(#[from] IoError),

    /// A payload on the channel that is not a `BroadcastMessage`
    #[error(transparent)]
    Message(#[from] MessageError),
}

impl ServerError {
    pub(crate) fn unbroadcast_changes(&self) -> Option<&ChangeSet> {
        match self {
            ServerError::Store(err) => err.unbroadcast_changes(),
            _ => None,
        }
    }
}
