use thiserror::Error;

use wyterm_shared::{IoError, MessageError, RegionError};

#[derive(Debug, Error)]
pub enum ReplicaError {
    /// A payload on the channel that is not a `BroadcastMessage`
    #[error(transparent)]
    Decode(#[from] MessageError),

    /// A region value that does not match its shape
    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("Unknown token '{token_id}' on scene '{scene_id}'")]
    UnknownToken { scene_id: String, token_id: String },
}
