use thiserror::Error;

use crate::messages::error::MessageError;

/// Errors reported by a pub/sub transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Publishing a payload failed
    #[error("Failed to publish on channel '{channel}': {reason}")]
    Send { channel: String, reason: String },

    /// Reading the next payload failed
    #[error("Failed to receive from broadcast channel: {reason}")]
    Receive { reason: String },

    /// The channel has been closed by the host
    #[error("Broadcast channel is disconnected")]
    Disconnected,
}

/// Errors from sending or receiving typed messages through [`crate::Io`]
#[derive(Debug, Error)]
pub enum IoError {
    /// `Io::load` has not been called yet
    #[error("No broadcast channel loaded; call listen()/connect() first")]
    NotLoaded,

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
