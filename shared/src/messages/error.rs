use thiserror::Error;

/// Errors that can occur converting a broadcast message to or from bytes
#[derive(Debug, Error)]
pub enum MessageError {
    /// Message could not be serialized
    #[error("Failed to encode {message_type} message: {source}")]
    Encode {
        message_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Payload was not a well-formed broadcast message
    #[error("Failed to decode broadcast message ({len} bytes): {source}")]
    Decode {
        len: usize,
        #[source]
        source: serde_json::Error,
    },
}
