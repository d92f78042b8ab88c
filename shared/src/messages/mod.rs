pub(crate) mod broadcast_message;
pub(crate) mod error;

/// The one pub/sub channel every process of a session publishes on
pub const CHANNEL_NAME: &str = "module.wy-terminal";
