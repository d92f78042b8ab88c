//! The pub/sub channel is provided by the host application. These traits are
//! the seam: an authority or replica is handed one sender and one receiver
//! and never learns how bytes actually move.

pub(crate) mod error;
pub(crate) mod io;

use error::TransportError;

/// Publishes a payload to every other subscriber of a channel
pub trait MessageSender: Send {
    fn publish(&self, channel: &str, payload: &[u8]) -> Result<(), TransportError>;
}

/// Yields payloads published on the subscribed channel, oldest first
pub trait MessageReceiver: Send {
    /// Returns `Ok(None)` once no payload is waiting
    fn receive(&mut self) -> Result<Option<Vec<u8>>, TransportError>;
}
