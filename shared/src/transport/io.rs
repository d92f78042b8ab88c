use log::{debug, warn};

use crate::{
    messages::{broadcast_message::BroadcastMessage, CHANNEL_NAME},
    transport::{error::IoError, MessageReceiver, MessageSender},
};

/// Owns the sender/receiver pair a process was handed, and speaks
/// `BroadcastMessage` over it
pub struct Io {
    channel: String,
    sender: Option<Box<dyn MessageSender>>,
    receiver: Option<Box<dyn MessageReceiver>>,
}

impl Default for Io {
    fn default() -> Self {
        Self::new()
    }
}

impl Io {
    pub fn new() -> Self {
        Self::with_channel(CHANNEL_NAME)
    }

    pub fn with_channel(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            sender: None,
            receiver: None,
        }
    }

    pub fn load(&mut self, sender: Box<dyn MessageSender>, receiver: Box<dyn MessageReceiver>) {
        if self.sender.is_some() {
            warn!("replacing an already loaded broadcast channel");
        }
        self.sender = Some(sender);
        self.receiver = Some(receiver);
    }

    pub fn is_loaded(&self) -> bool {
        self.sender.is_some()
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Encode and publish. Does not wait for delivery.
    pub fn send(&self, message: &BroadcastMessage) -> Result<(), IoError> {
        let Some(sender) = self.sender.as_ref() else {
            return Err(IoError::NotLoaded);
        };
        let payload = message.encode()?;
        debug!(
            "publishing {} ({} bytes) on {}",
            message.message_type(),
            payload.len(),
            self.channel
        );
        sender.publish(&self.channel, &payload)?;
        Ok(())
    }

    /// Next raw payload, if any. Decoding is left to the caller so a
    /// malformed payload can be handled per role.
    pub fn recv(&mut self) -> Result<Option<Vec<u8>>, IoError> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Err(IoError::NotLoaded);
        };
        Ok(receiver.receive()?)
    }
}
