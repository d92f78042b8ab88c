//! In-memory pub/sub hub for end-to-end tests.
//! Every payload one endpoint publishes is queued for every other endpoint,
//! the way a host's socket relays module messages.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use log::trace;

use wyterm_shared::{MessageReceiver, MessageSender, TransportError};

type Inbox = Arc<Mutex<VecDeque<Vec<u8>>>>;

struct Subscriber {
    id: usize,
    inbox: Inbox,
    /// Offline endpoints miss everything published meanwhile
    online: Arc<Mutex<bool>>,
}

#[derive(Default)]
struct HubState {
    subscribers: Vec<Subscriber>,
    /// Deliver every payload twice
    duplicate: bool,
    published: usize,
}

/// Shared broadcast medium. Clone freely; clones are the same hub.
#[derive(Clone, Default)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// At-least-once delivery: every payload arrives twice from now on
    pub fn set_duplicate(&self, duplicate: bool) {
        self.state.lock().unwrap().duplicate = duplicate;
    }

    /// Number of payloads published so far
    pub fn published(&self) -> usize {
        self.state.lock().unwrap().published
    }

    /// Join the hub and get this endpoint's sender/receiver pair
    pub fn endpoint(&self) -> HubEndpoint {
        let mut state = self.state.lock().unwrap();
        let id = state.subscribers.len();
        let inbox: Inbox = Arc::new(Mutex::new(VecDeque::new()));
        let online = Arc::new(Mutex::new(true));
        state.subscribers.push(Subscriber {
            id,
            inbox: inbox.clone(),
            online: online.clone(),
        });
        HubEndpoint {
            id,
            hub: self.clone(),
            inbox,
            online,
        }
    }

    fn publish_from(&self, from: usize, payload: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.published += 1;
        let copies = if state.duplicate { 2 } else { 1 };
        trace!("endpoint {} published {} bytes", from, payload.len());
        for subscriber in state.subscribers.iter().filter(|s| s.id != from) {
            if !*subscriber.online.lock().unwrap() {
                continue;
            }
            let mut inbox = subscriber.inbox.lock().unwrap();
            for _ in 0..copies {
                inbox.push_back(payload.to_vec());
            }
        }
    }
}

/// One process's view of the hub
#[derive(Clone)]
pub struct HubEndpoint {
    id: usize,
    hub: LocalHub,
    inbox: Inbox,
    online: Arc<Mutex<bool>>,
}

impl HubEndpoint {
    pub fn sender(&self) -> Box<dyn MessageSender> {
        Box::new(self.clone())
    }

    pub fn receiver(&self) -> Box<dyn MessageReceiver> {
        Box::new(self.clone())
    }

    /// While offline the endpoint neither sends nor receives
    pub fn set_online(&self, online: bool) {
        *self.online.lock().unwrap() = online;
    }

    /// Queue a raw payload for this endpoint only
    pub fn inject(&self, payload: &[u8]) {
        self.inbox.lock().unwrap().push_back(payload.to_vec());
    }

    /// Take everything queued for this endpoint without processing it
    pub fn take_inbox(&self) -> Vec<Vec<u8>> {
        self.inbox.lock().unwrap().drain(..).collect()
    }
}

impl MessageSender for HubEndpoint {
    fn publish(&self, _channel: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !*self.online.lock().unwrap() {
            return Err(TransportError::Disconnected);
        }
        self.hub.publish_from(self.id, payload);
        Ok(())
    }
}

impl MessageReceiver for HubEndpoint {
    fn receive(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.inbox.lock().unwrap().pop_front())
    }
}
