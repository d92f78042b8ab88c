use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by a ReplicaReconciler
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Token updates for a scene arriving within this window are coalesced,
    /// and only the latest is applied
    pub debounce: Duration,
    /// Wait after a structural token mismatch before asking for a resync,
    /// so a burst of creations or deletions settles first
    pub resync_settle: Duration,
    /// How long an optimistic token move may go unconfirmed before it is
    /// reverted
    pub optimistic_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(30),
            resync_settle: Duration::from_millis(250),
            optimistic_timeout: Duration::from_secs(5),
        }
    }
}
