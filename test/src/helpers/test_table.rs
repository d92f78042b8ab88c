use std::sync::Arc;

use wyterm_client::{ClientConfig, ReplicaEvents, ReplicaReconciler};
use wyterm_server::{
    AuthorityServer, KeyValueStore, MemoryEntityStore, MemoryKeyValueStore, ServerConfig,
    ServerEvents,
};
use wyterm_shared::ManualWallClock;

use crate::local_hub::{HubEndpoint, LocalHub};

pub const SCENE: &str = "nostromo-bridge";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One authority and any number of replicas on a shared hub and a shared
/// manual wall clock
pub struct TestTable {
    pub wall: Arc<ManualWallClock>,
    pub hub: LocalHub,
    pub kv: MemoryKeyValueStore,
    pub entities: MemoryEntityStore,
    pub server: AuthorityServer,
    pub server_endpoint: HubEndpoint,
    pub replicas: Vec<ReplicaReconciler>,
    pub replica_endpoints: Vec<HubEndpoint>,
}

impl TestTable {
    /// A running clock, a bridge scene with one token per crew member
    pub fn new() -> Self {
        Self::with_config(ServerConfig {
            clock_starts_paused: false,
            ..ServerConfig::default()
        })
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let kv = MemoryKeyValueStore::new();
        Self::with_store(config, kv.clone(), Box::new(kv))
    }

    /// Start on an existing store, e.g. one a previous table wrote to
    pub fn with_store(
        config: ServerConfig,
        kv: MemoryKeyValueStore,
        backend: Box<dyn KeyValueStore>,
    ) -> Self {
        init_logger();
        let wall = Arc::new(ManualWallClock::new(1_000_000));
        Self::restart_with(config, kv, backend, wall)
    }

    /// Start an authority on `backend` at the given wall time
    pub fn restart_with(
        config: ServerConfig,
        kv: MemoryKeyValueStore,
        backend: Box<dyn KeyValueStore>,
        wall: Arc<ManualWallClock>,
    ) -> Self {
        let entities = MemoryEntityStore::new();
        entities.add_token(SCENE, "ripley", 0.0, 0.0, &["ripley"]);
        entities.add_token(SCENE, "dallas", 1.0, 0.0, &["dallas"]);

        let mut server =
            AuthorityServer::new(config, backend, Box::new(entities.clone()), wall.clone())
                .expect("authority starts");
        let hub = LocalHub::new();
        let server_endpoint = hub.endpoint();
        server.listen(server_endpoint.sender(), server_endpoint.receiver());

        Self {
            wall,
            hub,
            kv,
            entities,
            server,
            server_endpoint,
            replicas: Vec::new(),
            replica_endpoints: Vec::new(),
        }
    }

    /// Connect a replica and let it catch up. Returns its index.
    pub fn add_replica(&mut self, user_id: &str) -> usize {
        let endpoint = self.hub.endpoint();
        let mut replica = ReplicaReconciler::new(ClientConfig::default(), user_id, self.wall.clone());
        replica
            .connect(endpoint.sender(), endpoint.receiver())
            .expect("replica connects");
        self.replicas.push(replica);
        self.replica_endpoints.push(endpoint);
        self.exchange();
        self.replicas.len() - 1
    }

    pub fn replica(&self, index: usize) -> &ReplicaReconciler {
        &self.replicas[index]
    }

    pub fn replica_mut(&mut self, index: usize) -> &mut ReplicaReconciler {
        &mut self.replicas[index]
    }

    /// Advance real time
    pub fn advance(&self, millis: i64) {
        self.wall.advance(millis);
    }

    /// Poll every process until nothing is in flight. Returns the server's
    /// and each replica's accumulated events.
    pub fn exchange(&mut self) -> (Vec<ServerEvents>, Vec<Vec<ReplicaEvents>>) {
        let mut server_events = Vec::new();
        let mut replica_events: Vec<Vec<ReplicaEvents>> =
            self.replicas.iter().map(|_| Vec::new()).collect();
        for _ in 0..8 {
            let before = self.hub.published();
            server_events.push(self.server.receive());
            for (index, replica) in self.replicas.iter_mut().enumerate() {
                replica_events[index].push(replica.receive());
            }
            if self.hub.published() == before {
                break;
            }
        }
        (server_events, replica_events)
    }

    /// Let the debounce window close, then the resync settle delay, and
    /// exchange after each
    pub fn settle(&mut self) -> (Vec<ServerEvents>, Vec<Vec<ReplicaEvents>>) {
        self.advance(50);
        let first = self.exchange();
        self.advance(300);
        let second = self.exchange();
        let mut server = first.0;
        server.extend(second.0);
        let mut replicas = first.1;
        for (index, events) in second.1.into_iter().enumerate() {
            replicas[index].extend(events);
        }
        (server, replicas)
    }
}

impl Default for TestTable {
    fn default() -> Self {
        Self::new()
    }
}
