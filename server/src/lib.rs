//! # wyterm Server
//! The authoritative side of the terminal module: owns the canonical ship
//! state, the virtual game clock and the event timer scheduler, persists
//! every change into a key-value store, and broadcasts it to replicas.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod actions;
mod entities;
mod error;
mod events;
mod persistence;
mod server;
mod store;
mod timers;

pub use actions::{ActionError, ActionExecutor, ShipActionExecutor};
pub use entities::{EntityStore, EntityStoreError, MemoryEntityStore};
pub use error::ServerError;
pub use events::{
    ElevationEvent, ElevationOutcome, ErrorEvent, ResyncEvent, ResyncServed, ServerEvent,
    ServerEvents, TimerCompletedEvent, TokenMoveEvent, TokenMoveOutcome,
};
pub use persistence::{KeyValueStore, MemoryKeyValueStore, PersistenceError};
pub use server::{AuthorityServer, ServerConfig};
pub use store::{
    generate_command_code, ChangeSet, CommandCode, CrewField, Mutation, ReplicatedStateStore,
    StoreError, COMMAND_CODES_KEY,
};
pub use timers::{EventTimerEngine, TickReport, TimerCompletion};
