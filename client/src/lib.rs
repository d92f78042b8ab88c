//! # wyterm Client
//! The replica side of the terminal module: keeps a shadow copy of the
//! authority's replicated state, reconciles token positions, and sends
//! clearance, resync and token-move requests back to the authority.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod client_config;
mod error;
mod events;
mod reconciler;

pub use client_config::ClientConfig;
pub use error::ReplicaError;
pub use events::{
    AlertEvent, ElevationDenial, ElevationDeniedEvent, ErrorEvent, RegionChangedEvent,
    ReplicaEvent, ReplicaEvents, ResyncRequestedEvent, SceneChangeEvent, TokensMoved,
    TokensMovedEvent,
};
pub use reconciler::ReplicaReconciler;
