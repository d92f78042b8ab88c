use std::{mem, vec::IntoIter};

use wyterm_shared::{Clearance, Region, ResyncScope, SceneId, TokenId};

use crate::error::ReplicaError;

/// Tokens whose local position changed on a scene
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokensMoved {
    pub scene_id: SceneId,
    pub token_ids: Vec<TokenId>,
}

/// The authority turned down this replica's clearance request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElevationDenial {
    pub requested: Clearance,
    pub reason: String,
}

/// Everything that happened during one `ReplicaReconciler::receive`
pub struct ReplicaEvents {
    regions: Vec<Region>,
    token_moves: Vec<TokensMoved>,
    alerts: Vec<String>,
    scene_changes: Vec<SceneId>,
    denials: Vec<ElevationDenial>,
    resyncs: Vec<ResyncScope>,
    errors: Vec<ReplicaError>,
    empty: bool,
}

impl ReplicaEvents {
    pub(crate) fn new() -> Self {
        Self {
            regions: Vec::new(),
            token_moves: Vec::new(),
            alerts: Vec::new(),
            scene_changes: Vec::new(),
            denials: Vec::new(),
            resyncs: Vec::new(),
            errors: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ReplicaEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ReplicaEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    pub(crate) fn push_region(&mut self, region: Region) {
        if !self.regions.contains(&region) {
            self.regions.push(region);
        }
        self.empty = false;
    }

    pub(crate) fn push_tokens_moved(&mut self, moved: TokensMoved) {
        self.token_moves.push(moved);
        self.empty = false;
    }

    pub(crate) fn push_alert(&mut self, message: String) {
        self.alerts.push(message);
        self.empty = false;
    }

    pub(crate) fn push_scene_change(&mut self, scene_id: SceneId) {
        self.scene_changes.push(scene_id);
        self.empty = false;
    }

    pub(crate) fn push_denial(&mut self, denial: ElevationDenial) {
        self.denials.push(denial);
        self.empty = false;
    }

    pub(crate) fn push_resync(&mut self, scope: ResyncScope) {
        self.resyncs.push(scope);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ReplicaError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait ReplicaEvent {
    type Iter;

    fn iter(events: &mut ReplicaEvents) -> Self::Iter;

    fn has(events: &ReplicaEvents) -> bool;
}

macro_rules! replica_event {
    ($event:ident, $field:ident, $item:ty) => {
        pub struct $event;
        impl ReplicaEvent for $event {
            type Iter = IntoIter<$item>;

            fn iter(events: &mut ReplicaEvents) -> Self::Iter {
                let list = mem::take(&mut events.$field);
                IntoIterator::into_iter(list)
            }

            fn has(events: &ReplicaEvents) -> bool {
                !events.$field.is_empty()
            }
        }
    };
}

replica_event!(RegionChangedEvent, regions, Region);
replica_event!(TokensMovedEvent, token_moves, TokensMoved);
replica_event!(AlertEvent, alerts, String);
replica_event!(SceneChangeEvent, scene_changes, SceneId);
replica_event!(ElevationDeniedEvent, denials, ElevationDenial);
replica_event!(ResyncRequestedEvent, resyncs, ResyncScope);
replica_event!(ErrorEvent, errors, ReplicaError);
