use std::{mem, vec::IntoIter};

use wyterm_shared::{Clearance, ResyncScope, SceneId, TokenId, UserId};

use crate::{error::ServerError, timers::TimerCompletion};

/// Outcome of a replica's clearance request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElevationOutcome {
    pub user_id: UserId,
    pub requested: Clearance,
    pub granted: bool,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResyncServed {
    pub user_id: UserId,
    pub scope: ResyncScope,
}

/// A replica's queued token move, after the authority re-issued it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMoveOutcome {
    pub user_id: UserId,
    pub scene_id: SceneId,
    pub token_id: TokenId,
    pub accepted: bool,
}

/// Everything that happened during one `AuthorityServer::receive`
pub struct ServerEvents {
    completions: Vec<TimerCompletion>,
    elevations: Vec<ElevationOutcome>,
    resyncs: Vec<ResyncServed>,
    token_moves: Vec<TokenMoveOutcome>,
    errors: Vec<ServerError>,
    empty: bool,
}

impl ServerEvents {
    pub(crate) fn new() -> Self {
        Self {
            completions: Vec::new(),
            elevations: Vec::new(),
            resyncs: Vec::new(),
            token_moves: Vec::new(),
            errors: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ServerEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ServerEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    pub(crate) fn push_completion(&mut self, completion: TimerCompletion) {
        self.completions.push(completion);
        self.empty = false;
    }

    pub(crate) fn push_elevation(&mut self, outcome: ElevationOutcome) {
        self.elevations.push(outcome);
        self.empty = false;
    }

    pub(crate) fn push_resync(&mut self, served: ResyncServed) {
        self.resyncs.push(served);
        self.empty = false;
    }

    pub(crate) fn push_token_move(&mut self, outcome: TokenMoveOutcome) {
        self.token_moves.push(outcome);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait ServerEvent {
    type Iter;

    fn iter(events: &mut ServerEvents) -> Self::Iter;

    fn has(events: &ServerEvents) -> bool;
}

// Timer Completed Event
pub struct TimerCompletedEvent;
impl ServerEvent for TimerCompletedEvent {
    type Iter = IntoIter<TimerCompletion>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        let list = mem::take(&mut events.completions);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ServerEvents) -> bool {
        !events.completions.is_empty()
    }
}

// Elevation Event
pub struct ElevationEvent;
impl ServerEvent for ElevationEvent {
    type Iter = IntoIter<ElevationOutcome>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        let list = mem::take(&mut events.elevations);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ServerEvents) -> bool {
        !events.elevations.is_empty()
    }
}

// Resync Event
pub struct ResyncEvent;
impl ServerEvent for ResyncEvent {
    type Iter = IntoIter<ResyncServed>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        let list = mem::take(&mut events.resyncs);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ServerEvents) -> bool {
        !events.resyncs.is_empty()
    }
}

// Token Move Event
pub struct TokenMoveEvent;
impl ServerEvent for TokenMoveEvent {
    type Iter = IntoIter<TokenMoveOutcome>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        let list = mem::take(&mut events.token_moves);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ServerEvents) -> bool {
        !events.token_moves.is_empty()
    }
}

// Error Event
pub struct ErrorEvent;
impl ServerEvent for ErrorEvent {
    type Iter = IntoIter<ServerError>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ServerEvents) -> bool {
        !events.errors.is_empty()
    }
}
