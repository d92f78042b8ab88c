use wyterm_shared::TimerId;

use crate::store::{ChangeSet, StoreError};

/// A timer that reached its target during a tick
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerCompletion {
    pub id: TimerId,
    pub label: String,
    pub game_target_time_ms: i64,
    pub actions_run: usize,
    pub actions_failed: usize,
    /// Found mid-fire from an earlier, interrupted tick and completed without
    /// running its actions again
    pub interrupted: bool,
}

/// Outcome of one scheduler tick
#[derive(Debug, Default)]
pub struct TickReport {
    pub game_now_ms: i64,
    pub completed: Vec<TimerCompletion>,
    /// Due timers left for the next tick once the action budget ran out
    pub deferred: Vec<TimerId>,
    /// Every region touched by the tick, published as one batch
    pub changes: ChangeSet,
    pub errors: Vec<StoreError>,
}

impl TickReport {
    pub(crate) fn new(game_now_ms: i64) -> Self {
        Self {
            game_now_ms,
            ..Self::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.completed.is_empty() && self.deferred.is_empty() && self.changes.is_empty()
    }

    /// Fold a store result into the report. Returns whether it succeeded.
    pub(crate) fn absorb(&mut self, result: Result<ChangeSet, StoreError>) -> bool {
        match result {
            Ok(changes) => {
                self.changes.merge(changes);
                true
            }
            Err(err) => {
                if let Some(changes) = err.unbroadcast_changes() {
                    self.changes.merge(changes.clone());
                }
                self.errors.push(err);
                false
            }
        }
    }
}
