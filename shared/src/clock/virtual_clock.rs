use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{backends::WallClock, clock::adjustment::ClockAdjustment};

/// The four values that fully determine game time.
///
/// Always replaced as a whole: every rebase builds a fresh `ClockState` and
/// assigns it in one move, so no reader can see a new epoch paired with a
/// stale anchor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockState {
    pub epoch_game_time_ms: i64,
    pub real_anchor_ms: i64,
    pub acceleration: f64,
    pub paused: bool,
}

impl ClockState {
    pub fn new(epoch_game_time_ms: i64, real_anchor_ms: i64, acceleration: f64, paused: bool) -> Self {
        Self {
            epoch_game_time_ms,
            real_anchor_ms,
            acceleration,
            paused,
        }
    }

    /// Game time observed at the given real instant.
    ///
    /// Real time earlier than the anchor counts as zero elapsed, so a wall
    /// clock that steps backwards stalls game time instead of rewinding it.
    pub fn game_time_at(&self, real_now_ms: i64) -> i64 {
        if self.paused {
            return self.epoch_game_time_ms;
        }
        let elapsed_real = real_now_ms.saturating_sub(self.real_anchor_ms).max(0);
        let elapsed_game = (elapsed_real as f64 * self.acceleration) as i64;
        self.epoch_game_time_ms.saturating_add(elapsed_game)
    }

    /// Snapshot of the current game time taken at `real_now_ms`, anchored there
    fn rebased(&self, real_now_ms: i64) -> Self {
        Self {
            epoch_game_time_ms: self.game_time_at(real_now_ms),
            real_anchor_ms: real_now_ms,
            acceleration: self.acceleration,
            paused: self.paused,
        }
    }
}

/// Accelerated, pausable game clock
pub struct VirtualClock {
    state: ClockState,
    wall: Arc<dyn WallClock>,
}

impl VirtualClock {
    /// Create a clock at `epoch_game_time_ms`, anchored at the current wall time
    pub fn new(
        wall: Arc<dyn WallClock>,
        epoch_game_time_ms: i64,
        acceleration: f64,
        paused: bool,
    ) -> Self {
        let state = ClockState::new(epoch_game_time_ms, wall.now_ms(), acceleration, paused);
        Self { state, wall }
    }

    /// Rebuild a clock from persisted or replicated state
    pub fn from_state(state: ClockState, wall: Arc<dyn WallClock>) -> Self {
        Self { state, wall }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn now(&self) -> i64 {
        self.state.game_time_at(self.wall.now_ms())
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn acceleration(&self) -> f64 {
        self.state.acceleration
    }

    /// Freeze game time. Returns false if the clock was already paused.
    pub fn pause(&mut self) -> bool {
        if self.state.paused {
            return false;
        }
        let mut next = self.state.rebased(self.wall.now_ms());
        next.paused = true;
        self.state = next;
        debug!("game clock paused at {}", self.state.epoch_game_time_ms);
        true
    }

    /// Let game time run again from where it was frozen. Returns false if the
    /// clock was already running.
    pub fn resume(&mut self) -> bool {
        if !self.state.paused {
            return false;
        }
        let mut next = self.state;
        next.real_anchor_ms = self.wall.now_ms();
        next.paused = false;
        self.state = next;
        debug!("game clock resumed at {}", self.state.epoch_game_time_ms);
        true
    }

    /// Jump game time by `delta_ms`, keeping the paused/running state
    pub fn adjust_ms(&mut self, delta_ms: i64) {
        let mut next = self.state.rebased(self.wall.now_ms());
        next.epoch_game_time_ms = next.epoch_game_time_ms.saturating_add(delta_ms);
        self.state = next;
    }

    /// Calendar-aware jump. Returns false when the target date is not
    /// representable, in which case the clock is left untouched.
    pub fn adjust(&mut self, adjustment: ClockAdjustment) -> bool {
        let mut next = self.state.rebased(self.wall.now_ms());
        let Some(target) = adjustment.apply_to(next.epoch_game_time_ms) else {
            return false;
        };
        next.epoch_game_time_ms = target;
        self.state = next;
        true
    }

    /// Restart the clock, running, from `epoch_game_time_ms`
    pub fn reset(&mut self, epoch_game_time_ms: i64) {
        self.state = ClockState::new(
            epoch_game_time_ms,
            self.wall.now_ms(),
            self.state.acceleration,
            false,
        );
    }
}
