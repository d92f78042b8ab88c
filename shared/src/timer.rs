use serde::{Deserialize, Serialize};

use crate::{action::Action, types::TimerId};

/// Id of the always-present countdown slot ("time to next checkpoint").
/// Both the scheduler and any display locate the default countdown by it.
pub const DEFAULT_TIMER_ID: &str = "wy-default-countdown";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerCategory {
    Nav,
    System,
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Active,
    Completed,
    Cancelled,
}

impl TimerStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TimerStatus::Active)
    }
}

/// A countdown against game time.
///
/// `active -> completed` happens once, when a scheduler tick observes the
/// target time; `active -> cancelled` only by an explicit authoring call.
/// A `permanent` timer can never be cancelled or deleted, only re-armed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: TimerId,
    pub label: String,
    pub category: TimerCategory,
    pub game_target_time_ms: i64,
    pub created_at: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    pub status: TimerStatus,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
    /// Set (and persisted) just before the timer's actions run
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub firing: bool,
}

impl Timer {
    pub fn is_active(&self) -> bool {
        self.status == TimerStatus::Active
    }

    pub fn is_due(&self, game_now_ms: i64) -> bool {
        self.is_active() && game_now_ms >= self.game_target_time_ms
    }

    /// Game time left before the target, never negative
    pub fn remaining_ms(&self, game_now_ms: i64) -> i64 {
        self.game_target_time_ms.saturating_sub(game_now_ms).max(0)
    }
}

/// Partial edit of an active timer. A new `duration` is re-anchored to the
/// current game time, not to the original target.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerUpdate {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub category: Option<TimerCategory>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl TimerUpdate {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.category.is_none() && self.duration.is_none()
    }
}
