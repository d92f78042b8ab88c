//! # Game Clock
//!
//! Game time is derived from wall-clock time: a stored epoch, the real
//! instant that epoch was taken at, a fixed acceleration factor and a
//! paused flag. Nothing ticks; `now()` is computed on demand, so the clock
//! keeps "running" while no process is alive to observe it.
//!
//! | Module | Role |
//! |--------|------|
//! | [`virtual_clock`] | `ClockState` + `VirtualClock` rebasing operations |
//! | [`adjustment`]    | calendar-aware manual jumps, game date rendering |
//! | [`duration`]      | free-text duration parsing & formatting |

pub(crate) mod adjustment;
pub(crate) mod duration;
pub(crate) mod virtual_clock;

/// Game milliseconds per unit. The virtual clock runs on the same unit
/// scale as real time; only the rate differs.
pub const SECOND_MS: i64 = 1_000;
pub const MINUTE_MS: i64 = 60 * SECOND_MS;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;
pub const WEEK_MS: i64 = 7 * DAY_MS;
