mod interval_timer;
mod wall_clock;

pub use interval_timer::IntervalTimer;
pub use wall_clock::{ManualWallClock, SystemWallClock, TimeError, WallClock};
