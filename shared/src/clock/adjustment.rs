use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{DAY_MS, HOUR_MS, MINUTE_MS};

/// 2183-06-12 06:00:00 UTC, the starting date of a fresh campaign
pub const DEFAULT_GAME_EPOCH_MS: i64 = 6_735_679_200_000;

/// A manual "jump the clock" request, as issued from the narrator's panel.
///
/// Month and year jumps follow the calendar (clamped to the end of a shorter
/// month); the others are fixed lengths of game time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "amount", rename_all = "camelCase")]
pub enum ClockAdjustment {
    Years(i32),
    Months(i32),
    Days(i64),
    Hours(i64),
    Minutes(i64),
}

impl ClockAdjustment {
    /// Returns the adjusted game time, or None if it leaves the representable
    /// calendar range
    pub fn apply_to(&self, game_time_ms: i64) -> Option<i64> {
        match *self {
            ClockAdjustment::Years(years) => shift_months(game_time_ms, years.checked_mul(12)?),
            ClockAdjustment::Months(months) => shift_months(game_time_ms, months),
            ClockAdjustment::Days(days) => game_time_ms.checked_add(days.checked_mul(DAY_MS)?),
            ClockAdjustment::Hours(hours) => game_time_ms.checked_add(hours.checked_mul(HOUR_MS)?),
            ClockAdjustment::Minutes(minutes) => {
                game_time_ms.checked_add(minutes.checked_mul(MINUTE_MS)?)
            }
        }
    }
}

fn shift_months(game_time_ms: i64, months: i32) -> Option<i64> {
    let date = DateTime::<Utc>::from_timestamp_millis(game_time_ms)?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))?
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))?
    };
    Some(shifted.timestamp_millis())
}

/// Renders game time the way the terminal displays it: `2183-06-12 06:00:00`
pub fn format_game_time(game_time_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(game_time_ms) {
        Some(date) => date.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("T{:+}ms", game_time_ms),
    }
}

/// RFC 3339 stamp of a real-world instant, used for created/completed markers
pub fn format_wall_time(wall_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(wall_ms) {
        Some(date) => date.to_rfc3339(),
        None => wall_ms.to_string(),
    }
}
