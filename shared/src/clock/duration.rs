//! Free-text game durations: "2h 30m", "14 weeks", "3 days", "1h30m".

use thiserror::Error;

use crate::clock::{DAY_MS, HOUR_MS, MINUTE_MS, SECOND_MS, WEEK_MS};

/// Errors produced when a duration string cannot be scheduled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Zero, negative, or unparseable duration
    #[error("Invalid duration '{input}': expected a positive amount of game time such as '2h 30m' or '3 days'")]
    InvalidDuration { input: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Unit {
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    const ALL: [Unit; 5] = [Unit::Week, Unit::Day, Unit::Hour, Unit::Minute, Unit::Second];

    fn from_word(word: &str) -> Option<Unit> {
        match word {
            "w" | "wk" | "wks" | "week" | "weeks" => Some(Unit::Week),
            "d" | "day" | "days" => Some(Unit::Day),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Unit::Hour),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(Unit::Minute),
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Unit::Second),
            _ => None,
        }
    }

    fn millis(self) -> i64 {
        match self {
            Unit::Week => WEEK_MS,
            Unit::Day => DAY_MS,
            Unit::Hour => HOUR_MS,
            Unit::Minute => MINUTE_MS,
            Unit::Second => SECOND_MS,
        }
    }

    fn index(self) -> usize {
        Unit::ALL.iter().position(|u| *u == self).unwrap_or(0)
    }
}

/// Parse a duration into game milliseconds.
///
/// Each `<number><unit>` component contributes once; a unit appearing a
/// second time is ignored. Text with no recognizable component (such as
/// "ARRIVED" or "N/A") parses to zero.
pub fn parse_duration(input: &str) -> i64 {
    let text = input.to_ascii_lowercase();
    let chars: Vec<char> = text.chars().collect();
    let mut seen = [false; 5];
    let mut total = 0f64;
    let mut i = 0;

    while i < chars.len() {
        let starts_number = chars[i].is_ascii_digit()
            || (chars[i] == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()));
        if !starts_number {
            i += 1;
            continue;
        }

        let number_start = i;
        let mut seen_dot = false;
        while i < chars.len() && (chars[i].is_ascii_digit() || (chars[i] == '.' && !seen_dot)) {
            if chars[i] == '.' {
                seen_dot = true;
            }
            i += 1;
        }
        let number: String = chars[number_start..i].iter().collect();

        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        let word_start = i;
        while i < chars.len() && chars[i].is_ascii_alphabetic() {
            i += 1;
        }
        let word: String = chars[word_start..i].iter().collect();

        let (Ok(value), Some(unit)) = (number.parse::<f64>(), Unit::from_word(&word)) else {
            continue;
        };
        if seen[unit.index()] {
            continue;
        }
        seen[unit.index()] = true;
        total += value * unit.millis() as f64;
    }

    total.round() as i64
}

/// Like [`parse_duration`], but rejects anything that would not schedule a
/// future event
pub fn parse_positive_duration(input: &str) -> Result<i64, DurationError> {
    let millis = parse_duration(input);
    if millis <= 0 {
        return Err(DurationError::InvalidDuration {
            input: input.to_string(),
        });
    }
    Ok(millis)
}

/// Compact rendering rounded to the nearest minute, e.g. `2w 3d 4h 5m`.
pub fn format_duration(millis: i64) -> String {
    if millis <= 0 {
        return "0m".to_string();
    }
    let mut minutes = millis.saturating_add(MINUTE_MS / 2) / MINUTE_MS;
    let mut parts = Vec::new();
    for (label, per) in [
        ("w", WEEK_MS / MINUTE_MS),
        ("d", DAY_MS / MINUTE_MS),
        ("h", HOUR_MS / MINUTE_MS),
    ] {
        let count = minutes / per;
        if count > 0 {
            parts.push(format!("{}{}", count, label));
            minutes -= count * per;
        }
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!("{}m", minutes));
    }
    parts.join(" ")
}

/// Countdown rendering, `HH:MM:SS`; hours are not wrapped at 24
pub fn format_countdown(millis: i64) -> String {
    let seconds = millis.max(0) / SECOND_MS;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3_600,
        (seconds / 60) % 60,
        seconds % 60
    )
}
