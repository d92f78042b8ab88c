use std::time::Duration;

/// Fires once every `duration` of real time.
///
/// Polled, never self-scheduling: the owner checks `ringing(now)` from its
/// update loop and calls `reset(now)` after doing the periodic work.
#[derive(Clone, Debug)]
pub struct IntervalTimer {
    duration_ms: i64,
    last_ms: i64,
}

impl IntervalTimer {
    /// Create a timer whose first ring is one full `duration` after `now_ms`
    pub fn new(duration: Duration, now_ms: i64) -> Self {
        Self {
            duration_ms: millis(duration),
            last_ms: now_ms,
        }
    }

    /// Create a timer that rings `first_after` from `now_ms`, then every
    /// `duration` after each reset
    pub fn with_first_ring(duration: Duration, first_after: Duration, now_ms: i64) -> Self {
        let duration_ms = millis(duration);
        Self {
            duration_ms,
            last_ms: now_ms
                .saturating_sub(duration_ms)
                .saturating_add(millis(first_after)),
        }
    }

    pub fn ringing(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.last_ms) >= self.duration_ms
    }

    pub fn reset(&mut self, now_ms: i64) {
        self.last_ms = now_ms;
    }

    /// Makes the next `ringing` check return true
    pub fn ring_manual(&mut self) {
        self.last_ms = i64::MIN / 2;
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms.max(0) as u64)
    }
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
