use std::sync::atomic::{AtomicI64, Ordering};
use std::time::SystemTime;

/// Error type for wall clock reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    /// System time is before UNIX epoch
    SystemTimeBeforeEpoch,
}

impl std::fmt::Display for TimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeError::SystemTimeBeforeEpoch => {
                write!(f, "System time is before UNIX epoch")
            }
        }
    }
}

impl std::error::Error for TimeError {}

/// Source of real-world time, in milliseconds since UNIX epoch.
///
/// Every component that needs "now" takes one of these instead of reading
/// `SystemTime` directly, so the virtual clock, the scheduler heartbeat and
/// replica debouncing can all be driven deterministically in tests.
pub trait WallClock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Reads the operating system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemWallClock;

impl SystemWallClock {
    /// Returns the current timestamp in milliseconds since UNIX epoch.
    ///
    /// # Errors
    /// Returns `TimeError::SystemTimeBeforeEpoch` if system time is before UNIX epoch.
    pub fn try_now_ms() -> Result<i64, TimeError> {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .map_err(|_| TimeError::SystemTimeBeforeEpoch)
    }
}

impl WallClock for SystemWallClock {
    fn now_ms(&self) -> i64 {
        // A host clock set before 1970 is treated as the epoch itself; the
        // virtual clock clamps negative elapsed time so this cannot rewind it.
        Self::try_now_ms().unwrap_or(0)
    }
}

/// A wall clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualWallClock {
    now_ms: AtomicI64,
}

impl ManualWallClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl WallClock for ManualWallClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
