use std::{default::Default, time::Duration};

use wyterm_shared::DEFAULT_GAME_EPOCH_MS;

/// Contains Config properties which will be used by the AuthorityServer
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Real-world period of the timer scheduler
    pub tick_interval: Duration,
    /// Delay before the catch-up tick that follows a (re)start
    pub startup_catch_up_delay: Duration,
    /// Wall time a tick may spend on actions before deferring the rest
    pub action_budget: Duration,
    /// Game milliseconds per real millisecond, for a freshly created clock
    pub acceleration: f64,
    /// Game time a freshly created clock starts at
    pub default_epoch_ms: i64,
    /// Whether a freshly created clock waits for the narrator to start it
    pub clock_starts_paused: bool,
    pub max_log_entries: usize,
    pub permanent_timer_label: String,
    pub permanent_timer_duration: String,
    /// Whether clearance requests must quote a registered command code
    pub require_command_code: bool,
    /// The user that runs the authority. Always holds MASTER_OVERRIDE.
    pub authority_user_id: String,
    /// Key-value namespace the regions are persisted under
    pub namespace: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(10),
            startup_catch_up_delay: Duration::from_secs(1),
            action_budget: Duration::from_secs(2),
            acceleration: 10.0,
            default_epoch_ms: DEFAULT_GAME_EPOCH_MS,
            clock_starts_paused: true,
            max_log_entries: 200,
            permanent_timer_label: "NEXT CHECKPOINT".to_string(),
            permanent_timer_duration: "14 days".to_string(),
            require_command_code: false,
            authority_user_id: "gamemaster".to_string(),
            namespace: "wy-terminal".to_string(),
        }
    }
}
