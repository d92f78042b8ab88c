//! # WY-Terminal Shared
//! Virtual game clock, timer and action data model, replicated state regions
//! and the broadcast wire protocol shared between wyterm-server &
//! wyterm-client.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod action;
mod backends;
mod clearance;
mod clock;
mod messages;
mod state;
mod timer;
mod token;
mod transport;
mod types;

pub use action::{Action, LogLevel};
pub use backends::{IntervalTimer, ManualWallClock, SystemWallClock, TimeError, WallClock};
pub use clearance::{effective_clearance, Clearance};
pub use clock::{
    adjustment::{format_game_time, format_wall_time, ClockAdjustment, DEFAULT_GAME_EPOCH_MS},
    duration::{
        format_countdown, format_duration, parse_duration, parse_positive_duration, DurationError,
    },
    virtual_clock::{ClockState, VirtualClock},
    DAY_MS, HOUR_MS, MINUTE_MS, SECOND_MS, WEEK_MS,
};
pub use messages::{
    broadcast_message::{BroadcastMessage, ResyncScope},
    error::MessageError,
    CHANNEL_NAME,
};
pub use state::{
    region::{Region, RegionError, RegionSnapshot},
    replicated_state::ReplicatedState,
    ship::{
        crew_status_class, default_nav_markers, system_status_class, CrewOverride, LogEntry,
        NavMarker, ShipSystem,
    },
};
pub use timer::{Timer, TimerCategory, TimerStatus, TimerUpdate, DEFAULT_TIMER_ID};
pub use token::TokenPosition;
pub use transport::{
    error::{IoError, TransportError},
    io::Io,
    MessageReceiver, MessageSender,
};
pub use types::{Role, SceneId, TimerId, TokenId, UserId};
