mod engine;
mod tick_report;

pub use engine::EventTimerEngine;
pub use tick_report::{TickReport, TimerCompletion};
