use serde_json::Value;

use wyterm_shared::{ClockState, Clearance, LogEntry, Timer, TimerId, UserId};

/// Editable fields of a crew override
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrewField {
    Location,
    Status,
    Task,
}

impl CrewField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "location" => Some(Self::Location),
            "status" => Some(Self::Status),
            "task" => Some(Self::Task),
            _ => None,
        }
    }
}

/// One change to the canonical state. Every write goes through
/// `ReplicatedStateStore::apply`.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    SetShipField {
        field: String,
        value: Value,
    },
    SetSystemStatus {
        name: String,
        status: String,
        detail: Option<String>,
    },
    SetCrewField {
        name: String,
        field: CrewField,
        value: Option<String>,
    },
    AppendLog(LogEntry),
    MoveNavMarker {
        id: String,
        x: f64,
        y: f64,
    },
    SetNavProgress {
        id: String,
        progress: Option<f64>,
    },
    ElevateClearance {
        user_id: UserId,
        level: Clearance,
    },
    ResetClearance {
        user_id: UserId,
    },
    InsertTimer(Timer),
    ReplaceTimer(Timer),
    RemoveTimer {
        id: TimerId,
    },
    SetClock(ClockState),
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetShipField { .. } => "setShipField",
            Mutation::SetSystemStatus { .. } => "setSystemStatus",
            Mutation::SetCrewField { .. } => "setCrewField",
            Mutation::AppendLog(_) => "appendLog",
            Mutation::MoveNavMarker { .. } => "moveNavMarker",
            Mutation::SetNavProgress { .. } => "setNavProgress",
            Mutation::ElevateClearance { .. } => "elevateClearance",
            Mutation::ResetClearance { .. } => "resetClearance",
            Mutation::InsertTimer(_) => "insertTimer",
            Mutation::ReplaceTimer(_) => "replaceTimer",
            Mutation::RemoveTimer { .. } => "removeTimer",
            Mutation::SetClock(_) => "setClock",
        }
    }
}
