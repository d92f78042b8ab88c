use serde::{Deserialize, Serialize};

use crate::action::LogLevel;

/// Display class for a ship system's status text
pub fn system_status_class(status: &str) -> &'static str {
    match status.to_ascii_uppercase().as_str() {
        "ONLINE" | "NOMINAL" => "online",
        "WARNING" | "DEGRADED" => "warning",
        "OFFLINE" | "CRITICAL" | "DESTROYED" => "critical",
        _ => "offline",
    }
}

/// Display class for a crew member's status text
pub fn crew_status_class(status: &str) -> &'static str {
    match status.to_ascii_uppercase().as_str() {
        "ACTIVE" | "ALIVE" => "online",
        "INJURED" | "STRESSED" => "warning",
        "CRITICAL" | "DEAD" | "MIA" => "critical",
        _ => "offline",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipSystem {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub status_class: String,
}

impl ShipSystem {
    pub fn new(name: &str, status: &str, detail: &str) -> Self {
        let status = status.to_ascii_uppercase();
        Self {
            name: name.to_ascii_uppercase(),
            status_class: system_status_class(&status).to_string(),
            status,
            detail: detail.to_string(),
        }
    }
}

/// Narrator-set overrides layered over a crew member's sheet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewOverride {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default)]
    pub status_class: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Game time of the entry, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub sender: String,
    pub subject: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

/// A point on the navigation chart, in normalized [0, 1] coordinates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavMarker {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl NavMarker {
    fn new(id: &str, label: &str, kind: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: kind.to_string(),
            x,
            y,
            progress: None,
        }
    }
}

/// Chart a fresh campaign starts with
pub fn default_nav_markers() -> Vec<NavMarker> {
    let mut player = NavMarker::new("DEFAULT_PLAYER", "USCSS MONTERO", "PLAYER", 0.569025, 0.37695);
    player.progress = Some(0.0);
    vec![
        NavMarker::new("DEFAULT_DEPARTURE", "ANCHORPOINT STATION", "DEPARTURE", 0.569025, 0.37695),
        NavMarker::new("DEFAULT_WAYPOINT", "COURSE CHANGE", "WAYPOINT", 0.344688, 0.504533),
        NavMarker::new("DEFAULT_DESTINATION", "UNKNOWN SIGNAL", "DESTINATION", 0.250803, 0.388964),
        NavMarker::new("DEFAULT_PLANET", "SUTTERS WORLD", "PLANET", 0.207719, 0.560158),
        player,
    ]
}
