use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a log entry, as rendered by the terminal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    #[default]
    Normal,
    Warning,
    Critical,
}

/// Something to do when a timer fires.
///
/// Plain data rather than closures, so actions persist with their timer and
/// can be logged or replayed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Set one field. `target` is `shipStatus` or `crew:<NAME>`.
    #[serde(rename_all = "camelCase")]
    SetField {
        target: String,
        field: String,
        value: Value,
    },
    #[serde(rename_all = "camelCase")]
    AppendLogEntry {
        sender: String,
        subject: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        level: LogLevel,
        #[serde(default)]
        classification: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SetSystemStatus {
        system_name: String,
        status: String,
        #[serde(default)]
        detail: Option<String>,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetField { .. } => "SetField",
            Action::AppendLogEntry { .. } => "AppendLogEntry",
            Action::SetSystemStatus { .. } => "SetSystemStatus",
        }
    }

    pub fn log_entry(sender: &str, subject: &str, detail: &str, level: LogLevel) -> Self {
        Action::AppendLogEntry {
            sender: sender.to_string(),
            subject: subject.to_string(),
            detail: detail.to_string(),
            level,
            classification: None,
        }
    }
}
