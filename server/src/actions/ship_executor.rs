use log::debug;
use serde_json::Value;

use wyterm_shared::{format_game_time, Action, LogEntry};

use crate::{
    actions::{ActionError, ActionExecutor},
    store::{ChangeSet, CrewField, Mutation, ReplicatedStateStore},
};

const SHIP_STATUS_TARGET: &str = "shipStatus";
const CREW_TARGET_PREFIX: &str = "crew:";

/// Default executor for the three built-in action kinds
#[derive(Default)]
pub struct ShipActionExecutor;

impl ShipActionExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ActionExecutor for ShipActionExecutor {
    fn execute(
        &mut self,
        store: &mut ReplicatedStateStore,
        action: &Action,
        game_now_ms: i64,
    ) -> Result<ChangeSet, ActionError> {
        debug!("executing {} action", action.name());
        let mutation = match action {
            Action::SetField {
                target,
                field,
                value,
            } => set_field_mutation(target, field, value)?,
            Action::AppendLogEntry {
                sender,
                subject,
                detail,
                level,
                classification,
            } => Mutation::AppendLog(LogEntry {
                timestamp: format_game_time(game_now_ms),
                sender: sender.clone(),
                subject: subject.clone(),
                detail: detail.clone(),
                level: *level,
                classification: classification.clone(),
            }),
            Action::SetSystemStatus {
                system_name,
                status,
                detail,
            } => Mutation::SetSystemStatus {
                name: system_name.clone(),
                status: status.clone(),
                detail: detail.clone(),
            },
        };
        Ok(store.apply(mutation)?)
    }
}

fn set_field_mutation(target: &str, field: &str, value: &Value) -> Result<Mutation, ActionError> {
    if target == SHIP_STATUS_TARGET {
        return Ok(Mutation::SetShipField {
            field: field.to_string(),
            value: value.clone(),
        });
    }

    let Some(name) = target.strip_prefix(CREW_TARGET_PREFIX).filter(|n| !n.is_empty()) else {
        return Err(ActionError::UnknownTarget {
            target: target.to_string(),
        });
    };
    let Some(crew_field) = CrewField::from_name(field) else {
        return Err(ActionError::UnknownCrewField {
            field: field.to_string(),
        });
    };
    let value = match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    };
    Ok(Mutation::SetCrewField {
        name: name.to_string(),
        field: crew_field,
        value,
    })
}
