use std::collections::BTreeMap;

use log::{debug, error, warn};

use wyterm_shared::{
    crew_status_class, system_status_class, Clearance, CrewOverride, Region, RegionError,
    RegionSnapshot, ReplicatedState, ShipSystem, Timer, TimerStatus, UserId,
};

use crate::{
    persistence::{KeyValueStore, PersistenceError},
    store::{
        command_code::{CommandCode, COMMAND_CODES_KEY},
        mutation::{CrewField, Mutation},
        ChangeSet, StoreError,
    },
};

/// The authority's canonical copy of the replicated regions.
///
/// `apply` is the only way to change it: the mutation lands in memory, every
/// touched region is written to the key-value store under its own key, and
/// the touched regions are handed back for broadcast.
pub struct ReplicatedStateStore {
    namespace: String,
    kv: Box<dyn KeyValueStore>,
    state: ReplicatedState,
    command_codes: BTreeMap<UserId, CommandCode>,
    max_log_entries: usize,
}

impl ReplicatedStateStore {
    /// Load whatever was last durably written under `namespace`. Regions that
    /// were never written, or fail to decode, start from their defaults.
    pub fn load(
        kv: Box<dyn KeyValueStore>,
        namespace: &str,
        max_log_entries: usize,
    ) -> Result<Self, StoreError> {
        let mut state = ReplicatedState::default();
        for region in Region::ALL {
            let Some(value) = kv.get(namespace, region.name())? else {
                continue;
            };
            if let Err(err) = state.replace_region(region, value) {
                warn!("discarding unreadable persisted region: {}", err);
            }
        }

        let command_codes = match kv.get(namespace, COMMAND_CODES_KEY)? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                warn!("discarding unreadable command codes: {}", err);
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };

        debug!(
            "loaded {} timers, {} log entries from '{}'",
            state.timers.len(),
            state.logs.len(),
            namespace
        );

        Ok(Self {
            namespace: namespace.to_string(),
            kv,
            state,
            command_codes,
            max_log_entries,
        })
    }

    // Read

    pub fn state(&self) -> &ReplicatedState {
        &self.state
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn timer(&self, id: &str) -> Option<&Timer> {
        self.state.timer(id)
    }

    /// Stored clearance, ignoring the authority's implicit override
    pub fn clearance_of(&self, user_id: &str) -> Clearance {
        self.state
            .clearance_by_user
            .get(user_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn command_code(&self, user_id: &str) -> Option<&CommandCode> {
        self.command_codes.get(user_id)
    }

    pub fn snapshot(&self, region: Region) -> Result<RegionSnapshot, RegionError> {
        self.state.snapshot(region)
    }

    // Write

    /// Apply one mutation and persist the regions it touched.
    ///
    /// A mutation that would break an invariant of the canonical state either
    /// fails (`NotARaise`) or is a logged no-op returning an empty set. A
    /// persistence failure does not roll the in-memory copy back.
    pub fn apply(&mut self, mutation: Mutation) -> Result<ChangeSet, StoreError> {
        let name = mutation.name();
        let changes = self.mutate(mutation)?;
        if changes.is_empty() {
            debug!("{} changed nothing", name);
            return Ok(changes);
        }

        let mut failure: Option<PersistenceError> = None;
        for region in changes.regions() {
            if let Err(err) = self.persist(region) {
                error!("persisting {} after {} failed: {}", region, name, err);
                failure.get_or_insert(err);
            }
        }

        match failure {
            Some(source) => Err(StoreError::Unpersisted { changes, source }),
            None => Ok(changes),
        }
    }

    /// Store a player's command code. Codes are persisted but never replicated.
    pub fn register_command_code(
        &mut self,
        user_id: &str,
        code: CommandCode,
    ) -> Result<(), StoreError> {
        self.command_codes.insert(user_id.to_string(), code);
        let value =
            serde_json::to_value(&self.command_codes).map_err(|err| PersistenceError::WriteFailed {
                namespace: self.namespace.clone(),
                key: COMMAND_CODES_KEY.to_string(),
                reason: err.to_string(),
            })?;
        self.kv.set(&self.namespace, COMMAND_CODES_KEY, value)?;
        Ok(())
    }

    fn persist(&mut self, region: Region) -> Result<(), PersistenceError> {
        let value = self
            .state
            .region_value(region)
            .map_err(|err| PersistenceError::WriteFailed {
                namespace: self.namespace.clone(),
                key: region.name().to_string(),
                reason: err.to_string(),
            })?;
        self.kv.set(&self.namespace, region.name(), value)
    }

    fn mutate(&mut self, mutation: Mutation) -> Result<ChangeSet, StoreError> {
        let region = match mutation {
            Mutation::SetShipField { field, value } => {
                self.state.ship_status.insert(field, value);
                Region::ShipStatus
            }
            Mutation::SetSystemStatus {
                name,
                status,
                detail,
            } => {
                let name = name.to_ascii_uppercase();
                match self.state.systems.iter_mut().find(|s| s.name == name) {
                    Some(system) => {
                        system.status = status.to_ascii_uppercase();
                        system.status_class = system_status_class(&system.status).to_string();
                        if let Some(detail) = detail {
                            system.detail = detail;
                        }
                    }
                    None => self.state.systems.push(ShipSystem::new(
                        &name,
                        &status,
                        detail.as_deref().unwrap_or(""),
                    )),
                }
                Region::Systems
            }
            Mutation::SetCrewField { name, field, value } => {
                let name = name.to_ascii_uppercase();
                let index = match self.state.crew_overrides.iter().position(|c| c.name == name) {
                    Some(index) => index,
                    None => {
                        self.state.crew_overrides.push(CrewOverride {
                            name,
                            ..CrewOverride::default()
                        });
                        self.state.crew_overrides.len() - 1
                    }
                };
                let crew = &mut self.state.crew_overrides[index];
                match field {
                    CrewField::Location => crew.location = value,
                    CrewField::Task => crew.task = value,
                    CrewField::Status => {
                        let value = value.map(|status| status.to_ascii_uppercase());
                        crew.status_class = value
                            .as_deref()
                            .map(crew_status_class)
                            .unwrap_or_default()
                            .to_string();
                        crew.status = value;
                    }
                }
                Region::CrewOverrides
            }
            Mutation::AppendLog(mut entry) => {
                entry.sender = entry.sender.to_ascii_uppercase();
                entry.subject = entry.subject.to_ascii_uppercase();
                self.state.logs.insert(0, entry);
                self.state.logs.truncate(self.max_log_entries);
                Region::Logs
            }
            Mutation::MoveNavMarker { id, x, y } => {
                let Some(marker) = self.state.nav_markers.iter_mut().find(|m| m.id == id) else {
                    warn!("no nav marker '{}' to move", id);
                    return Ok(ChangeSet::new());
                };
                marker.x = clamp_unit(x);
                marker.y = clamp_unit(y);
                Region::NavMarkers
            }
            Mutation::SetNavProgress { id, progress } => {
                let Some(marker) = self.state.nav_markers.iter_mut().find(|m| m.id == id) else {
                    warn!("no nav marker '{}' to update", id);
                    return Ok(ChangeSet::new());
                };
                marker.progress = progress.map(clamp_unit);
                Region::NavMarkers
            }
            Mutation::ElevateClearance { user_id, level } => {
                let current = self.clearance_of(&user_id);
                if !current.is_raised_by(level) {
                    return Err(StoreError::NotARaise {
                        user_id,
                        current,
                        requested: level,
                    });
                }
                self.state.clearance_by_user.insert(user_id, level);
                Region::ClearanceByUser
            }
            Mutation::ResetClearance { user_id } => {
                if self.state.clearance_by_user.remove(&user_id).is_none() {
                    return Ok(ChangeSet::new());
                }
                Region::ClearanceByUser
            }
            Mutation::InsertTimer(timer) => {
                if self.state.timer(&timer.id).is_some() {
                    warn!("timer '{}' already exists, not inserting", timer.id);
                    return Ok(ChangeSet::new());
                }
                self.state.timers.push(timer);
                Region::Timers
            }
            Mutation::ReplaceTimer(mut timer) => {
                let Some(index) = self.state.timers.iter().position(|t| t.id == timer.id) else {
                    return Ok(ChangeSet::new());
                };
                let existing = &self.state.timers[index];
                if existing.permanent {
                    timer.permanent = true;
                    if timer.status == TimerStatus::Cancelled {
                        warn!("permanent timer '{}' cannot be cancelled", timer.id);
                        return Ok(ChangeSet::new());
                    }
                } else if existing.status.is_terminal() && !timer.status.is_terminal() {
                    warn!("timer '{}' is {:?} and cannot be reactivated", timer.id, existing.status);
                    return Ok(ChangeSet::new());
                }
                self.state.timers[index] = timer;
                Region::Timers
            }
            Mutation::RemoveTimer { id } => {
                let Some(index) = self.state.timers.iter().position(|t| t.id == id) else {
                    return Ok(ChangeSet::new());
                };
                if self.state.timers[index].permanent {
                    warn!("permanent timer '{}' cannot be deleted", id);
                    return Ok(ChangeSet::new());
                }
                self.state.timers.remove(index);
                Region::Timers
            }
            Mutation::SetClock(clock) => {
                self.state.game_clock = Some(clock);
                Region::GameClock
            }
        };
        Ok(ChangeSet::of(region))
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
