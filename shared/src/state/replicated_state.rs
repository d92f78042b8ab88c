use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    clearance::Clearance,
    clock::virtual_clock::ClockState,
    state::{
        region::{Region, RegionError, RegionSnapshot},
        ship::{default_nav_markers, CrewOverride, LogEntry, NavMarker, ShipSystem},
    },
    timer::Timer,
    types::UserId,
};

/// Every replicated region, typed.
///
/// The authority owns the canonical instance; each replica owns a shadow
/// instance that is only ever written through [`ReplicatedState::replace_region`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicatedState {
    pub ship_status: Map<String, Value>,
    pub systems: Vec<ShipSystem>,
    pub crew_overrides: Vec<CrewOverride>,
    pub logs: Vec<LogEntry>,
    pub nav_markers: Vec<NavMarker>,
    pub clearance_by_user: BTreeMap<UserId, Clearance>,
    pub timers: Vec<Timer>,
    pub game_clock: Option<ClockState>,
}

impl Default for ReplicatedState {
    fn default() -> Self {
        Self {
            ship_status: Map::new(),
            systems: Vec::new(),
            crew_overrides: Vec::new(),
            logs: Vec::new(),
            nav_markers: default_nav_markers(),
            clearance_by_user: BTreeMap::new(),
            timers: Vec::new(),
            game_clock: None,
        }
    }
}

impl ReplicatedState {
    pub fn region_value(&self, region: Region) -> Result<Value, RegionError> {
        let result = match region {
            Region::ShipStatus => Ok(Value::Object(self.ship_status.clone())),
            Region::Systems => serde_json::to_value(&self.systems),
            Region::CrewOverrides => serde_json::to_value(&self.crew_overrides),
            Region::Logs => serde_json::to_value(&self.logs),
            Region::NavMarkers => serde_json::to_value(&self.nav_markers),
            Region::ClearanceByUser => serde_json::to_value(&self.clearance_by_user),
            Region::Timers => serde_json::to_value(&self.timers),
            Region::GameClock => serde_json::to_value(self.game_clock),
        };
        result.map_err(|source| RegionError { region, source })
    }

    pub fn snapshot(&self, region: Region) -> Result<RegionSnapshot, RegionError> {
        Ok(RegionSnapshot {
            region,
            value: self.region_value(region)?,
        })
    }

    /// Replace one region wholesale.
    ///
    /// The value is fully decoded before anything is written, so a malformed
    /// value leaves the region as it was.
    pub fn replace_region(&mut self, region: Region, value: Value) -> Result<(), RegionError> {
        match region {
            Region::ShipStatus => self.ship_status = decode(region, value)?,
            Region::Systems => self.systems = decode(region, value)?,
            Region::CrewOverrides => self.crew_overrides = decode(region, value)?,
            Region::Logs => self.logs = decode(region, value)?,
            Region::NavMarkers => self.nav_markers = decode(region, value)?,
            Region::ClearanceByUser => self.clearance_by_user = decode(region, value)?,
            Region::Timers => self.timers = decode(region, value)?,
            Region::GameClock => self.game_clock = decode(region, value)?,
        }
        Ok(())
    }

    pub fn timer(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|timer| timer.id == id)
    }

    pub fn system(&self, name: &str) -> Option<&ShipSystem> {
        let name = name.to_ascii_uppercase();
        self.systems.iter().find(|system| system.name == name)
    }
}

fn decode<T: DeserializeOwned>(region: Region, value: Value) -> Result<T, RegionError> {
    serde_json::from_value(value).map_err(|source| RegionError { region, source })
}
