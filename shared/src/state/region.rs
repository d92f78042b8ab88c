use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    ShipStatus,
    Systems,
    CrewOverrides,
    Logs,
    NavMarkers,
    ClearanceByUser,
    Timers,
    GameClock,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::ShipStatus,
        Region::Systems,
        Region::CrewOverrides,
        Region::Logs,
        Region::NavMarkers,
        Region::ClearanceByUser,
        Region::Timers,
        Region::GameClock,
    ];

    /// Name used on the wire and as the persistence key
    pub fn name(self) -> &'static str {
        match self {
            Region::ShipStatus => "shipStatus",
            Region::Systems => "systems",
            Region::CrewOverrides => "crewOverrides",
            Region::Logs => "logs",
            Region::NavMarkers => "navMarkers",
            Region::ClearanceByUser => "clearanceByUser",
            Region::Timers => "timers",
            Region::GameClock => "gameClock",
        }
    }

    pub fn from_name(name: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|region| region.name() == name)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A region's full value at one point in time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub region: Region,
    pub value: Value,
}

/// A region value could not be converted to or from its typed form
#[derive(Debug, Error)]
#[error("Region {region} has an unexpected shape: {source}")]
pub struct RegionError {
    pub region: Region,
    #[source]
    pub source: serde_json::Error,
}
