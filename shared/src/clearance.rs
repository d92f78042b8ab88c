use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Per-user access level.
///
/// `None` and `Crewmember` share rank 0: both mean "no special access".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Clearance {
    None,
    #[default]
    Crewmember,
    Medical,
    Captain,
    Corporate,
    #[serde(rename = "MASTER_OVERRIDE", alias = "MASTER")]
    Master,
}

impl Clearance {
    pub fn rank(self) -> u8 {
        match self {
            Clearance::None | Clearance::Crewmember => 0,
            Clearance::Medical => 1,
            Clearance::Captain => 2,
            Clearance::Corporate => 3,
            Clearance::Master => 4,
        }
    }

    /// Whether moving from `self` to `requested` is a strict raise
    pub fn is_raised_by(self, requested: Clearance) -> bool {
        requested.rank() > self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Clearance::None => "NONE",
            Clearance::Crewmember => "CREWMEMBER",
            Clearance::Medical => "MEDICAL",
            Clearance::Captain => "CAPTAIN",
            Clearance::Corporate => "CORPORATE",
            Clearance::Master => "MASTER_OVERRIDE",
        }
    }
}

impl fmt::Display for Clearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Clearance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Clearance::None),
            "CREWMEMBER" => Ok(Clearance::Crewmember),
            "MEDICAL" => Ok(Clearance::Medical),
            "CAPTAIN" => Ok(Clearance::Captain),
            "CORPORATE" => Ok(Clearance::Corporate),
            "MASTER" | "MASTER_OVERRIDE" => Ok(Clearance::Master),
            other => Err(format!("unknown clearance level '{}'", other)),
        }
    }
}

/// Clearance a user actually holds: the authority always holds `Master`,
/// everyone else holds their stored level, defaulting to `Crewmember`.
pub fn effective_clearance(
    clearances: &BTreeMap<String, Clearance>,
    user_id: &str,
    is_authority: bool,
) -> Clearance {
    if is_authority {
        return Clearance::Master;
    }
    clearances.get(user_id).copied().unwrap_or_default()
}
