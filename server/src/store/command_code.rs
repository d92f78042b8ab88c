use serde::{Deserialize, Serialize};

use wyterm_shared::Clearance;

/// Storage key for registered command codes. Never replicated.
pub const COMMAND_CODES_KEY: &str = "userCommandCodes";

/// A ten-digit code a player must quote to raise their clearance, and the
/// highest level it unlocks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandCode {
    pub code: String,
    pub role: Clearance,
}

impl CommandCode {
    pub fn new(code: &str, role: Clearance) -> Self {
        Self {
            code: code.to_string(),
            role,
        }
    }

    /// Does `quoted` unlock `requested`?
    pub fn unlocks(&self, quoted: &str, requested: Clearance) -> bool {
        self.code == quoted.trim() && self.role.rank() >= requested.rank()
    }
}

/// Fresh ten-digit code, leading zeros allowed
pub fn generate_command_code() -> String {
    (0..10)
        .map(|_| char::from(b'0' + fastrand::u8(0..10)))
        .collect()
}
