use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    clearance::Clearance,
    messages::error::MessageError,
    state::region::{Region, RegionSnapshot},
    token::TokenPosition,
    types::{Role, SceneId, TokenId, UserId},
};

/// What a replica wants re-sent in full
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "camelCase")]
pub enum ResyncScope {
    All,
    Region(Region),
    Scene(SceneId),
}

/// Everything that travels over the broadcast channel.
///
/// Encoded as `{ "type": <variant>, "payload": {...} }`. Authority-originated
/// variants carry full values, never diffs, so duplicates and reordering are
/// harmless for coarse regions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BroadcastMessage {
    /// Authority -> replicas: replace one region wholesale
    #[serde(rename_all = "camelCase")]
    StateDelta { region: Region, value: Value },

    /// Authority -> replicas: several wholesale replacements published as one
    /// notification (one per scheduler tick)
    #[serde(rename_all = "camelCase")]
    StateBatch { deltas: Vec<RegionSnapshot> },

    /// Authority -> replicas: authoritative positions of every token on a
    /// scene. `resync` marks an answer to a resync request, which replicas
    /// apply even when the token set changed.
    #[serde(rename_all = "camelCase")]
    TokenPositionUpdate {
        scene_id: SceneId,
        tokens: Vec<TokenPosition>,
        #[serde(default)]
        resync: bool,
    },

    /// Replica -> authority: an optimistic local move to make authoritative
    #[serde(rename_all = "camelCase")]
    TokenMoveRequest {
        user_id: UserId,
        scene_id: SceneId,
        token_id: TokenId,
        x: f64,
        y: f64,
    },

    /// Replica -> authority: raise the sender's clearance
    #[serde(rename_all = "camelCase")]
    ElevationRequest {
        user_id: UserId,
        requested_level: Clearance,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        command_code: Option<String>,
    },

    /// Authority -> requester: an elevation request was refused
    #[serde(rename_all = "camelCase")]
    ElevationDenied {
        user_id: UserId,
        requested_level: Clearance,
        reason: String,
    },

    /// Replica -> authority: re-send the given scope in full
    #[serde(rename_all = "camelCase")]
    FullResyncRequest { user_id: UserId, scope: ResyncScope },

    /// Authority -> replicas: show an alert banner
    #[serde(rename_all = "camelCase")]
    Alert { message: String },

    /// Authority -> replicas: the narrator switched the active scene
    #[serde(rename_all = "camelCase")]
    SceneChange { scene_id: SceneId },
}

impl BroadcastMessage {
    pub fn message_type(&self) -> &'static str {
        match self {
            BroadcastMessage::StateDelta { .. } => "stateDelta",
            BroadcastMessage::StateBatch { .. } => "stateBatch",
            BroadcastMessage::TokenPositionUpdate { .. } => "tokenPositionUpdate",
            BroadcastMessage::TokenMoveRequest { .. } => "tokenMoveRequest",
            BroadcastMessage::ElevationRequest { .. } => "elevationRequest",
            BroadcastMessage::ElevationDenied { .. } => "elevationDenied",
            BroadcastMessage::FullResyncRequest { .. } => "fullResyncRequest",
            BroadcastMessage::Alert { .. } => "alert",
            BroadcastMessage::SceneChange { .. } => "sceneChange",
        }
    }

    pub fn state_delta(snapshot: RegionSnapshot) -> Self {
        BroadcastMessage::StateDelta {
            region: snapshot.region,
            value: snapshot.value,
        }
    }

    /// Whether only the authority should ever send this message
    pub fn is_authoritative(&self) -> bool {
        !matches!(
            self,
            BroadcastMessage::TokenMoveRequest { .. }
                | BroadcastMessage::ElevationRequest { .. }
                | BroadcastMessage::FullResyncRequest { .. }
        )
    }

    /// Whether a process playing `role` should act on this message.
    /// Replicas ignore requests; the authority ignores its own broadcasts.
    pub fn is_for(&self, role: Role) -> bool {
        match role {
            Role::Authority => !self.is_authoritative(),
            Role::Replica => self.is_authoritative(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        serde_json::to_vec(self).map_err(|source| MessageError::Encode {
            message_type: self.message_type(),
            source,
        })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        serde_json::from_slice(bytes).map_err(|source| MessageError::Decode {
            len: bytes.len(),
            source,
        })
    }
}
