//! The host's document store for scenes and tokens, as far as the authority
//! needs it: positions, ownership and position updates.

mod memory;

pub use memory::MemoryEntityStore;

use thiserror::Error;

use wyterm_shared::{TokenPosition, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityStoreError {
    #[error("Unknown scene '{scene_id}'")]
    UnknownScene { scene_id: String },

    #[error("Unknown token '{token_id}' on scene '{scene_id}'")]
    UnknownToken { scene_id: String, token_id: String },

    #[error("Entity store rejected the update: {reason}")]
    Rejected { reason: String },
}

pub trait EntityStore: Send {
    /// Every token on a scene, or `None` for an unknown scene
    fn scene_tokens(&self, scene_id: &str) -> Option<Vec<TokenPosition>>;

    /// Users allowed to move a token
    fn token_owners(&self, scene_id: &str, token_id: &str) -> Result<Vec<UserId>, EntityStoreError>;

    fn update_position(
        &mut self,
        scene_id: &str,
        token_id: &str,
        x: f64,
        y: f64,
    ) -> Result<(), EntityStoreError>;
}
