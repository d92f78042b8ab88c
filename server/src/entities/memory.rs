use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use wyterm_shared::{SceneId, TokenId, TokenPosition, UserId};

use super::{EntityStore, EntityStoreError};

struct Token {
    position: TokenPosition,
    owners: Vec<UserId>,
}

type Scenes = BTreeMap<SceneId, BTreeMap<TokenId, Token>>;

/// In-memory scenes and tokens. Clones share state, so a test can keep a
/// handle and change the token set behind the authority's back.
#[derive(Clone, Default)]
pub struct MemoryEntityStore {
    scenes: Arc<Mutex<Scenes>>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn scenes(&self) -> Result<MutexGuard<'_, Scenes>, EntityStoreError> {
        self.scenes.lock().map_err(|_| EntityStoreError::Rejected {
            reason: "entity store lock poisoned".to_string(),
        })
    }

    pub fn add_scene(&self, scene_id: &str) {
        if let Ok(mut scenes) = self.scenes() {
            scenes.entry(scene_id.to_string()).or_default();
        }
    }

    /// Place a token, creating the scene if needed
    pub fn add_token(&self, scene_id: &str, token_id: &str, x: f64, y: f64, owners: &[&str]) {
        if let Ok(mut scenes) = self.scenes() {
            scenes.entry(scene_id.to_string()).or_default().insert(
                token_id.to_string(),
                Token {
                    position: TokenPosition::new(token_id, x, y),
                    owners: owners.iter().map(|owner| owner.to_string()).collect(),
                },
            );
        }
    }

    pub fn remove_token(&self, scene_id: &str, token_id: &str) -> bool {
        self.scenes()
            .ok()
            .and_then(|mut scenes| {
                scenes
                    .get_mut(scene_id)
                    .and_then(|tokens| tokens.remove(token_id))
            })
            .is_some()
    }

    pub fn position(&self, scene_id: &str, token_id: &str) -> Option<TokenPosition> {
        let scenes = self.scenes().ok()?;
        scenes
            .get(scene_id)
            .and_then(|tokens| tokens.get(token_id))
            .map(|token| token.position.clone())
    }
}

impl EntityStore for MemoryEntityStore {
    fn scene_tokens(&self, scene_id: &str) -> Option<Vec<TokenPosition>> {
        let scenes = self.scenes().ok()?;
        scenes
            .get(scene_id)
            .map(|tokens| tokens.values().map(|token| token.position.clone()).collect())
    }

    fn token_owners(&self, scene_id: &str, token_id: &str) -> Result<Vec<UserId>, EntityStoreError> {
        let scenes = self.scenes()?;
        let tokens = scenes
            .get(scene_id)
            .ok_or_else(|| EntityStoreError::UnknownScene {
                scene_id: scene_id.to_string(),
            })?;
        tokens
            .get(token_id)
            .map(|token| token.owners.clone())
            .ok_or_else(|| EntityStoreError::UnknownToken {
                scene_id: scene_id.to_string(),
                token_id: token_id.to_string(),
            })
    }

    fn update_position(
        &mut self,
        scene_id: &str,
        token_id: &str,
        x: f64,
        y: f64,
    ) -> Result<(), EntityStoreError> {
        let mut scenes = self.scenes()?;
        let tokens = scenes
            .get_mut(scene_id)
            .ok_or_else(|| EntityStoreError::UnknownScene {
                scene_id: scene_id.to_string(),
            })?;
        let token = tokens
            .get_mut(token_id)
            .ok_or_else(|| EntityStoreError::UnknownToken {
                scene_id: scene_id.to_string(),
                token_id: token_id.to_string(),
            })?;
        token.position.x = x;
        token.position.y = y;
        Ok(())
    }
}
