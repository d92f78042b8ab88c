use std::collections::BTreeMap;

use wyterm_shared::{SceneId, TokenId, TokenPosition};

/// A local token move the authority has not echoed yet
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OptimisticMove {
    pub target: TokenPosition,
    /// Last position the authority confirmed, restored on timeout
    pub confirmed: TokenPosition,
    pub sent_ms: i64,
}

pub(crate) struct OptimisticMoves {
    timeout_ms: i64,
    moves: BTreeMap<(SceneId, TokenId), OptimisticMove>,
}

impl OptimisticMoves {
    pub fn new(timeout_ms: i64) -> Self {
        Self {
            timeout_ms,
            moves: BTreeMap::new(),
        }
    }

    /// Record a move. A second move of the same token keeps the first
    /// move's confirmed position.
    pub fn record(&mut self, scene_id: &str, target: TokenPosition, confirmed: TokenPosition, now_ms: i64) {
        let key = (scene_id.to_string(), target.id.clone());
        let confirmed = self
            .moves
            .get(&key)
            .map(|pending| pending.confirmed.clone())
            .unwrap_or(confirmed);
        self.moves.insert(
            key,
            OptimisticMove {
                target,
                confirmed,
                sent_ms: now_ms,
            },
        );
    }

    pub fn get(&self, scene_id: &str, token_id: &str) -> Option<&OptimisticMove> {
        self.moves.get(&(scene_id.to_string(), token_id.to_string()))
    }

    pub fn confirm(&mut self, scene_id: &str, token_id: &str) -> Option<OptimisticMove> {
        self.moves.remove(&(scene_id.to_string(), token_id.to_string()))
    }

    pub fn clear_scene(&mut self, scene_id: &str) {
        self.moves.retain(|(scene, _), _| scene != scene_id);
    }

    /// Moves that have waited too long, removed from tracking
    pub fn take_expired(&mut self, now_ms: i64) -> Vec<(SceneId, OptimisticMove)> {
        let expired: Vec<(SceneId, TokenId)> = self
            .moves
            .iter()
            .filter(|(_, pending)| now_ms.saturating_sub(pending.sent_ms) >= self.timeout_ms)
            .map(|(key, _)| key.clone())
            .collect();
        expired
            .into_iter()
            .filter_map(|key| {
                let scene_id = key.0.clone();
                self.moves.remove(&key).map(|pending| (scene_id, pending))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
