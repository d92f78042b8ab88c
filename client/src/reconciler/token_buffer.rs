use std::collections::BTreeMap;

use wyterm_shared::{SceneId, TokenPosition};

struct Buffered {
    tokens: Vec<TokenPosition>,
    first_seen_ms: i64,
}

/// Coalesces bursts of token updates per scene. Each update is a full scene
/// snapshot, so the latest one replaces whatever was buffered; the window
/// starts at the first update of a burst.
pub(crate) struct TokenUpdateBuffer {
    window_ms: i64,
    scenes: BTreeMap<SceneId, Buffered>,
}

impl TokenUpdateBuffer {
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms,
            scenes: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, scene_id: SceneId, tokens: Vec<TokenPosition>, now_ms: i64) {
        self.scenes
            .entry(scene_id)
            .and_modify(|buffered| buffered.tokens = tokens.clone())
            .or_insert(Buffered {
                tokens,
                first_seen_ms: now_ms,
            });
    }

    /// Drop anything buffered for a scene, e.g. after a wholesale resync
    pub fn discard(&mut self, scene_id: &str) {
        self.scenes.remove(scene_id);
    }

    /// Scenes whose window has closed, with their latest snapshot
    pub fn take_due(&mut self, now_ms: i64) -> Vec<(SceneId, Vec<TokenPosition>)> {
        let due: Vec<SceneId> = self
            .scenes
            .iter()
            .filter(|(_, buffered)| now_ms.saturating_sub(buffered.first_seen_ms) >= self.window_ms)
            .map(|(scene_id, _)| scene_id.clone())
            .collect();
        due.into_iter()
            .filter_map(|scene_id| {
                self.scenes
                    .remove(&scene_id)
                    .map(|buffered| (scene_id, buffered.tokens))
            })
            .collect()
    }
}
