use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
    time::Duration,
};

use log::{debug, info, warn};
use serde_json::Value;

use wyterm_shared::{
    effective_clearance, format_countdown, BroadcastMessage, Clearance, Io, IoError,
    MessageReceiver, MessageSender, Region, RegionSnapshot, ReplicatedState, ResyncScope, Role,
    SceneId, TokenId, TokenPosition, UserId, VirtualClock, WallClock,
};

use crate::{
    client_config::ClientConfig,
    error::ReplicaError,
    events::{ElevationDenial, ReplicaEvents, TokensMoved},
    reconciler::{optimistic::OptimisticMoves, token_buffer::TokenUpdateBuffer},
};

type SceneTokens = BTreeMap<TokenId, TokenPosition>;

/// A replica's shadow of the authority's state.
///
/// Region messages replace the local copy wholesale. Token updates are
/// debounced per scene, then patched in place only when the token set is
/// unchanged; a structural difference schedules a scene resync instead.
/// Call [`ReplicaReconciler::receive`] from the host's update loop.
pub struct ReplicaReconciler {
    config: ClientConfig,
    user_id: UserId,
    wall: Arc<dyn WallClock>,
    io: Io,
    state: ReplicatedState,
    scenes: HashMap<SceneId, SceneTokens>,
    active_scene: Option<SceneId>,
    buffer: TokenUpdateBuffer,
    pending_moves: OptimisticMoves,
    /// Scene resyncs waiting for their settle delay, by due time
    scheduled_resyncs: BTreeMap<SceneId, i64>,
    incoming_events: ReplicaEvents,
}

impl ReplicaReconciler {
    pub fn new(config: ClientConfig, user_id: &str, wall: Arc<dyn WallClock>) -> Self {
        let buffer = TokenUpdateBuffer::new(millis(config.debounce));
        let pending_moves = OptimisticMoves::new(millis(config.optimistic_timeout));
        Self {
            config,
            user_id: user_id.to_string(),
            wall,
            io: Io::new(),
            state: ReplicatedState::default(),
            scenes: HashMap::new(),
            active_scene: None,
            buffer,
            pending_moves,
            scheduled_resyncs: BTreeMap::new(),
            incoming_events: ReplicaEvents::new(),
        }
    }

    /// Attach the broadcast channel and ask the authority for everything
    pub fn connect(
        &mut self,
        sender: Box<dyn MessageSender>,
        receiver: Box<dyn MessageReceiver>,
    ) -> Result<(), ReplicaError> {
        self.io.load(sender, receiver);
        self.request_resync(ResyncScope::All)
    }

    pub fn is_connected(&self) -> bool {
        self.io.is_loaded()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Apply everything that arrived, then flush debounced token updates,
    /// send settled resync requests and revert stale optimistic moves
    pub fn receive(&mut self) -> ReplicaEvents {
        self.receive_messages();

        let now = self.wall.now_ms();
        for (scene_id, tokens) in self.buffer.take_due(now) {
            self.reconcile_scene(scene_id, tokens);
        }
        self.expire_optimistic_moves(now);
        self.send_due_resyncs(now);

        self.incoming_events.take()
    }

    // State

    pub fn state(&self) -> &ReplicatedState {
        &self.state
    }

    /// This replica's clearance as the authority last replicated it
    pub fn clearance(&self) -> Clearance {
        effective_clearance(&self.state.clearance_by_user, &self.user_id, false)
    }

    /// Current game time, computed locally from the replicated clock
    pub fn game_time(&self) -> Option<i64> {
        self.state
            .game_clock
            .map(|clock| VirtualClock::from_state(clock, self.wall.clone()).now())
    }

    /// Time left on a timer as `HH:MM:SS`
    pub fn countdown(&self, timer_id: &str) -> Option<String> {
        let now = self.game_time()?;
        self.state
            .timer(timer_id)
            .map(|timer| format_countdown(timer.remaining_ms(now)))
    }

    pub fn active_scene(&self) -> Option<&str> {
        self.active_scene.as_deref()
    }

    pub fn scene_tokens(&self, scene_id: &str) -> Option<Vec<TokenPosition>> {
        self.scenes
            .get(scene_id)
            .map(|tokens| tokens.values().cloned().collect())
    }

    pub fn token(&self, scene_id: &str, token_id: &str) -> Option<&TokenPosition> {
        self.scenes.get(scene_id).and_then(|tokens| tokens.get(token_id))
    }

    pub fn has_pending_moves(&self) -> bool {
        !self.pending_moves.is_empty()
    }

    // Requests

    /// Move a token locally right away and ask the authority to make it
    /// authoritative. Reverted if not echoed within the optimistic timeout.
    pub fn move_token(
        &mut self,
        scene_id: &str,
        token_id: &str,
        x: f64,
        y: f64,
    ) -> Result<(), ReplicaError> {
        let Some(token) = self
            .scenes
            .get_mut(scene_id)
            .and_then(|tokens| tokens.get_mut(token_id))
        else {
            return Err(ReplicaError::UnknownToken {
                scene_id: scene_id.to_string(),
                token_id: token_id.to_string(),
            });
        };
        let confirmed = token.clone();
        token.x = x;
        token.y = y;
        let target = token.clone();

        self.pending_moves
            .record(scene_id, target, confirmed, self.wall.now_ms());
        self.io.send(&BroadcastMessage::TokenMoveRequest {
            user_id: self.user_id.clone(),
            scene_id: scene_id.to_string(),
            token_id: token_id.to_string(),
            x,
            y,
        })?;
        Ok(())
    }

    pub fn request_elevation(
        &mut self,
        level: Clearance,
        command_code: Option<&str>,
    ) -> Result<(), ReplicaError> {
        info!("requesting {} clearance", level);
        self.io.send(&BroadcastMessage::ElevationRequest {
            user_id: self.user_id.clone(),
            requested_level: level,
            command_code: command_code.map(str::to_string),
        })?;
        Ok(())
    }

    pub fn request_resync(&mut self, scope: ResyncScope) -> Result<(), ReplicaError> {
        debug!("requesting {:?} resync", scope);
        if let ResyncScope::Scene(scene_id) = &scope {
            self.scheduled_resyncs.remove(scene_id);
        }
        self.io.send(&BroadcastMessage::FullResyncRequest {
            user_id: self.user_id.clone(),
            scope: scope.clone(),
        })?;
        self.incoming_events.push_resync(scope);
        Ok(())
    }

    // Receiving

    fn receive_messages(&mut self) {
        loop {
            match self.io.recv() {
                Ok(Some(payload)) => self.handle_payload(&payload),
                Ok(None) | Err(IoError::NotLoaded) => break,
                Err(err) => {
                    warn!("broadcast channel receive failed: {}", err);
                    self.incoming_events.push_error(err.into());
                    break;
                }
            }
        }
    }

    fn handle_payload(&mut self, payload: &[u8]) {
        let message = match BroadcastMessage::decode(payload) {
            Ok(message) => message,
            Err(err) => {
                warn!("cannot read malformed message, resyncing: {}", err);
                self.incoming_events.push_error(err.into());
                self.send_resync(ResyncScope::All);
                return;
            }
        };

        if !message.is_for(Role::Replica) {
            return;
        }

        match message {
            BroadcastMessage::StateDelta { region, value } => self.apply_region(region, value),
            BroadcastMessage::StateBatch { deltas } => {
                for RegionSnapshot { region, value } in deltas {
                    self.apply_region(region, value);
                }
            }
            BroadcastMessage::TokenPositionUpdate {
                scene_id,
                tokens,
                resync,
            } => {
                if resync {
                    self.replace_scene(scene_id, tokens);
                } else {
                    self.buffer.push(scene_id, tokens, self.wall.now_ms());
                }
            }
            BroadcastMessage::ElevationDenied {
                user_id,
                requested_level,
                reason,
            } => {
                if user_id == self.user_id {
                    info!("clearance request for {} denied: {}", requested_level, reason);
                    self.incoming_events.push_denial(ElevationDenial {
                        requested: requested_level,
                        reason,
                    });
                }
            }
            BroadcastMessage::Alert { message } => self.incoming_events.push_alert(message),
            BroadcastMessage::SceneChange { scene_id } => {
                self.active_scene = Some(scene_id.clone());
                self.incoming_events.push_scene_change(scene_id);
            }
            other => debug!("ignoring {} on a replica", other.message_type()),
        }
    }

    fn apply_region(&mut self, region: Region, value: Value) {
        match self.state.replace_region(region, value) {
            Ok(()) => self.incoming_events.push_region(region),
            Err(err) => {
                warn!("cannot apply {} update, resyncing: {}", region, err);
                self.incoming_events.push_error(err.into());
                self.send_resync(ResyncScope::Region(region));
            }
        }
    }

    // Tokens

    /// Take an authoritative scene snapshot as-is
    fn replace_scene(&mut self, scene_id: SceneId, tokens: Vec<TokenPosition>) {
        debug!("replacing scene '{}' with {} tokens", scene_id, tokens.len());
        self.buffer.discard(&scene_id);
        self.scheduled_resyncs.remove(&scene_id);
        self.pending_moves.clear_scene(&scene_id);

        let token_ids = tokens.iter().map(|token| token.id.clone()).collect();
        let tokens = tokens
            .into_iter()
            .map(|token| (token.id.clone(), token))
            .collect();
        self.scenes.insert(scene_id.clone(), tokens);
        self.incoming_events.push_tokens_moved(TokensMoved {
            scene_id,
            token_ids,
        });
    }

    /// Patch positions when the token set matches; otherwise leave the
    /// scene alone and schedule a resync
    fn reconcile_scene(&mut self, scene_id: SceneId, tokens: Vec<TokenPosition>) {
        let Some(local) = self.scenes.get(&scene_id) else {
            self.replace_scene(scene_id, tokens);
            return;
        };

        let local_ids: BTreeSet<&TokenId> = local.keys().collect();
        let remote_ids: BTreeSet<&TokenId> = tokens.iter().map(|token| &token.id).collect();
        if local_ids != remote_ids {
            self.schedule_resync(scene_id);
            return;
        }

        let mut moved = Vec::new();
        for remote in tokens {
            if let Some(pending) = self.pending_moves.get(&scene_id, &remote.id) {
                if pending.target == remote {
                    self.pending_moves.confirm(&scene_id, &remote.id);
                } else {
                    // keep showing our own move until it is echoed or times out
                    continue;
                }
            }
            let Some(local) = self
                .scenes
                .get_mut(&scene_id)
                .and_then(|tokens| tokens.get_mut(&remote.id))
            else {
                continue;
            };
            if *local != remote {
                moved.push(remote.id.clone());
                *local = remote;
            }
        }

        if !moved.is_empty() {
            self.incoming_events.push_tokens_moved(TokensMoved {
                scene_id,
                token_ids: moved,
            });
        }
    }

    fn schedule_resync(&mut self, scene_id: SceneId) {
        if self.scheduled_resyncs.contains_key(&scene_id) {
            return;
        }
        let due = self
            .wall
            .now_ms()
            .saturating_add(millis(self.config.resync_settle));
        debug!("token set of '{}' changed, resync scheduled", scene_id);
        self.scheduled_resyncs.insert(scene_id, due);
    }

    fn send_due_resyncs(&mut self, now_ms: i64) {
        let due: Vec<SceneId> = self
            .scheduled_resyncs
            .iter()
            .filter(|(_, due_ms)| now_ms >= **due_ms)
            .map(|(scene_id, _)| scene_id.clone())
            .collect();
        for scene_id in due {
            self.send_resync(ResyncScope::Scene(scene_id));
        }
    }

    fn expire_optimistic_moves(&mut self, now_ms: i64) {
        let mut reverted: BTreeMap<SceneId, Vec<TokenId>> = BTreeMap::new();
        for (scene_id, pending) in self.pending_moves.take_expired(now_ms) {
            warn!(
                "move of '{}' on '{}' was not confirmed, reverting",
                pending.target.id, scene_id
            );
            if let Some(token) = self
                .scenes
                .get_mut(&scene_id)
                .and_then(|tokens| tokens.get_mut(&pending.confirmed.id))
            {
                *token = pending.confirmed.clone();
            }
            reverted
                .entry(scene_id)
                .or_default()
                .push(pending.confirmed.id);
        }

        for (scene_id, token_ids) in reverted {
            self.incoming_events.push_tokens_moved(TokensMoved {
                scene_id: scene_id.clone(),
                token_ids,
            });
            self.send_resync(ResyncScope::Scene(scene_id));
        }
    }

    /// Fire-and-forget resync request
    fn send_resync(&mut self, scope: ResyncScope) {
        if let Err(err) = self.request_resync(scope) {
            warn!("cannot request resync: {}", err);
            self.incoming_events.push_error(err);
        }
    }
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
