use std::{collections::VecDeque, sync::Arc};

use log::{debug, info, warn};
use serde_json::{json, Value};

use wyterm_shared::{
    effective_clearance, format_countdown, parse_positive_duration, Action, BroadcastMessage,
    Clearance, ClockAdjustment, ClockState, Io, IoError, IntervalTimer, LogLevel, MessageReceiver,
    MessageSender, Region, ReplicatedState, ResyncScope, Role, SceneId, Timer, TimerCategory,
    TimerUpdate, TokenId, UserId, VirtualClock, WallClock,
};

use crate::{
    actions::{ActionExecutor, ShipActionExecutor},
    entities::EntityStore,
    error::ServerError,
    events::{ElevationOutcome, ResyncServed, ServerEvents, TokenMoveOutcome},
    persistence::KeyValueStore,
    server::ServerConfig,
    store::{
        generate_command_code, ChangeSet, CommandCode, CrewField, Mutation, ReplicatedStateStore,
        StoreError,
    },
    timers::EventTimerEngine,
};

const SELF_DESTRUCT_ACTIVE: &str = "selfDestructActive";
const SELF_DESTRUCT_TIMER: &str = "selfDestructTimerId";
const SELF_DESTRUCT_LABEL: &str = "SELF-DESTRUCT";
const ACTIVE_SCENE: &str = "activeScene";

struct PendingMove {
    user_id: UserId,
    scene_id: SceneId,
    token_id: TokenId,
    x: f64,
    y: f64,
}

/// The single authoritative process.
///
/// Owns the canonical state, the game clock and the timer scheduler. Every
/// change is applied through the state store, persisted, then broadcast to
/// replicas. Call [`AuthorityServer::receive`] from the host's update loop:
/// it drains replica requests, re-issues queued token moves and runs the
/// scheduler when its interval rings.
pub struct AuthorityServer {
    config: ServerConfig,
    wall: Arc<dyn WallClock>,
    store: ReplicatedStateStore,
    engine: EventTimerEngine,
    executor: Box<dyn ActionExecutor>,
    entities: Box<dyn EntityStore>,
    io: Io,
    scheduler: IntervalTimer,
    pending_moves: VecDeque<PendingMove>,
    incoming_events: ServerEvents,
}

impl AuthorityServer {
    /// Start the authority on whatever `kv` last persisted, with the built-in
    /// action executor
    pub fn new(
        config: ServerConfig,
        kv: Box<dyn KeyValueStore>,
        entities: Box<dyn EntityStore>,
        wall: Arc<dyn WallClock>,
    ) -> Result<Self, ServerError> {
        Self::with_executor(config, kv, entities, wall, Box::new(ShipActionExecutor::new()))
    }

    pub fn with_executor(
        config: ServerConfig,
        kv: Box<dyn KeyValueStore>,
        entities: Box<dyn EntityStore>,
        wall: Arc<dyn WallClock>,
        executor: Box<dyn ActionExecutor>,
    ) -> Result<Self, ServerError> {
        let mut store = ReplicatedStateStore::load(kv, &config.namespace, config.max_log_entries)?;

        let clock = match store.state().game_clock {
            Some(state) => VirtualClock::from_state(state, wall.clone()),
            None => {
                let clock = VirtualClock::new(
                    wall.clone(),
                    config.default_epoch_ms,
                    config.acceleration,
                    config.clock_starts_paused,
                );
                store.apply(Mutation::SetClock(clock.state()))?;
                clock
            }
        };

        let mut engine = EventTimerEngine::new(clock, wall.clone(), config.action_budget);
        engine.ensure_permanent_timer(
            &mut store,
            &config.permanent_timer_label,
            &config.permanent_timer_duration,
        )?;

        let scheduler = IntervalTimer::with_first_ring(
            config.tick_interval,
            config.startup_catch_up_delay,
            wall.now_ms(),
        );

        info!(
            "authority '{}' started with {} timers, clock {}",
            config.authority_user_id,
            store.state().timers.len(),
            if engine.clock().is_paused() {
                "paused"
            } else {
                "running"
            }
        );

        Ok(Self {
            config,
            wall,
            store,
            engine,
            executor,
            entities,
            io: Io::new(),
            scheduler,
            pending_moves: VecDeque::new(),
            incoming_events: ServerEvents::new(),
        })
    }

    /// Attach the broadcast channel and publish the full state once
    pub fn listen(&mut self, sender: Box<dyn MessageSender>, receiver: Box<dyn MessageReceiver>) {
        self.io.load(sender, receiver);
        self.broadcast_full_state();
        self.broadcast_active_scene();
    }

    pub fn is_listening(&self) -> bool {
        self.io.is_loaded()
    }

    /// Drain replica requests, re-issue queued token moves, and tick the
    /// scheduler if its interval has elapsed
    pub fn receive(&mut self) -> ServerEvents {
        self.receive_messages();
        self.process_pending_moves();

        if self.scheduler.ringing(self.wall.now_ms()) {
            self.tick();
        }

        self.incoming_events.take()
    }

    /// Fire every due timer now and publish the result as one batch.
    /// Completions surface from the next `receive`.
    pub fn tick(&mut self) {
        let mut report = self.engine.tick(&mut self.store, self.executor.as_mut());

        // the permanent countdown never stays finished
        let rearmed = self.engine.ensure_permanent_timer(
            &mut self.store,
            &self.config.permanent_timer_label,
            &self.config.permanent_timer_duration,
        );
        match rearmed {
            Ok(changes) => report.changes.merge(changes),
            Err(err) => {
                if let Some(changes) = err.unbroadcast_changes() {
                    report.changes.merge(changes.clone());
                }
                warn!("cannot re-arm the permanent timer: {}", err);
                self.incoming_events.push_error(err);
            }
        }

        if !report.is_idle() {
            debug!(
                "tick at {}: {} completed, {} deferred",
                report.game_now_ms,
                report.completed.len(),
                report.deferred.len()
            );
        }

        self.publish_batch(&report.changes);
        for completion in report.completed {
            self.incoming_events.push_completion(completion);
        }
        for err in report.errors {
            self.incoming_events.push_error(err.into());
        }

        self.scheduler.reset(self.wall.now_ms());
    }

    // State

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &ReplicatedState {
        self.store.state()
    }

    pub fn timer(&self, id: &str) -> Option<&Timer> {
        self.store.timer(id)
    }

    pub fn effective_clearance(&self, user_id: &str) -> Clearance {
        effective_clearance(
            &self.store.state().clearance_by_user,
            user_id,
            user_id == self.config.authority_user_id,
        )
    }

    // Clock

    /// Current game time
    pub fn now(&self) -> i64 {
        self.engine.now()
    }

    pub fn clock_state(&self) -> ClockState {
        self.engine.clock().state()
    }

    pub fn pause_clock(&mut self) -> Result<bool, ServerError> {
        if !self.engine.clock_mut().pause() {
            return Ok(false);
        }
        info!("game clock paused");
        self.persist_clock()?;
        Ok(true)
    }

    pub fn resume_clock(&mut self) -> Result<bool, ServerError> {
        if !self.engine.clock_mut().resume() {
            return Ok(false);
        }
        info!("game clock resumed");
        self.persist_clock()?;
        Ok(true)
    }

    /// Jump the game clock. Timers that become due fire on the next tick.
    pub fn adjust_clock(&mut self, adjustment: ClockAdjustment) -> Result<(), ServerError> {
        if !self.engine.clock_mut().adjust(adjustment) {
            return Err(ServerError::ClockOutOfRange(adjustment));
        }
        info!("game clock adjusted by {:?}", adjustment);
        self.persist_clock()
    }

    pub fn adjust_clock_ms(&mut self, delta_ms: i64) -> Result<(), ServerError> {
        self.engine.clock_mut().adjust_ms(delta_ms);
        self.persist_clock()
    }

    pub fn reset_clock(&mut self, epoch_game_time_ms: i64) -> Result<(), ServerError> {
        self.engine.clock_mut().reset(epoch_game_time_ms);
        info!("game clock reset");
        self.persist_clock()
    }

    fn persist_clock(&mut self) -> Result<(), ServerError> {
        let state = self.engine.clock().state();
        self.commit(Mutation::SetClock(state)).map(|_| ())
    }

    // Timers

    pub fn create_timer(
        &mut self,
        label: &str,
        category: TimerCategory,
        duration: &str,
        actions: Vec<Action>,
    ) -> Result<Timer, ServerError> {
        let duration_ms = parse_positive_duration(duration)?;
        self.create_timer_ms(label, category, duration_ms, actions)
    }

    pub fn create_timer_ms(
        &mut self,
        label: &str,
        category: TimerCategory,
        duration_ms: i64,
        actions: Vec<Action>,
    ) -> Result<Timer, ServerError> {
        let result = self
            .engine
            .create_timer(&mut self.store, label, category, duration_ms, actions);
        match result {
            Ok((timer, changes)) => {
                self.publish_changes(&changes);
                Ok(timer)
            }
            Err(err) => Err(self.publish_unpersisted(err)),
        }
    }

    /// `false` when the timer is unknown, permanent or already finished
    pub fn cancel_timer(&mut self, id: &str) -> Result<bool, ServerError> {
        let result = self.engine.cancel_timer(&mut self.store, id);
        self.settle(result)
    }

    pub fn delete_timer(&mut self, id: &str) -> Result<bool, ServerError> {
        let result = self.engine.delete_timer(&mut self.store, id);
        self.settle(result)
    }

    pub fn update_timer(&mut self, id: &str, update: TimerUpdate) -> Result<bool, ServerError> {
        let result = self.engine.update_timer(&mut self.store, id, update);
        self.settle(result)
    }

    pub fn rearm_timer(&mut self, id: &str, duration: &str) -> Result<bool, ServerError> {
        let result = self.engine.rearm_timer(&mut self.store, id, duration);
        self.settle(result)
    }

    // Ship

    pub fn set_ship_field(&mut self, field: &str, value: Value) -> Result<(), ServerError> {
        self.commit(Mutation::SetShipField {
            field: field.to_string(),
            value,
        })
        .map(|_| ())
    }

    pub fn set_system_status(
        &mut self,
        name: &str,
        status: &str,
        detail: Option<&str>,
    ) -> Result<(), ServerError> {
        self.commit(Mutation::SetSystemStatus {
            name: name.to_string(),
            status: status.to_string(),
            detail: detail.map(str::to_string),
        })
        .map(|_| ())
    }

    pub fn set_crew_field(
        &mut self,
        name: &str,
        field: CrewField,
        value: Option<&str>,
    ) -> Result<(), ServerError> {
        self.commit(Mutation::SetCrewField {
            name: name.to_string(),
            field,
            value: value.map(str::to_string),
        })
        .map(|_| ())
    }

    /// Append a log entry stamped with the current game time
    pub fn append_log(
        &mut self,
        sender: &str,
        subject: &str,
        detail: &str,
        level: LogLevel,
    ) -> Result<(), ServerError> {
        let action = Action::log_entry(sender, subject, detail, level);
        let now = self.engine.now();
        let result = self.executor.execute(&mut self.store, &action, now);
        match result {
            Ok(changes) => {
                self.publish_changes(&changes);
                Ok(())
            }
            Err(crate::actions::ActionError::Store(err)) => {
                Err(self.publish_unpersisted(err.into()))
            }
            Err(err) => {
                warn!("log entry rejected: {}", err);
                Ok(())
            }
        }
    }

    /// `false` for an unknown marker
    pub fn move_nav_marker(&mut self, id: &str, x: f64, y: f64) -> Result<bool, ServerError> {
        let result = self.store.apply(Mutation::MoveNavMarker {
            id: id.to_string(),
            x,
            y,
        });
        self.settle(result.map_err(ServerError::from))
    }

    pub fn set_nav_progress(&mut self, id: &str, progress: Option<f64>) -> Result<bool, ServerError> {
        let result = self.store.apply(Mutation::SetNavProgress {
            id: id.to_string(),
            progress,
        });
        self.settle(result.map_err(ServerError::from))
    }

    // Clearance

    /// Raise a user's clearance directly, without a command code
    pub fn grant_clearance(&mut self, user_id: &str, level: Clearance) -> Result<(), ServerError> {
        self.elevate(user_id, level)?;
        info!("clearance of '{}' raised to {}", user_id, level);
        Ok(())
    }

    /// Drop a user back to the default clearance
    pub fn reset_clearance(&mut self, user_id: &str) -> Result<bool, ServerError> {
        let result = self.store.apply(Mutation::ResetClearance {
            user_id: user_id.to_string(),
        });
        let changed = self.settle(result.map_err(ServerError::from))?;
        if changed {
            info!("clearance of '{}' reset", user_id);
        }
        Ok(changed)
    }

    /// Issue a fresh ten-digit code unlocking up to `role` and return it
    pub fn register_command_code(
        &mut self,
        user_id: &str,
        role: Clearance,
    ) -> Result<String, ServerError> {
        let code = generate_command_code();
        self.register_command_code_with(user_id, &code, role)?;
        Ok(code)
    }

    pub fn register_command_code_with(
        &mut self,
        user_id: &str,
        code: &str,
        role: Clearance,
    ) -> Result<(), ServerError> {
        self.store
            .register_command_code(user_id, CommandCode::new(code, role))?;
        debug!("command code registered for '{}' up to {}", user_id, role);
        Ok(())
    }

    fn elevate(&mut self, user_id: &str, level: Clearance) -> Result<(), ServerError> {
        let result = self.commit(Mutation::ElevateClearance {
            user_id: user_id.to_string(),
            level,
        });
        match result {
            Ok(_) => Ok(()),
            Err(ServerError::Store(StoreError::NotARaise { current, .. })) => {
                Err(ServerError::ElevationRejected {
                    user_id: user_id.to_string(),
                    requested: level,
                    reason: format!("already at {}", current),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn check_elevation(
        &self,
        user_id: &str,
        level: Clearance,
        command_code: Option<&str>,
    ) -> Result<(), String> {
        if user_id == self.config.authority_user_id {
            return Err("the authority already holds MASTER_OVERRIDE".to_string());
        }
        let current = self.store.clearance_of(user_id);
        if !current.is_raised_by(level) {
            return Err(format!("already at {}", current));
        }
        if !self.config.require_command_code {
            return Ok(());
        }
        match (self.store.command_code(user_id), command_code) {
            (None, _) => Err("no command code registered".to_string()),
            (Some(_), None) => Err("command code required".to_string()),
            (Some(registered), Some(quoted)) if registered.unlocks(quoted, level) => Ok(()),
            (Some(_), Some(_)) => Err("command code rejected".to_string()),
        }
    }

    fn handle_elevation_request(
        &mut self,
        user_id: UserId,
        requested: Clearance,
        command_code: Option<String>,
    ) {
        let verdict = self
            .check_elevation(&user_id, requested, command_code.as_deref())
            .and_then(|()| {
                self.elevate(&user_id, requested)
                    .map_err(|err| err.to_string())
            });

        match verdict {
            Ok(()) => {
                info!("clearance of '{}' raised to {}", user_id, requested);
                self.incoming_events.push_elevation(ElevationOutcome {
                    user_id,
                    requested,
                    granted: true,
                    reason: None,
                });
            }
            Err(reason) => {
                info!(
                    "clearance request of '{}' for {} denied: {}",
                    user_id, requested, reason
                );
                self.publish(BroadcastMessage::ElevationDenied {
                    user_id: user_id.clone(),
                    requested_level: requested,
                    reason: reason.clone(),
                });
                self.incoming_events.push_elevation(ElevationOutcome {
                    user_id,
                    requested,
                    granted: false,
                    reason: Some(reason),
                });
            }
        }
    }

    // Tokens & scenes

    /// Move a token as `requester`. The authority may move any token;
    /// everyone else only the tokens they own.
    pub fn move_token(
        &mut self,
        requester: &str,
        scene_id: &str,
        token_id: &str,
        x: f64,
        y: f64,
    ) -> Result<(), ServerError> {
        if requester != self.config.authority_user_id {
            let owners = self.entities.token_owners(scene_id, token_id)?;
            if !owners.iter().any(|owner| owner == requester) {
                return Err(ServerError::TokenMoveRejected {
                    user_id: requester.to_string(),
                    scene_id: scene_id.to_string(),
                    token_id: token_id.to_string(),
                    reason: "not an owner of the token".to_string(),
                });
            }
        }
        self.entities.update_position(scene_id, token_id, x, y)?;
        self.broadcast_scene(scene_id, false);
        Ok(())
    }

    /// Publish every token position on a scene. `resync` tells replicas to
    /// take the set as-is even if it differs from theirs.
    pub fn broadcast_scene(&mut self, scene_id: &str, resync: bool) -> bool {
        let Some(tokens) = self.entities.scene_tokens(scene_id) else {
            warn!("cannot broadcast unknown scene '{}'", scene_id);
            return false;
        };
        self.publish(BroadcastMessage::TokenPositionUpdate {
            scene_id: scene_id.to_string(),
            tokens,
            resync,
        });
        true
    }

    /// Switch the active scene. It is kept in `shipStatus` so replicas
    /// joining later, or after a restart, are sent it on a full resync.
    pub fn change_scene(&mut self, scene_id: &str) -> Result<(), ServerError> {
        info!("scene changed to '{}'", scene_id);
        let persisted = self.set_ship_field(ACTIVE_SCENE, json!(scene_id));
        self.broadcast_active_scene();
        persisted
    }

    pub fn active_scene(&self) -> Option<&str> {
        self.store
            .state()
            .ship_status
            .get(ACTIVE_SCENE)
            .and_then(Value::as_str)
    }

    fn broadcast_active_scene(&mut self) {
        let Some(scene_id) = self.active_scene().map(str::to_string) else {
            return;
        };
        self.publish(BroadcastMessage::SceneChange {
            scene_id: scene_id.clone(),
        });
        self.broadcast_scene(&scene_id, true);
    }

    pub fn send_alert(&mut self, message: &str) {
        self.publish(BroadcastMessage::Alert {
            message: message.to_string(),
        });
    }

    fn process_pending_moves(&mut self) {
        while let Some(pending) = self.pending_moves.pop_front() {
            let result = self.move_token(
                &pending.user_id,
                &pending.scene_id,
                &pending.token_id,
                pending.x,
                pending.y,
            );
            let accepted = match result {
                Ok(()) => true,
                Err(err) => {
                    warn!("token move from '{}' rejected: {}", pending.user_id, err);
                    // the requester moved optimistically, so send it the truth
                    self.broadcast_scene(&pending.scene_id, true);
                    false
                }
            };
            self.incoming_events.push_token_move(TokenMoveOutcome {
                user_id: pending.user_id,
                scene_id: pending.scene_id,
                token_id: pending.token_id,
                accepted,
            });
        }
    }

    // Self-destruct

    /// Arm the self-destruct countdown. Re-arming replaces a running one.
    pub fn start_self_destruct(&mut self, duration: &str) -> Result<Timer, ServerError> {
        let duration_ms = parse_positive_duration(duration)?;
        if let Some(previous) = self.self_destruct_timer_id() {
            self.cancel_timer(&previous)?;
        }

        let actions = vec![
            Action::AppendLogEntry {
                sender: "MU/TH/UR".to_string(),
                subject: SELF_DESTRUCT_LABEL.to_string(),
                detail: "Self-destruct sequence complete.".to_string(),
                level: LogLevel::Critical,
                classification: None,
            },
            Action::SetField {
                target: "shipStatus".to_string(),
                field: SELF_DESTRUCT_ACTIVE.to_string(),
                value: json!(false),
            },
        ];
        let timer =
            self.create_timer_ms(SELF_DESTRUCT_LABEL, TimerCategory::System, duration_ms, actions)?;
        self.set_ship_field(SELF_DESTRUCT_ACTIVE, json!(true))?;
        self.set_ship_field(SELF_DESTRUCT_TIMER, json!(timer.id))?;
        warn!("self-destruct armed: {}", format_countdown(duration_ms));
        self.send_alert(&format!(
            "SELF-DESTRUCT SEQUENCE INITIATED. T-MINUS {}",
            format_countdown(duration_ms)
        ));
        Ok(timer)
    }

    /// `false` when no countdown was running
    pub fn cancel_self_destruct(&mut self) -> Result<bool, ServerError> {
        let Some(id) = self.self_destruct_timer_id() else {
            return Ok(false);
        };
        let cancelled = self.cancel_timer(&id)?;
        self.set_ship_field(SELF_DESTRUCT_ACTIVE, json!(false))?;
        self.set_ship_field(SELF_DESTRUCT_TIMER, Value::Null)?;
        info!("self-destruct aborted");
        self.send_alert("SELF-DESTRUCT SEQUENCE ABORTED");
        Ok(cancelled)
    }

    fn self_destruct_timer_id(&self) -> Option<String> {
        self.store
            .state()
            .ship_status
            .get(SELF_DESTRUCT_TIMER)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    // Broadcasting

    /// Publish every region in one batch
    pub fn broadcast_full_state(&mut self) {
        let mut all = ChangeSet::new();
        for region in Region::ALL {
            all.insert(region);
        }
        self.publish_batch(&all);
    }

    fn serve_resync(&mut self, user_id: UserId, scope: ResyncScope) {
        info!("serving {:?} resync to '{}'", scope, user_id);
        match &scope {
            ResyncScope::All => {
                self.broadcast_full_state();
                self.broadcast_active_scene();
            }
            ResyncScope::Region(region) => self.publish_changes(&ChangeSet::of(*region)),
            ResyncScope::Scene(scene_id) => {
                self.broadcast_scene(scene_id, true);
            }
        }
        self.incoming_events
            .push_resync(ResyncServed { user_id, scope });
    }

    fn commit(&mut self, mutation: Mutation) -> Result<ChangeSet, ServerError> {
        let result = self.store.apply(mutation).map_err(ServerError::from);
        match result {
            Ok(changes) => {
                self.publish_changes(&changes);
                Ok(changes)
            }
            Err(err) => Err(self.publish_unpersisted(err)),
        }
    }

    fn settle(&mut self, result: Result<ChangeSet, ServerError>) -> Result<bool, ServerError> {
        match result {
            Ok(changes) => {
                self.publish_changes(&changes);
                Ok(!changes.is_empty())
            }
            Err(err) => Err(self.publish_unpersisted(err)),
        }
    }

    /// Replicas follow the in-memory copy even when a write failed
    fn publish_unpersisted(&mut self, err: ServerError) -> ServerError {
        if let Some(changes) = err.unbroadcast_changes().cloned() {
            self.publish_changes(&changes);
        }
        err
    }

    fn snapshots(&self, changes: &ChangeSet) -> Vec<wyterm_shared::RegionSnapshot> {
        changes
            .regions()
            .filter_map(|region| match self.store.snapshot(region) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    warn!("cannot snapshot region for broadcast: {}", err);
                    None
                }
            })
            .collect()
    }

    fn publish_changes(&mut self, changes: &ChangeSet) {
        let mut deltas = self.snapshots(changes);
        match deltas.len() {
            0 => {}
            1 => {
                let snapshot = deltas.remove(0);
                self.publish(BroadcastMessage::state_delta(snapshot));
            }
            _ => self.publish(BroadcastMessage::StateBatch { deltas }),
        }
    }

    fn publish_batch(&mut self, changes: &ChangeSet) {
        let deltas = self.snapshots(changes);
        if !deltas.is_empty() {
            self.publish(BroadcastMessage::StateBatch { deltas });
        }
    }

    fn publish(&mut self, message: BroadcastMessage) {
        if !self.io.is_loaded() {
            debug!("not listening, dropping {}", message.message_type());
            return;
        }
        if let Err(err) = self.io.send(&message) {
            warn!("failed to publish {}: {}", message.message_type(), err);
            self.incoming_events.push_error(err.into());
        }
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
                warn!("cannot read malformed message: {}", err);
                self.incoming_events.push_error(err.into());
                return;
            }
        };

        if !message.is_for(Role::Authority) {
            debug!("ignoring {} on the authority", message.message_type());
            return;
        }

        match message {
            BroadcastMessage::ElevationRequest {
                user_id,
                requested_level,
                command_code,
            } => self.handle_elevation_request(user_id, requested_level, command_code),
            BroadcastMessage::FullResyncRequest { user_id, scope } => {
                self.serve_resync(user_id, scope)
            }
            BroadcastMessage::TokenMoveRequest {
                user_id,
                scene_id,
                token_id,
                x,
                y,
            } => self.pending_moves.push_back(PendingMove {
                user_id,
                scene_id,
                token_id,
                x,
                y,
            }),
            other => debug!("ignoring {} on the authority", other.message_type()),
        }
    }
}
