use std::{sync::Arc, time::Duration};

use log::{debug, info, warn};

use wyterm_shared::{
    format_game_time, format_wall_time, parse_positive_duration, Action, DurationError, Timer,
    TimerCategory, TimerId, TimerStatus, TimerUpdate, VirtualClock, WallClock, DEFAULT_TIMER_ID,
};

use crate::{
    actions::ActionExecutor,
    error::ServerError,
    store::{ChangeSet, Mutation, ReplicatedStateStore, StoreError},
    timers::{TickReport, TimerCompletion},
};

/// Why a timer operation did nothing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerNoop {
    NotFound,
    Permanent,
    NotPermanent,
    NotActive,
}

impl TimerNoop {
    fn log(self, operation: &str, id: &str) {
        match self {
            TimerNoop::Permanent => {
                warn!("refusing to {} permanent timer '{}'", operation, id)
            }
            TimerNoop::NotFound => debug!("{}: no timer '{}'", operation, id),
            TimerNoop::NotPermanent => debug!("{}: timer '{}' is not permanent", operation, id),
            TimerNoop::NotActive => debug!("{}: timer '{}' is no longer active", operation, id),
        }
    }
}

/// Which timers an operation may touch
#[derive(Clone, Copy)]
struct Lookup {
    permanent_allowed: bool,
    permanent_required: bool,
    active_required: bool,
}

/// Schedules timers in game time and fires them from periodic ticks.
///
/// The engine owns the virtual clock and reads and writes timers only through
/// the store, so timer state survives a restart and the next tick after a
/// restart catches up on everything that came due in between.
pub struct EventTimerEngine {
    clock: VirtualClock,
    wall: Arc<dyn WallClock>,
    action_budget_ms: i64,
    next_id: u64,
}

impl EventTimerEngine {
    pub fn new(clock: VirtualClock, wall: Arc<dyn WallClock>, action_budget: Duration) -> Self {
        let next_id = u64::try_from(wall.now_ms()).unwrap_or_default();
        Self {
            clock,
            wall,
            action_budget_ms: i64::try_from(action_budget.as_millis()).unwrap_or(i64::MAX),
            next_id,
        }
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut VirtualClock {
        &mut self.clock
    }

    /// Current game time
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    // Scheduling

    /// Schedule a timer `duration_ms` of game time from now
    pub fn create_timer(
        &mut self,
        store: &mut ReplicatedStateStore,
        label: &str,
        category: TimerCategory,
        duration_ms: i64,
        actions: Vec<Action>,
    ) -> Result<(Timer, ChangeSet), ServerError> {
        if duration_ms <= 0 {
            return Err(DurationError::InvalidDuration {
                input: format!("{}ms", duration_ms),
            }
            .into());
        }
        let id = self.next_timer_id(store);
        let timer = self.new_timer(id, label, category, duration_ms, actions, false);
        let changes = store.apply(Mutation::InsertTimer(timer.clone()))?;
        info!(
            "timer '{}' ({}) scheduled for {}",
            timer.label,
            timer.id,
            format_game_time(timer.game_target_time_ms)
        );
        Ok((timer, changes))
    }

    /// Schedule from free text such as "2h 30m" or "3 days"
    pub fn create_timer_from_text(
        &mut self,
        store: &mut ReplicatedStateStore,
        label: &str,
        category: TimerCategory,
        duration: &str,
        actions: Vec<Action>,
    ) -> Result<(Timer, ChangeSet), ServerError> {
        let duration_ms = parse_positive_duration(duration)?;
        self.create_timer(store, label, category, duration_ms, actions)
    }

    /// Cancel an active, non-permanent timer. Anything else is a no-op.
    pub fn cancel_timer(
        &mut self,
        store: &mut ReplicatedStateStore,
        id: &str,
    ) -> Result<ChangeSet, ServerError> {
        let lookup = Lookup {
            permanent_allowed: false,
            permanent_required: false,
            active_required: true,
        };
        let Some(mut timer) = self.lookup(store, id, lookup, "cancel") else {
            return Ok(ChangeSet::new());
        };
        timer.status = TimerStatus::Cancelled;
        timer.cancelled_at = Some(format_wall_time(self.wall.now_ms()));
        let changes = store.apply(Mutation::ReplaceTimer(timer))?;
        info!("timer '{}' cancelled", id);
        Ok(changes)
    }

    /// Remove a non-permanent timer from the list, whatever its status
    pub fn delete_timer(
        &mut self,
        store: &mut ReplicatedStateStore,
        id: &str,
    ) -> Result<ChangeSet, ServerError> {
        let lookup = Lookup {
            permanent_allowed: false,
            permanent_required: false,
            active_required: false,
        };
        if self.lookup(store, id, lookup, "delete").is_none() {
            return Ok(ChangeSet::new());
        }
        let changes = store.apply(Mutation::RemoveTimer { id: id.to_string() })?;
        info!("timer '{}' deleted", id);
        Ok(changes)
    }

    /// Edit an active timer. A new duration counts from now.
    pub fn update_timer(
        &mut self,
        store: &mut ReplicatedStateStore,
        id: &str,
        update: TimerUpdate,
    ) -> Result<ChangeSet, ServerError> {
        if update.is_empty() {
            return Ok(ChangeSet::new());
        }
        let lookup = Lookup {
            permanent_allowed: true,
            permanent_required: false,
            active_required: true,
        };
        let Some(mut timer) = self.lookup(store, id, lookup, "update") else {
            return Ok(ChangeSet::new());
        };
        if let Some(duration) = update.duration.as_deref() {
            let duration_ms = parse_positive_duration(duration)?;
            timer.game_target_time_ms = self.now().saturating_add(duration_ms);
        }
        if let Some(label) = update.label {
            timer.label = label;
        }
        if let Some(category) = update.category {
            timer.category = category;
        }
        Ok(store.apply(Mutation::ReplaceTimer(timer))?)
    }

    /// Restart a permanent timer `duration` from now, clearing its
    /// completion
    pub fn rearm_timer(
        &mut self,
        store: &mut ReplicatedStateStore,
        id: &str,
        duration: &str,
    ) -> Result<ChangeSet, ServerError> {
        let duration_ms = parse_positive_duration(duration)?;
        let lookup = Lookup {
            permanent_allowed: true,
            permanent_required: true,
            active_required: false,
        };
        let Some(mut timer) = self.lookup(store, id, lookup, "rearm") else {
            return Ok(ChangeSet::new());
        };
        timer.game_target_time_ms = self.now().saturating_add(duration_ms);
        timer.status = TimerStatus::Active;
        timer.completed_at = None;
        timer.cancelled_at = None;
        timer.firing = false;
        let changes = store.apply(Mutation::ReplaceTimer(timer))?;
        info!("permanent timer '{}' re-armed for {}", id, duration);
        Ok(changes)
    }

    /// Make sure the well-known countdown exists and is running
    pub fn ensure_permanent_timer(
        &mut self,
        store: &mut ReplicatedStateStore,
        label: &str,
        duration: &str,
    ) -> Result<ChangeSet, ServerError> {
        match store.timer(DEFAULT_TIMER_ID).map(Timer::is_active) {
            None => {
                let duration_ms = parse_positive_duration(duration)?;
                let timer = self.new_timer(
                    DEFAULT_TIMER_ID.to_string(),
                    label,
                    TimerCategory::Nav,
                    duration_ms,
                    Vec::new(),
                    true,
                );
                info!("created permanent timer '{}'", label);
                Ok(store.apply(Mutation::InsertTimer(timer))?)
            }
            Some(false) => self.rearm_timer(store, DEFAULT_TIMER_ID, duration),
            Some(true) => Ok(ChangeSet::new()),
        }
    }

    // Firing

    /// Fire every active timer whose target has passed, oldest first.
    ///
    /// Each timer is marked `firing` and persisted before its actions run,
    /// then marked `completed`. A timer still marked `firing` when a tick
    /// finds it was interrupted mid-fire and is completed without running
    /// its actions a second time. Failed actions are logged and do not stop
    /// their siblings or the completion.
    pub fn tick(
        &mut self,
        store: &mut ReplicatedStateStore,
        executor: &mut dyn ActionExecutor,
    ) -> TickReport {
        let now = self.now();
        let mut report = TickReport::new(now);

        let mut due: Vec<Timer> = store
            .state()
            .timers
            .iter()
            .filter(|timer| timer.is_due(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| {
            a.game_target_time_ms
                .cmp(&b.game_target_time_ms)
                .then_with(|| a.id.cmp(&b.id))
        });

        let started = self.wall.now_ms();
        for timer in due {
            if self.wall.now_ms().saturating_sub(started) > self.action_budget_ms {
                debug!("tick budget spent, deferring timer '{}'", timer.id);
                report.deferred.push(timer.id);
                continue;
            }

            let mut completion = TimerCompletion {
                id: timer.id.clone(),
                label: timer.label.clone(),
                game_target_time_ms: timer.game_target_time_ms,
                actions_run: 0,
                actions_failed: 0,
                interrupted: timer.firing,
            };

            if timer.firing {
                warn!(
                    "timer '{}' was interrupted while firing, completing without re-running its actions",
                    timer.id
                );
            } else {
                let mut marked = timer.clone();
                marked.firing = true;
                report.absorb(store.apply(Mutation::ReplaceTimer(marked)));

                for action in &timer.actions {
                    completion.actions_run += 1;
                    match executor.execute(store, action, now) {
                        Ok(changes) => report.changes.merge(changes),
                        Err(err) => {
                            if let Some(changes) = err.unbroadcast_changes() {
                                report.changes.merge(changes.clone());
                            }
                            completion.actions_failed += 1;
                            warn!(
                                "{} action of timer '{}' failed: {}",
                                action.name(),
                                timer.id,
                                err
                            );
                        }
                    }
                }
            }

            let completed = self.complete(store, &timer.id);
            report.absorb(completed);
            info!("timer '{}' ({}) completed", timer.label, timer.id);
            report.completed.push(completion);
        }

        report
    }

    // Internal

    fn complete(
        &self,
        store: &mut ReplicatedStateStore,
        id: &str,
    ) -> Result<ChangeSet, StoreError> {
        let Some(mut timer) = store.timer(id).cloned() else {
            return Ok(ChangeSet::new());
        };
        timer.status = TimerStatus::Completed;
        timer.completed_at = Some(format_wall_time(self.wall.now_ms()));
        timer.firing = false;
        store.apply(Mutation::ReplaceTimer(timer))
    }

    fn lookup(
        &self,
        store: &ReplicatedStateStore,
        id: &str,
        lookup: Lookup,
        operation: &str,
    ) -> Option<Timer> {
        let found = match store.timer(id) {
            None => Err(TimerNoop::NotFound),
            Some(timer) if timer.permanent && !lookup.permanent_allowed => {
                Err(TimerNoop::Permanent)
            }
            Some(timer) if !timer.permanent && lookup.permanent_required => {
                Err(TimerNoop::NotPermanent)
            }
            Some(timer) if lookup.active_required && !timer.is_active() => {
                Err(TimerNoop::NotActive)
            }
            Some(timer) => Ok(timer.clone()),
        };
        match found {
            Ok(timer) => Some(timer),
            Err(noop) => {
                noop.log(operation, id);
                None
            }
        }
    }

    fn new_timer(
        &self,
        id: TimerId,
        label: &str,
        category: TimerCategory,
        duration_ms: i64,
        actions: Vec<Action>,
        permanent: bool,
    ) -> Timer {
        Timer {
            id,
            label: label.to_string(),
            category,
            game_target_time_ms: self.now().saturating_add(duration_ms),
            created_at: format_wall_time(self.wall.now_ms()),
            actions,
            status: TimerStatus::Active,
            permanent,
            completed_at: None,
            cancelled_at: None,
            firing: false,
        }
    }

    fn next_timer_id(&mut self, store: &ReplicatedStateStore) -> TimerId {
        loop {
            self.next_id = self.next_id.wrapping_add(1);
            let id = format!("timer-{:x}-{:04x}", self.next_id, fastrand::u16(..));
            if store.timer(&id).is_none() {
                return id;
            }
        }
    }
}
