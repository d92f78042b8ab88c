use std::sync::Arc;

use serde_json::json;

use wyterm_server::{KeyValueStore, ServerConfig, TimerCompletedEvent};
use wyterm_shared::{
    Action, LogLevel, ManualWallClock, TimerCategory, TimerStatus, DEFAULT_TIMER_ID, HOUR_MS,
};
use wyterm_test::TestTable;

const NS: &str = "wy-terminal";

fn running() -> ServerConfig {
    ServerConfig {
        clock_starts_paused: false,
        ..ServerConfig::default()
    }
}

/// Stop the authority, let real time pass, start a new one on the same store
fn restart(table: TestTable, offline_ms: i64) -> TestTable {
    let kv = table.kv.clone();
    let wall: Arc<ManualWallClock> = table.wall.clone();
    drop(table);
    wall.advance(offline_ms);
    TestTable::restart_with(running(), kv.clone(), Box::new(kv), wall)
}

fn completions(table: &mut TestTable) -> usize {
    let (mut events, _) = table.exchange();
    events
        .iter_mut()
        .map(|events| events.read::<TimerCompletedEvent>().count())
        .sum()
}

#[test]
fn timers_that_matured_offline_fire_on_catch_up() {
    let mut table = TestTable::new();
    let log = Action::log_entry("MU/TH/UR", "WAKE", "Crew revived", LogLevel::Normal);
    let timer = table
        .server
        .create_timer("Wake crew", TimerCategory::System, "3h", vec![log])
        .unwrap();

    // one real hour offline is ten game hours
    let mut table = restart(table, 60 * 60_000);
    assert_eq!(
        table.server.timer(&timer.id).map(|t| t.status),
        Some(TimerStatus::Active)
    );

    assert_eq!(completions(&mut table), 0);
    table.advance(1_000);
    assert_eq!(completions(&mut table), 1);
    assert_eq!(table.server.state().logs.len(), 1);
}

#[test]
fn clock_keeps_running_across_restart() {
    let table = TestTable::new();
    let before = table.server.now();

    let table = restart(table, 60_000);

    assert_eq!(table.server.now(), before + 10 * 60_000);
}

#[test]
fn completed_timers_never_fire_again() {
    let mut table = TestTable::new();
    let log = Action::log_entry("MU/TH/UR", "ONCE", "Only once", LogLevel::Normal);
    table
        .server
        .create_timer_ms("Once", TimerCategory::Custom, HOUR_MS, vec![log])
        .unwrap();
    table.advance(6 * 60_000);
    table.server.tick();
    assert_eq!(table.server.state().logs.len(), 1);

    let mut table = restart(table, 60_000);
    table.advance(1_000);
    assert_eq!(completions(&mut table), 0);
    table.server.tick();
    assert_eq!(table.server.state().logs.len(), 1);
}

#[test]
fn timer_interrupted_mid_fire_is_completed_without_replay() {
    let mut table = TestTable::new();
    let log = Action::log_entry("MU/TH/UR", "DUP", "Must not repeat", LogLevel::Normal);
    let timer = table
        .server
        .create_timer_ms("Crash", TimerCategory::Custom, HOUR_MS, vec![log])
        .unwrap();

    // the marker was persisted, then the process died before completion
    let mut kv = table.kv.clone();
    let mut timers = kv.peek(NS, "timers").unwrap();
    for stored in timers.as_array_mut().unwrap() {
        if stored["id"] == json!(timer.id) {
            stored["firing"] = json!(true);
        }
    }
    kv.set(NS, "timers", timers).unwrap();

    let mut table = restart(table, 60 * 60_000);
    table.advance(1_000);
    table.exchange();

    let stored = table.server.timer(&timer.id).unwrap();
    assert_eq!(stored.status, TimerStatus::Completed);
    assert!(!stored.firing);
    assert!(table.server.state().logs.is_empty());
}

#[test]
fn permanent_timer_is_rearmed_on_start() {
    let table = TestTable::new();

    // stored as finished, e.g. by a process that died before re-arming it
    let mut kv = table.kv.clone();
    let mut timers = kv.peek(NS, "timers").unwrap();
    for stored in timers.as_array_mut().unwrap() {
        if stored["id"] == json!(DEFAULT_TIMER_ID) {
            stored["status"] = json!("completed");
            stored["completedAt"] = json!("2183-06-12T06:00:00Z");
        }
    }
    kv.set(NS, "timers", timers).unwrap();

    let table = restart(table, 0);

    let timer = table.server.timer(DEFAULT_TIMER_ID).unwrap();
    assert!(timer.is_active());
    assert!(timer.completed_at.is_none());
    assert_eq!(timer.label, "NEXT CHECKPOINT");
}

#[test]
fn permanent_timer_stays_active_after_its_target_passes() {
    let mut table = TestTable::new();
    let replica = table.add_replica("ripley");
    let target = table.server.timer(DEFAULT_TIMER_ID).unwrap().game_target_time_ms;

    // a day and a half of real time is fifteen game days
    table.advance(36 * 60 * 60_000);
    table.server.tick();
    table.exchange();

    let timer = table.server.timer(DEFAULT_TIMER_ID).unwrap();
    assert_eq!(timer.status, TimerStatus::Active);
    assert!(timer.game_target_time_ms > target);
    assert!(table.server.now() < timer.game_target_time_ms);
    assert_eq!(
        table.replica(replica).state().timer(DEFAULT_TIMER_ID).map(|t| t.status),
        Some(TimerStatus::Active)
    );
}
