use serde_json::json;

use wyterm_client::{ElevationDeniedEvent, RegionChangedEvent};
use wyterm_server::{ElevationEvent, TimerCompletedEvent};
use wyterm_shared::{
    Action, BroadcastMessage, Clearance, ClockAdjustment, LogLevel, Region, TimerCategory,
    TimerStatus, DEFAULT_TIMER_ID, HOUR_MS,
};
use wyterm_test::TestTable;

/// A two-hour timer fires once after the clock is jumped two game hours
#[test]
fn timer_fires_after_clock_jump() {
    let mut table = TestTable::new();
    let replica = table.add_replica("ripley");

    let log = Action::log_entry("MU/TH/UR", "ARRIVAL", "Approaching LV-426", LogLevel::Normal);
    let timer = table
        .server
        .create_timer("Arrival", TimerCategory::Nav, "2h", vec![log])
        .unwrap();
    assert_eq!(timer.remaining_ms(table.server.now()), 2 * HOUR_MS);

    table.server.pause_clock().unwrap();
    table.server.adjust_clock(ClockAdjustment::Hours(2)).unwrap();
    table.server.resume_clock().unwrap();
    table.server.tick();
    table.server.tick();

    let (mut server_events, _) = table.exchange();
    let completions: usize = server_events
        .iter_mut()
        .map(|events| events.read::<TimerCompletedEvent>().count())
        .sum();
    assert_eq!(completions, 1);
    assert_eq!(
        table.server.timer(&timer.id).map(|t| t.status),
        Some(TimerStatus::Completed)
    );
    assert_eq!(table.server.state().logs.len(), 1);

    let shadow = table.replica(replica).state();
    assert_eq!(shadow.logs.len(), 1);
    assert_eq!(shadow.logs[0].subject, "ARRIVAL");
    assert_eq!(
        shadow.timer(&timer.id).map(|t| t.status),
        Some(TimerStatus::Completed)
    );
}

/// A paused clock reads the same game time however much real time passes
#[test]
fn paused_clock_is_frozen_everywhere() {
    let mut table = TestTable::new();
    let replica = table.add_replica("ripley");
    table.advance(5_000);

    table.server.pause_clock().unwrap();
    let frozen = table.server.now();
    table.exchange();

    for _ in 0..5 {
        table.advance(60 * 60_000);
        assert_eq!(table.server.now(), frozen);
        assert_eq!(table.replica(replica).game_time(), Some(frozen));
    }
}

/// The permanent countdown survives delete and cancel attempts
#[test]
fn permanent_timer_cannot_be_removed() {
    let mut table = TestTable::new();

    assert!(!table.server.delete_timer(DEFAULT_TIMER_ID).unwrap());
    assert!(!table.server.cancel_timer(DEFAULT_TIMER_ID).unwrap());

    let timer = table.server.timer(DEFAULT_TIMER_ID).unwrap();
    assert!(timer.permanent);
    assert_eq!(timer.status, TimerStatus::Active);
}

/// Replicas replace regions wholesale in receipt order
#[test]
fn out_of_order_region_updates_apply_last_write() {
    let mut table = TestTable::new();
    let replica = table.add_replica("ripley");
    let newer = BroadcastMessage::StateDelta {
        region: Region::Logs,
        value: json!([
            { "timestamp": "2183-06-12 07:00:00", "sender": "MOTHER", "subject": "B", "detail": "newer" },
            { "timestamp": "2183-06-12 06:00:00", "sender": "MOTHER", "subject": "A", "detail": "older" },
        ]),
    };
    let older = BroadcastMessage::StateDelta {
        region: Region::Logs,
        value: json!([
            { "timestamp": "2183-06-12 06:00:00", "sender": "MOTHER", "subject": "A", "detail": "older" },
        ]),
    };

    let endpoint = &table.replica_endpoints[replica];
    endpoint.inject(&newer.encode().unwrap());
    endpoint.inject(&older.encode().unwrap());
    let mut events = table.replica_mut(replica).receive();

    assert!(events.read::<RegionChangedEvent>().any(|r| r == Region::Logs));
    let logs = &table.replica(replica).state().logs;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].detail, "older");
}

/// A raise is granted and replicated; a downgrade is denied
#[test]
fn clearance_raise_then_downgrade() {
    let mut table = TestTable::new();
    let replica = table.add_replica("ripley");
    assert_eq!(table.replica(replica).clearance(), Clearance::Crewmember);

    table
        .replica_mut(replica)
        .request_elevation(Clearance::Corporate, None)
        .unwrap();
    let (mut server_events, _) = table.exchange();
    let granted: Vec<bool> = server_events
        .iter_mut()
        .flat_map(|events| events.read::<ElevationEvent>())
        .map(|outcome| outcome.granted)
        .collect();
    assert_eq!(granted, vec![true]);
    assert_eq!(table.replica(replica).clearance(), Clearance::Corporate);

    table
        .replica_mut(replica)
        .request_elevation(Clearance::Crewmember, None)
        .unwrap();
    let (_, mut replica_events) = table.exchange();
    let denials: usize = replica_events[replica]
        .iter_mut()
        .map(|events| events.read::<ElevationDeniedEvent>().count())
        .sum();
    assert_eq!(denials, 1);
    assert_eq!(table.replica(replica).clearance(), Clearance::Corporate);
    assert_eq!(
        table.server.effective_clearance("ripley"),
        Clearance::Corporate
    );
}
