use std::sync::Arc;

use serde_json::json;

use wyterm_server::{
    ErrorEvent, MemoryKeyValueStore, ServerConfig, ServerError, StoreError, TimerCompletedEvent,
};
use wyterm_shared::{Action, LogLevel, ManualWallClock, Region, TimerCategory, HOUR_MS};
use wyterm_test::{FailingKeyValueStore, TestTable};

fn running() -> ServerConfig {
    ServerConfig {
        clock_starts_paused: false,
        ..ServerConfig::default()
    }
}

fn failing_table() -> (TestTable, FailingKeyValueStore) {
    let kv = MemoryKeyValueStore::new();
    let failing = FailingKeyValueStore::new(kv.clone());
    let table = TestTable::with_store(running(), kv, Box::new(failing.clone()));
    (table, failing)
}

#[test]
fn failed_write_is_reported_but_still_replicated() {
    let (mut table, failing) = failing_table();
    let replica = table.add_replica("ripley");
    failing.fail_writes(true);

    let result = table.server.set_ship_field("hullIntegrity", json!(42));

    match result {
        Err(ServerError::Store(StoreError::Unpersisted { changes, .. })) => {
            assert!(changes.contains(Region::ShipStatus));
        }
        other => panic!("expected an unpersisted change, got {:?}", other),
    }
    assert_eq!(table.server.state().ship_status["hullIntegrity"], json!(42));

    table.exchange();
    assert_eq!(
        table.replica(replica).state().ship_status["hullIntegrity"],
        json!(42)
    );
}

#[test]
fn unpersisted_change_is_lost_on_restart() {
    let (mut table, failing) = failing_table();
    table.server.set_ship_field("hullIntegrity", json!(100)).unwrap();
    failing.fail_writes(true);
    assert!(table.server.set_ship_field("hullIntegrity", json!(12)).is_err());

    let kv = table.kv.clone();
    let wall: Arc<ManualWallClock> = table.wall.clone();
    drop(table);
    let table = TestTable::restart_with(running(), kv.clone(), Box::new(kv), wall);

    assert_eq!(table.server.state().ship_status["hullIntegrity"], json!(100));
}

#[test]
fn failed_writes_during_a_tick_surface_as_errors() {
    let (mut table, failing) = failing_table();
    let replica = table.add_replica("ripley");
    let log = Action::log_entry("MU/TH/UR", "UNSAVED", "Not on disk", LogLevel::Normal);
    table
        .server
        .create_timer_ms("Unsaved", TimerCategory::Custom, HOUR_MS, vec![log])
        .unwrap();

    failing.fail_writes(true);
    table.advance(6 * 60_000);
    let (mut server_events, _) = table.exchange();

    let completions: usize = server_events
        .iter_mut()
        .map(|events| events.read::<TimerCompletedEvent>().count())
        .sum();
    let errors: usize = server_events
        .iter_mut()
        .map(|events| events.read::<ErrorEvent>().count())
        .sum();
    assert_eq!(completions, 1);
    assert!(errors > 0);

    // the replica still follows the authority's memory
    assert_eq!(table.replica(replica).state().logs.len(), 1);
}
