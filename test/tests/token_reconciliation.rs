use wyterm_client::{ResyncRequestedEvent, TokensMovedEvent};
use wyterm_server::{ServerConfig, TokenMoveEvent};
use wyterm_shared::{LogLevel, ResyncScope, TokenPosition};
use wyterm_test::{TestTable, SCENE};

fn table_with_crew() -> (TestTable, usize, usize) {
    let mut table = TestTable::new();
    let ripley = table.add_replica("ripley");
    let dallas = table.add_replica("dallas");
    table.server.change_scene(SCENE).unwrap();
    table.exchange();
    (table, ripley, dallas)
}

fn position(table: &TestTable, replica: usize, token: &str) -> (f64, f64) {
    let token = table.replica(replica).token(SCENE, token).unwrap();
    (token.x, token.y)
}

#[test]
fn scene_change_reaches_every_replica() {
    let (table, ripley, dallas) = table_with_crew();

    for replica in [ripley, dallas] {
        assert_eq!(table.replica(replica).active_scene(), Some(SCENE));
        assert_eq!(table.replica(replica).scene_tokens(SCENE).map(|t| t.len()), Some(2));
    }
    assert_eq!(position(&table, ripley, "dallas"), (1.0, 0.0));
}

#[test]
fn late_joiner_receives_the_active_scene() {
    let mut table = TestTable::new();
    table.server.change_scene(SCENE).unwrap();
    table.exchange();

    let ripley = table.add_replica("ripley");
    table.settle();

    assert_eq!(table.replica(ripley).active_scene(), Some(SCENE));
    assert_eq!(table.replica(ripley).scene_tokens(SCENE).map(|t| t.len()), Some(2));
    table.replica_mut(ripley).move_token(SCENE, "ripley", 2.0, 2.0).unwrap();
    table.exchange();
    table.settle();
    assert_eq!(
        table.entities.position(SCENE, "ripley"),
        Some(TokenPosition::new("ripley", 2.0, 2.0))
    );
}

#[test]
fn active_scene_survives_restart() {
    let mut table = TestTable::new();
    table.server.change_scene(SCENE).unwrap();

    let kv = table.kv.clone();
    let wall = table.wall.clone();
    drop(table);
    let mut table = TestTable::restart_with(
        ServerConfig {
            clock_starts_paused: false,
            ..ServerConfig::default()
        },
        kv.clone(),
        Box::new(kv),
        wall,
    );
    let ripley = table.add_replica("ripley");

    assert_eq!(table.server.active_scene(), Some(SCENE));
    assert_eq!(table.replica(ripley).active_scene(), Some(SCENE));
    assert!(table.replica(ripley).token(SCENE, "dallas").is_some());
}

#[test]
fn owner_drag_is_confirmed_and_seen_by_others() {
    let (mut table, ripley, dallas) = table_with_crew();

    table.replica_mut(ripley).move_token(SCENE, "ripley", 4.0, 2.0).unwrap();
    assert_eq!(position(&table, ripley, "ripley"), (4.0, 2.0));
    assert!(table.replica(ripley).has_pending_moves());

    let (mut server_events, mut replica_events) = table.exchange();
    let outcomes: Vec<_> = server_events
        .iter_mut()
        .flat_map(|events| events.read::<TokenMoveEvent>())
        .collect();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].accepted);
    assert_eq!(outcomes[0].user_id, "ripley");
    assert!(replica_events[dallas]
        .iter_mut()
        .all(|events| !events.has::<TokensMovedEvent>()));

    let (_, mut replica_events) = table.settle();

    assert!(!table.replica(ripley).has_pending_moves());
    assert_eq!(position(&table, ripley, "ripley"), (4.0, 2.0));
    assert_eq!(position(&table, dallas, "ripley"), (4.0, 2.0));
    assert_eq!(
        table.entities.position(SCENE, "ripley"),
        Some(TokenPosition::new("ripley", 4.0, 2.0))
    );

    let moved: Vec<_> = replica_events[dallas]
        .iter_mut()
        .flat_map(|events| events.read::<TokensMovedEvent>())
        .collect();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].token_ids, vec!["ripley".to_string()]);
}

#[test]
fn move_by_non_owner_is_reverted() {
    let (mut table, ripley, dallas) = table_with_crew();

    table.replica_mut(dallas).move_token(SCENE, "ripley", 9.0, 9.0).unwrap();
    assert_eq!(position(&table, dallas, "ripley"), (9.0, 9.0));

    let (mut server_events, _) = table.exchange();
    let outcomes: Vec<_> = server_events
        .iter_mut()
        .flat_map(|events| events.read::<TokenMoveEvent>())
        .collect();
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].accepted);

    assert_eq!(position(&table, dallas, "ripley"), (0.0, 0.0));
    assert!(!table.replica(dallas).has_pending_moves());
    assert_eq!(position(&table, ripley, "ripley"), (0.0, 0.0));
    assert_eq!(
        table.entities.position(SCENE, "ripley"),
        Some(TokenPosition::new("ripley", 0.0, 0.0))
    );
}

#[test]
fn unanswered_move_reverts_after_timeout() {
    let (mut table, ripley, _) = table_with_crew();
    table.server_endpoint.set_online(false);

    table.replica_mut(ripley).move_token(SCENE, "ripley", 3.0, 3.0).unwrap();
    table.exchange();
    assert_eq!(position(&table, ripley, "ripley"), (3.0, 3.0));

    table.advance(5_001);
    let (_, mut replica_events) = table.exchange();

    assert_eq!(position(&table, ripley, "ripley"), (0.0, 0.0));
    assert!(!table.replica(ripley).has_pending_moves());
    let resyncs: Vec<_> = replica_events[ripley]
        .iter_mut()
        .flat_map(|events| events.read::<ResyncRequestedEvent>())
        .collect();
    assert_eq!(resyncs, vec![ResyncScope::Scene(SCENE.to_string())]);
}

#[test]
fn new_token_triggers_scene_resync() {
    let (mut table, ripley, dallas) = table_with_crew();

    table.entities.add_token(SCENE, "kane", 2.0, 2.0, &["kane"]);
    table.server.move_token("gamemaster", SCENE, "dallas", 1.0, 1.0).unwrap();
    table.exchange();

    // the debounced update no longer matches the local token set
    table.advance(50);
    table.exchange();
    assert!(table.replica(ripley).token(SCENE, "kane").is_none());
    assert_eq!(position(&table, ripley, "dallas"), (1.0, 0.0));

    table.advance(300);
    table.exchange();

    for replica in [ripley, dallas] {
        assert_eq!(
            table.replica(replica).token(SCENE, "kane"),
            Some(&TokenPosition::new("kane", 2.0, 2.0))
        );
        assert_eq!(position(&table, replica, "dallas"), (1.0, 1.0));
    }
}

#[test]
fn burst_of_updates_applies_only_the_latest() {
    let (mut table, ripley, _) = table_with_crew();

    for step in 1..=5 {
        table.server.move_token("gamemaster", SCENE, "dallas", step as f64, 0.0).unwrap();
    }
    let (_, mut replica_events) = table.settle();

    assert_eq!(position(&table, ripley, "dallas"), (5.0, 0.0));
    let moved: usize = replica_events[ripley]
        .iter_mut()
        .map(|events| events.read::<TokensMovedEvent>().count())
        .sum();
    assert_eq!(moved, 1);
}

#[test]
fn duplicated_delivery_is_harmless() {
    let (mut table, ripley, dallas) = table_with_crew();
    table.hub.set_duplicate(true);

    table.server.move_token("gamemaster", SCENE, "dallas", 6.0, 1.0).unwrap();
    table
        .server
        .append_log("MU/TH/UR", "ECHO", "Delivered twice", LogLevel::Normal)
        .unwrap();
    table.settle();

    for replica in [ripley, dallas] {
        assert_eq!(position(&table, replica, "dallas"), (6.0, 1.0));
        assert_eq!(table.replica(replica).state().logs.len(), 1);
    }
}
