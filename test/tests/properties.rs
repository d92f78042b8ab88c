use std::sync::Arc;

use proptest::prelude::*;

use wyterm_server::ServerConfig;
use wyterm_shared::{
    format_duration, parse_duration, Action, Clearance, LogLevel, ManualWallClock, TimerCategory,
    VirtualClock, HOUR_MS, MINUTE_MS,
};
use wyterm_test::TestTable;

fn clearance() -> impl Strategy<Value = Clearance> {
    prop_oneof![
        Just(Clearance::None),
        Just(Clearance::Crewmember),
        Just(Clearance::Medical),
        Just(Clearance::Captain),
        Just(Clearance::Corporate),
        Just(Clearance::Master),
    ]
}

#[derive(Clone, Debug)]
enum ClockStep {
    Advance(i64),
    Pause,
    Resume,
    Adjust(i64),
}

fn clock_step() -> impl Strategy<Value = ClockStep> {
    prop_oneof![
        (0i64..3_600_000).prop_map(ClockStep::Advance),
        Just(ClockStep::Pause),
        Just(ClockStep::Resume),
        (-HOUR_MS..HOUR_MS).prop_map(ClockStep::Adjust),
    ]
}

#[derive(Clone, Debug)]
enum ClearanceStep {
    Grant(Clearance),
    Reset,
}

fn clearance_step() -> impl Strategy<Value = ClearanceStep> {
    prop_oneof![
        4 => clearance().prop_map(ClearanceStep::Grant),
        1 => Just(ClearanceStep::Reset),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rebasing_never_moves_game_time(
        acceleration in 1.0f64..100.0,
        steps in proptest::collection::vec(clock_step(), 1..40),
    ) {
        let wall = Arc::new(ManualWallClock::new(0));
        let mut clock = VirtualClock::new(wall.clone(), 0, acceleration, false);
        let mut last = clock.now();
        for step in steps {
            match step {
                ClockStep::Advance(ms) => {
                    wall.advance(ms);
                    prop_assert!(clock.now() >= last);
                }
                ClockStep::Pause => {
                    clock.pause();
                    prop_assert_eq!(clock.now(), last);
                }
                ClockStep::Resume => {
                    clock.resume();
                    prop_assert_eq!(clock.now(), last);
                }
                ClockStep::Adjust(delta) => {
                    clock.adjust_ms(delta);
                    prop_assert_eq!(clock.now(), last + delta);
                }
            }
            last = clock.now();
        }
    }

    #[test]
    fn formatted_minutes_parse_back(minutes in 1i64..2_000_000) {
        let millis = minutes * MINUTE_MS;
        prop_assert_eq!(parse_duration(&format_duration(millis)), millis);
    }

    #[test]
    fn clearance_only_rises_until_reset(
        steps in proptest::collection::vec(clearance_step(), 1..16),
    ) {
        let mut table = TestTable::new();
        let mut highest = table.server.effective_clearance("ash").rank();
        for step in steps {
            match step {
                ClearanceStep::Grant(level) => {
                    let granted = table.server.grant_clearance("ash", level).is_ok();
                    let current = table.server.effective_clearance("ash").rank();
                    prop_assert_eq!(granted, level.rank() > highest);
                    prop_assert!(current >= highest);
                    highest = current;
                }
                ClearanceStep::Reset => {
                    table.server.reset_clearance("ash").unwrap();
                    highest = table.server.effective_clearance("ash").rank();
                    prop_assert_eq!(highest, Clearance::Crewmember.rank());
                }
            }
        }
    }

    #[test]
    fn timer_fires_exactly_once(extra_ticks in 1usize..6, overshoot in 0i64..600_000) {
        let mut table = TestTable::with_config(ServerConfig {
            clock_starts_paused: false,
            ..ServerConfig::default()
        });
        let log = Action::log_entry("MU/TH/UR", "ONCE", "Fired", LogLevel::Normal);
        table
            .server
            .create_timer("Once", TimerCategory::Custom, "30m", vec![log])
            .unwrap();

        table.advance(3 * 60_000 + overshoot);
        for _ in 0..extra_ticks {
            table.server.tick();
            table.advance(10_000);
        }

        prop_assert_eq!(table.server.state().logs.len(), 1);
    }
}
