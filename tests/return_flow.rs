// tests/return_flow.rs

mod common;

use common::{in_lane, ready_snapshot, Harness};
use overtake_assist::config::ReturnConfig;
use overtake_assist::tracking::return_threshold_kph;
use overtake_assist::{
    DecisionPhase, Direction, DrivingStyle, EngineConfig, EngineEvent, NeighborLane, OvertakeMode,
    OvertakeOutcome, StaticSettings,
};

/// Arms at 200 ms, commits at 2.7 s, lands in lane 1 at 3.0 s.
fn overtake_left(h: &mut Harness) {
    h.run(&ready_snapshot(), 0.0, 2_700.0);
    let done = h.tick(&in_lane(1), 3_000.0);
    assert_eq!(done.outcome, OvertakeOutcome::Success);
}

#[test]
fn test_returns_to_origin_lane_after_overtake() {
    let mut h = Harness::new(OvertakeMode::Automatic);
    overtake_left(&mut h);

    let memory = h.engine.state().lane_memory.clone().unwrap();
    assert_eq!(memory.net_lane_changes, 1);
    assert_eq!(memory.return_direction(), Direction::Right);

    // Clear for 2 s by 5.1 s, then held by the cooldown restarted at commit.
    let waiting = h.run(&in_lane(1), 3_100.0, 22_600.0);
    assert!(waiting
        .iter()
        .all(|s| s.return_status.as_deref().unwrap_or("").starts_with("Return RIGHT")));
    assert_eq!(
        waiting.last().and_then(|s| s.return_status.as_deref()),
        Some("Return RIGHT: cooldown 0.1s")
    );
    assert_eq!(h.commands(), vec![Direction::Left]);

    let returning = h.tick(&in_lane(1), 22_700.0);
    assert_eq!(returning.phase, DecisionPhase::LaneChanging);
    assert_eq!(returning.outcome, OvertakeOutcome::Pending);
    assert_eq!(h.commands(), vec![Direction::Left, Direction::Right]);
    assert!(h.engine.state().lane_memory.is_none());

    let back = h.tick(&in_lane(2), 23_000.0);
    assert_eq!(back.phase, DecisionPhase::Completed);
    assert_eq!(back.outcome, OvertakeOutcome::Success);
    assert!(h.engine.state().lane_memory.is_none());

    let events = h.engine.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::LaneMemoryCleared { reason, .. } if reason == "back in original lane"
    )));
    assert_eq!(h.engine.metrics().summary().returns_dispatched, 1);
}

#[test]
fn test_return_waits_for_action_cooldown() {
    let mut h = Harness::new(OvertakeMode::Automatic);
    overtake_left(&mut h);

    let mut now = 3_100.0;
    while h.commands().len() < 2 {
        assert!(now < 30_000.0, "return never dispatched");
        let cooling = h
            .engine
            .state()
            .action_cooldown
            .remaining_ms(now, 20_000.0)
            .is_some();
        let status = h.tick(&in_lane(1), now);
        if cooling {
            assert_eq!(h.commands().len(), 1, "return sent during cooldown at {}ms", now);
            assert!(status.cooldown_remaining_ms.is_some());
        }
        now += 100.0;
    }

    assert_eq!(now - 100.0, 22_700.0);
    assert_eq!(h.commands(), vec![Direction::Left, Direction::Right]);
}

#[test]
fn test_occupied_origin_lane_delays_return() {
    let mut h = Harness::new(OvertakeMode::Automatic);
    overtake_left(&mut h);

    let mut alongside = in_lane(1);
    alongside.right_neighbor = NeighborLane {
        present: true,
        relative_distance_m: -5.0,
        relative_speed_mps: -3.0,
    };
    let statuses = h.run(&alongside, 3_100.0, 8_000.0);
    assert!(statuses
        .iter()
        .all(|s| s.return_status.as_deref().unwrap_or("").contains("occupied")));
    assert_eq!(h.commands().len(), 1);
}

#[test]
fn test_lane_memory_expires_without_return() {
    let mut h = Harness::new(OvertakeMode::Automatic);
    overtake_left(&mut h);

    let mut blocked = in_lane(1);
    blocked.right_blindspot = true;
    h.run(&blocked, 3_100.0, 33_000.0);
    assert!(h.engine.state().lane_memory.is_some());

    let expired = h.tick(&blocked, 33_100.0);
    assert_eq!(expired.return_status.as_deref(), Some("Return window expired"));
    assert!(h.engine.state().lane_memory.is_none());
    assert_eq!(h.commands(), vec![Direction::Left]);
    assert_eq!(h.engine.metrics().summary().lane_memory_expired, 1);
}

#[test]
fn test_return_disabled_records_no_memory() {
    let mut settings = StaticSettings::new(OvertakeMode::Automatic, DrivingStyle::Standard);
    settings.should_return_to_lane = false;
    let mut h = Harness::with_settings(settings);
    overtake_left(&mut h);

    assert!(h.engine.state().lane_memory.is_none());
    h.run(&in_lane(1), 3_100.0, 10_000.0);
    assert_eq!(h.commands(), vec![Direction::Left]);
}

#[test]
fn test_failed_return_is_retried_then_abandoned() {
    let mut config = EngineConfig::default();
    config.timing.in_progress_timeout_ms = 3_000.0;
    config.tunables.action_cooldown_ms = 5_000.0;
    let mut h = Harness::with_config(OvertakeMode::Automatic, config);
    overtake_left(&mut h);

    let mut now = 3_100.0;
    for attempt in 1..=3u32 {
        // Wait for the next return command, then never leave lane 1.
        while h.commands().len() < attempt as usize + 1 {
            h.tick(&in_lane(1), now);
            now += 100.0;
            assert!(now < 30_000.0, "return {} never dispatched", attempt);
        }
        while h.engine.state().in_progress.is_some() {
            h.tick(&in_lane(1), now);
            now += 100.0;
        }
        assert_eq!(h.engine.state().outcome, OvertakeOutcome::Failed);
    }

    assert!(h.engine.state().lane_memory.is_none());
    assert_eq!(
        h.commands(),
        vec![Direction::Left, Direction::Right, Direction::Right, Direction::Right]
    );
}

#[test]
fn test_return_threshold_never_increases_past_taper_start() {
    let config = ReturnConfig::default();
    let base = 8.0;
    let mut previous = return_threshold_kph(base, 15_000.0, &config);
    for step in 1..=300 {
        let age = 15_000.0 + step as f64 * 100.0;
        let value = return_threshold_kph(base, age, &config);
        assert!(value <= previous, "threshold rose at {}ms", age);
        if age > 15_000.0 && age < 30_000.0 {
            assert!(value < previous);
        }
        previous = value;
    }
    assert_eq!(
        return_threshold_kph(base, 30_000.0, &config),
        return_threshold_kph(base, 45_000.0, &config)
    );
}
