use super::*;
use crate::event::{ImuSample, TouchPayload, TouchPosition};

fn tap(t_ms: u64) -> Event {
    Event::touch(EventType::Tap, t_ms, TouchPayload::default())
}

fn long_press(t_ms: u64, duration_ms: u32) -> Event {
    Event::touch(
        EventType::LongPress,
        t_ms,
        TouchPayload {
            position: TouchPosition::Left,
            duration_ms,
            tap_count: 1,
        },
    )
}

fn shake(t_ms: u64, az: f32) -> Event {
    Event::motion(EventType::Shake, t_ms, ImuSample::accel(0.0, 0.0, az))
}

fn engine_with(kind: EventType, config: ConditioningConfig) -> ConditioningEngine {
    let mut engine = ConditioningEngine::default();
    engine.configure(kind, config);
    engine
}

#[test]
fn immediate_passes_every_event_through() {
    let mut engine = ConditioningEngine::default();
    for t in [0, 1, 2] {
        assert_eq!(engine.process(tap(t)), Some(tap(t)));
    }
    let stats = engine.stats(EventType::Tap);
    assert_eq!(stats.received, 3);
    assert_eq!(stats.processed, 3);
}

#[test]
fn debounce_burst_emits_last_event_after_quiet_interval() {
    let mut engine = engine_with(EventType::Shake, ConditioningConfig::debounce(300));
    let mut emitted = std::vec::Vec::new();

    for (i, t) in [1_000u64, 1_050, 1_100, 1_150, 1_200].iter().enumerate() {
        if let Some(ev) = engine.process(shake(*t, i as f32)) {
            emitted.push(ev);
        }
    }
    assert!(emitted.is_empty());

    assert!(engine.poll_pending(1_499).is_empty());
    for ev in engine.poll_pending(1_500) {
        emitted.push(ev);
    }

    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].imu_sample().map(|s| s.az), Some(4.0));
    assert_eq!(emitted[0].t_ms, 1_200);

    let stats = engine.stats(EventType::Shake);
    assert_eq!(stats.received, 5);
    assert_eq!(stats.processed, 1);
    assert_eq!(stats.dropped, 4);
    assert_eq!(stats.last_process_ms, 1_500);
}

#[test]
fn debounce_emits_previous_pending_when_next_input_is_late() {
    let mut engine = engine_with(EventType::Shake, ConditioningConfig::debounce(300));
    assert!(engine.process(shake(1_000, 1.0)).is_none());

    let out = engine.process(shake(1_400, 2.0));
    assert_eq!(out.and_then(|e| e.imu_sample().map(|s| s.az)), Some(1.0));
    assert!(engine.has_pending(EventType::Shake));
}

#[test]
fn debounce_with_zero_interval_emits_immediately() {
    let mut engine = engine_with(EventType::Shake, ConditioningConfig::debounce(0));
    assert!(engine.process(shake(10, 1.0)).is_some());
    assert!(!engine.has_pending(EventType::Shake));
}

#[test]
fn merge_collapses_taps_within_window_into_one_event() {
    let mut engine = engine_with(EventType::Tap, ConditioningConfig::multi_tap());

    assert!(engine.process(tap(1_000)).is_none());
    assert!(engine.process(tap(1_400)).is_none());
    assert!(engine.process(tap(1_900)).is_none());

    assert!(engine.poll_pending(3_000).is_empty());
    let released = engine.poll_pending(3_900);
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].touch_payload().map(|t| t.tap_count), Some(3));

    let stats = engine.stats(EventType::Tap);
    assert_eq!(stats.received, 3);
    assert_eq!(stats.merged, 2);
    assert_eq!(stats.processed, 1);
    assert_eq!(stats.dropped, 0);
}

#[test]
fn merge_flushes_held_event_and_starts_fresh_window_on_late_arrival() {
    let mut engine = engine_with(EventType::Tap, ConditioningConfig::merge(500));

    assert!(engine.process(tap(1_000)).is_none());
    assert!(engine.process(tap(1_200)).is_none());
    let flushed = engine.process(tap(2_000));
    assert_eq!(flushed.and_then(|e| e.touch_payload().map(|t| t.tap_count)), Some(2));

    let released = engine.poll_pending(2_500);
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].t_ms, 2_000);
    assert_eq!(released[0].touch_payload().map(|t| t.tap_count), Some(1));
}

#[test]
fn merge_keeps_longest_long_press_duration() {
    let mut engine = engine_with(EventType::LongPress, ConditioningConfig::merge(1_000));

    assert!(engine.process(long_press(1_000, 700)).is_none());
    assert!(engine.process(long_press(1_300, 1_200)).is_none());
    assert!(engine.process(long_press(1_600, 900)).is_none());

    let released = engine.poll_pending(2_600);
    assert_eq!(
        released[0].touch_payload().map(|t| t.duration_ms),
        Some(1_200)
    );
}

#[test]
fn cooldown_blocks_repeat_inside_interval() {
    let mut engine = engine_with(EventType::Tap, ConditioningConfig::cooldown(500));

    assert!(engine.process(tap(1_000)).is_some());
    assert!(engine.process(tap(1_100)).is_none());
    assert!(engine.is_in_cooldown(EventType::Tap, 1_100));
    assert!(engine.process(tap(1_600)).is_some());

    let stats = engine.stats(EventType::Tap);
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.dropped, 1);
}

#[test]
fn first_event_passes_gates_even_near_boot() {
    let mut engine = engine_with(EventType::Tap, ConditioningConfig::cooldown(300));
    assert!(!engine.is_in_cooldown(EventType::Tap, 100));
    assert_eq!(engine.process(tap(100)), Some(tap(100)));
    assert!(engine.process(tap(200)).is_none());

    let mut engine = engine_with(EventType::Shake, ConditioningConfig::throttle(1_000));
    assert!(engine.process(shake(50, 1.0)).is_some());

    let mut engine = engine_with(EventType::Tap, ConditioningConfig::queue(800, 4));
    assert!(engine.process(tap(90)).is_none());
    assert_eq!(engine.drain_queue(100).map(|e| e.t_ms), Some(90));
}

#[test]
fn throttle_measures_from_last_emission_not_last_input() {
    let mut engine = engine_with(EventType::Shake, ConditioningConfig::throttle(1_000));

    assert!(engine.process(shake(2_000, 1.0)).is_some());
    assert!(engine.process(shake(2_500, 1.0)).is_none());
    assert!(engine.process(shake(2_900, 1.0)).is_none());
    assert!(engine.process(shake(3_000, 1.0)).is_some());
}

#[test]
fn queue_overflow_drops_incoming_and_drains_one_per_interval() {
    let mut engine = engine_with(EventType::Tap, ConditioningConfig::queue(800, 2));

    for t in [0u64, 10, 20, 30, 40] {
        assert!(engine.process(tap(t)).is_none());
    }
    assert_eq!(engine.queued_len(), 2);
    assert_eq!(engine.stats(EventType::Tap).dropped, 3);

    let first = engine.drain_queue(500);
    assert_eq!(first.map(|e| e.t_ms), Some(0));
    assert!(engine.drain_queue(1_299).is_none());
    let second = engine.drain_queue(1_300);
    assert_eq!(second.map(|e| e.t_ms), Some(10));
    assert!(engine.drain_queue(5_000).is_none());

    let stats = engine.stats(EventType::Tap);
    assert_eq!(stats.received, 5);
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.dropped, 3);
}

#[test]
fn queue_with_zero_interval_drains_back_to_back() {
    let mut engine = engine_with(EventType::Tap, ConditioningConfig::queue(0, 4));
    assert!(engine.process(tap(5)).is_none());
    assert!(engine.process(tap(6)).is_none());
    assert!(engine.drain_queue(6).is_some());
    assert!(engine.drain_queue(6).is_some());
    assert!(engine.drain_queue(6).is_none());
}

#[test]
fn clear_queue_removes_only_matching_kind() {
    let mut engine = ConditioningEngine::default();
    engine.configure(EventType::Tap, ConditioningConfig::queue(800, 8));
    engine.configure(EventType::Shake, ConditioningConfig::queue(800, 8));

    engine.process(tap(0));
    engine.process(shake(1, 1.0));
    engine.process(tap(2));

    assert_eq!(engine.clear_queue(EventType::Tap), 2);
    assert_eq!(engine.queued_len(), 1);
    assert_eq!(engine.stats(EventType::Tap).dropped, 2);
    assert_eq!(engine.clear_queue_all(), 1);
    assert_eq!(engine.queued_len(), 0);
}

#[test]
fn lazily_created_state_is_seeded_from_default() {
    let mut engine = ConditioningEngine::new(ConditioningConfig::cooldown(200));
    assert_eq!(engine.config_for(EventType::Flip).strategy, Strategy::Cooldown);

    assert!(engine.process(Event::bare(EventType::Flip, 1_000)).is_some());
    engine.set_default(ConditioningConfig::immediate());
    // Seeded on first use, later default changes do not apply.
    assert!(engine.process(Event::bare(EventType::Flip, 1_050)).is_none());
}

#[test]
fn configure_clamps_queue_size_to_capacity() {
    let engine = engine_with(EventType::Tap, ConditioningConfig::queue(100, 200));
    assert_eq!(
        usize::from(engine.config_for(EventType::Tap).max_queue_size),
        QUEUE_CAPACITY
    );
}

#[test]
fn every_outcome_increments_exactly_one_fate_counter() {
    let mut engine = engine_with(EventType::Tap, ConditioningConfig::merge(300));
    for t in [1_000u64, 1_100, 1_200, 2_000, 2_100, 3_000] {
        engine.process(tap(t));
    }
    for _ in engine.poll_pending(10_000) {}
    let stats = engine.stats(EventType::Tap);
    assert_eq!(stats.received, 6);
    assert_eq!(stats.processed + stats.dropped + stats.merged, stats.received);
}
