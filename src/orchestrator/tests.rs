use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use super::*;
use crate::{
    conditioning::{ConditioningConfig, QUEUE_CAPACITY},
    event::{EventPayload, TouchPosition},
};

fn kinds(out: &DispatchOutput) -> std::vec::Vec<EventType> {
    out.iter().map(|e| e.kind).collect()
}

#[test]
fn tap_cooldown_lets_one_through_and_moves_affect_once() {
    let mut core = Orchestrator::default();
    let start = core.current_valence();

    assert_eq!(kinds(&core.trigger_event(EventType::Tap, 1_000)), [EventType::Tap]);
    assert!(core.trigger_event(EventType::Tap, 1_100).is_empty());

    let stats = core.event_stats(EventType::Tap);
    assert_eq!(stats.received, 2);
    assert_eq!(stats.processed, 1);
    assert_eq!(stats.dropped, 1);
    assert!((core.current_valence() - (start + 0.1)).abs() < 1e-5);
}

#[test]
fn observers_fan_out_to_global_and_typed() {
    static GLOBAL: AtomicU32 = AtomicU32::new(0);
    static TAPS: AtomicU32 = AtomicU32::new(0);

    fn count_all(_: &Event) {
        GLOBAL.fetch_add(1, Ordering::Relaxed);
    }
    fn count_taps(event: &Event) {
        assert_eq!(event.kind, EventType::Tap);
        TAPS.fetch_add(1, Ordering::Relaxed);
    }

    let mut core = Orchestrator::default();
    core.on_event(count_all).unwrap();
    core.on_event_of_type(EventType::Tap, count_taps).unwrap();

    core.trigger_event(EventType::Tap, 1_000);
    core.trigger_event(EventType::Pickup, 1_500);
    core.trigger_event(EventType::Tap, 1_600);

    assert_eq!(GLOBAL.load(Ordering::Relaxed), 3);
    assert_eq!(TAPS.load(Ordering::Relaxed), 2);
}

#[test]
fn registration_reports_full() {
    fn ignore(_: &Event) {}

    let mut core = Orchestrator::default();
    for _ in 0..OBSERVER_CAPACITY {
        core.on_event(ignore).unwrap();
    }
    assert_eq!(core.on_event(ignore), Err(RegistrationError::Full));
}

#[test]
fn batch_flushes_sorted_after_window() {
    static FLUSHES: AtomicU32 = AtomicU32::new(0);
    static SIZE: AtomicU32 = AtomicU32::new(0);
    static FIRST_T_MS: AtomicU64 = AtomicU64::new(u64::MAX);

    fn on_batch(events: &[Event]) {
        assert!(events.windows(2).all(|w| w[0].t_ms <= w[1].t_ms));
        FLUSHES.fetch_add(1, Ordering::Relaxed);
        SIZE.store(events.len() as u32, Ordering::Relaxed);
        FIRST_T_MS.store(events[0].t_ms, Ordering::Relaxed);
    }

    let mut core = Orchestrator::default();
    core.on_batch(on_batch).unwrap();

    core.trigger_event(EventType::Pickup, 100);
    core.inject(Event::bare(EventType::Cradled, 40), 200);
    assert_eq!(core.batched_len(), 2);

    core.poll(650);
    assert_eq!(FLUSHES.load(Ordering::Relaxed), 0);

    core.poll(700);
    assert_eq!(FLUSHES.load(Ordering::Relaxed), 1);
    assert_eq!(SIZE.load(Ordering::Relaxed), 2);
    assert_eq!(FIRST_T_MS.load(Ordering::Relaxed), 40);
    assert_eq!(core.batched_len(), 0);
}

#[test]
fn batch_flushes_when_full() {
    static SIZE: AtomicU32 = AtomicU32::new(0);

    fn on_batch(events: &[Event]) {
        SIZE.store(events.len() as u32, Ordering::Relaxed);
    }

    let config = InteractionConfig {
        batch: BatchConfig {
            max_size: 3,
            ..BatchConfig::DEFAULT
        },
        ..InteractionConfig::DEFAULT
    };
    let mut core = Orchestrator::new(&config);
    core.on_batch(on_batch).unwrap();

    for t in [0, 10, 20] {
        core.trigger_event(EventType::Pickup, t);
    }
    assert_eq!(SIZE.load(Ordering::Relaxed), 3);
    assert_eq!(core.batched_len(), 0);
}

#[test]
fn nothing_is_buffered_without_a_batch_observer() {
    let mut core = Orchestrator::default();
    core.trigger_event(EventType::Pickup, 0);
    assert_eq!(core.batched_len(), 0);
}

#[test]
fn affect_observer_sees_post_impact_reading() {
    static VALENCE_MILLI: AtomicU32 = AtomicU32::new(0);

    fn on_affect(event: &Event, reading: AffectReading) {
        assert_eq!(event.kind, EventType::Cradled);
        assert_eq!(reading.quadrant, Quadrant::PositiveLowArousal);
        VALENCE_MILLI.store((reading.valence * 1_000.0) as u32, Ordering::Relaxed);
    }

    let mut core = Orchestrator::default();
    core.on_affect(on_affect).unwrap();
    core.trigger_event(EventType::Cradled, 0);

    let milli = VALENCE_MILLI.load(Ordering::Relaxed);
    assert!((699..=700).contains(&milli));
    assert!((core.current_arousal() - (-0.1)).abs() < 1e-5);
}

#[test]
fn queued_events_drain_through_poll() {
    let mut core = Orchestrator::default();
    core.configure(EventType::Speaking, ConditioningConfig::queue(800, 5));

    assert_eq!(kinds(&core.trigger_event(EventType::Speaking, 0)), [EventType::Speaking]);
    for t in [10, 20, 30] {
        assert!(core.trigger_event(EventType::Speaking, t).is_empty());
    }
    assert_eq!(core.queued_len(), 3);

    assert!(core.poll(799).is_empty());
    assert_eq!(kinds(&core.poll(800)), [EventType::Speaking]);
    assert!(core.poll(1_000).is_empty());
    assert_eq!(kinds(&core.poll(1_600)), [EventType::Speaking]);
    assert_eq!(core.queued_len(), 1);

    assert_eq!(core.clear_queue_all(), 1);
}

#[test]
fn one_poll_can_release_every_held_type_and_a_full_queue() {
    let mut core = Orchestrator::default();
    core.configure(EventType::Tap, ConditioningConfig::queue(1_000, 16));
    core.configure(EventType::Speaking, ConditioningConfig::queue(0, 16));
    let held: std::vec::Vec<EventType> = EventType::ALL
        .into_iter()
        .filter(|kind| !matches!(kind, EventType::Tap | EventType::Speaking))
        .collect();
    for kind in &held {
        core.configure(*kind, ConditioningConfig::debounce(100));
    }

    assert_eq!(kinds(&core.trigger_event(EventType::Tap, 0)), [EventType::Tap]);
    // The cooling Tap at the head keeps the zero-interval Speaking events queued.
    assert!(core.trigger_event(EventType::Tap, 10).is_empty());
    for t in 0..15 {
        assert!(core.trigger_event(EventType::Speaking, 20 + t).is_empty());
    }
    assert_eq!(core.queued_len(), QUEUE_CAPACITY);
    for kind in &held {
        assert!(core.trigger_event(*kind, 40).is_empty());
    }

    let out = core.poll(1_010);
    assert_eq!(out.len(), held.len() + QUEUE_CAPACITY);
    assert_eq!(core.queued_len(), 0);
}

#[test]
fn debounced_motion_gesture_is_released_by_poll() {
    let mut core = Orchestrator::default();
    core.configure(EventType::Shake, ConditioningConfig::debounce(300));

    assert!(core.trigger_event(EventType::Shake, 0).is_empty());
    assert!(core.trigger_event(EventType::Shake, 50).is_empty());
    assert!(core.poll(300).is_empty());

    let out = core.poll(400);
    assert_eq!(kinds(&out), [EventType::Shake]);
    assert_eq!(out.events[0].t_ms, 50);
}

#[test]
fn single_hold_becomes_long_press() {
    let mut core = Orchestrator::default();
    let mut events = std::vec::Vec::new();
    let mut t = 1_000;
    while t <= 1_700 {
        events.extend(core.touch_sample(t, TouchSample::new(false, true)).events);
        t += 50;
    }

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventType::LongPress);
    let touch = events[0].touch_payload().copied().unwrap();
    assert_eq!(touch.position, TouchPosition::Right);
    assert_eq!(touch.duration_ms, 500);
    assert_eq!(touch.tap_count, 1);
    assert!(core.is_right_touched());
    assert!(!core.is_left_touched());
}

#[test]
fn tickle_reaches_observers_as_both_sides() {
    let mut core = Orchestrator::default();
    let mut events = std::vec::Vec::new();
    let mut t = 1_000;
    while t < 2_200 {
        let pressed = (t / 100) % 2 == 0;
        events.extend(core.touch_sample(t, TouchSample::new(pressed, false)).events);
        t += 50;
    }

    let tickles: std::vec::Vec<&Event> = events
        .iter()
        .filter(|e| e.kind == EventType::Tickled)
        .collect();
    assert_eq!(tickles.len(), 1);
    assert_eq!(
        tickles[0].touch_payload().map(|p| p.position),
        Some(TouchPosition::Both)
    );
}

#[test]
fn cradle_uses_imu_stability() {
    let mut core = Orchestrator::default();
    for i in 0..5u64 {
        core.motion_sample(i * 20, ImuSample::accel(0.0, 0.0, 1.0));
    }
    assert!(core.is_imu_stable());

    let mut events = std::vec::Vec::new();
    let mut t = 1_000;
    while t < 3_500 {
        events.extend(core.touch_sample(t, TouchSample::new(true, true)).events);
        t += 50;
    }

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventType::Cradled);
    assert_eq!(
        events[0].touch_payload().map(|p| p.position),
        Some(TouchPosition::Both)
    );
}

#[test]
fn motion_gesture_carries_its_sample() {
    let mut core = Orchestrator::default();
    core.motion_sample(0, ImuSample::accel(0.0, 0.0, 1.0));
    let out = core.motion_sample(20, ImuSample::accel(0.1, 0.0, 0.1));

    assert!(out.is_empty());
    let out = core.motion_sample(120, ImuSample::accel(0.1, 0.0, 0.1));
    assert!(out.is_empty());
    let out = core.motion_sample(220, ImuSample::accel(0.1, 0.0, 0.1));
    assert_eq!(kinds(&out), [EventType::FreeFall]);
    assert!(matches!(out.events[0].payload, EventPayload::Imu(s) if s.az == 0.1));
    assert_eq!(core.current_quadrant(), Quadrant::NegativeHighArousal);
}

#[test]
fn decay_tick_pulls_toward_baseline() {
    let mut core = Orchestrator::default();
    core.set_affect(0.9, 0.9);
    assert!(core.decay_tick(1_000));
    assert!(core.current_valence() < 0.9);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "payload category")]
fn mismatched_payload_is_a_programming_error() {
    let mut core = Orchestrator::default();
    let bogus = Event {
        kind: EventType::Tap,
        t_ms: 0,
        payload: EventPayload::System { code: 1 },
    };
    core.inject(bogus, 0);
}
