//! Per-event-type shaping of gesture events before they reach the affect model.
//!
//! Each [`EventType`] owns a small state record that is created on first use. The
//! engine knows nothing about gesture meaning beyond the merge rules for taps and
//! long presses.

mod strategy;
mod types;

use heapless::{Deque, Vec};
use log::debug;

use crate::{
    event::{Event, EventType},
    telemetry,
};

use strategy::{ConditioningState, Verdict};
pub use types::{ConditioningConfig, EventStats, Strategy};

pub const QUEUE_CAPACITY: usize = 16;

/// Events released by [`ConditioningEngine::poll_pending`] in one pass.
pub type Released = Vec<Event, { EventType::COUNT }>;

pub struct ConditioningEngine {
    default_config: ConditioningConfig,
    configs: [Option<ConditioningConfig>; EventType::COUNT],
    states: [Option<ConditioningState>; EventType::COUNT],
    queue: Deque<Event, QUEUE_CAPACITY>,
}

impl Default for ConditioningEngine {
    fn default() -> Self {
        Self::new(ConditioningConfig::DEFAULT)
    }
}

impl ConditioningEngine {
    pub const fn new(default_config: ConditioningConfig) -> Self {
        Self {
            default_config,
            configs: [None; EventType::COUNT],
            states: [None; EventType::COUNT],
            queue: Deque::new(),
        }
    }

    pub fn configure(&mut self, kind: EventType, config: ConditioningConfig) {
        let config = config.clamped(QUEUE_CAPACITY);
        self.configs[kind.index()] = Some(config);
        debug!(
            "conditioning: configure kind={:?} strategy={} interval_ms={} window_ms={}",
            kind,
            config.strategy.name(),
            config.interval_ms,
            config.merge_window_ms
        );
    }

    pub fn set_default(&mut self, config: ConditioningConfig) {
        self.default_config = config.clamped(QUEUE_CAPACITY);
    }

    pub fn config_for(&self, kind: EventType) -> ConditioningConfig {
        self.configs[kind.index()].unwrap_or(self.default_config)
    }

    pub fn stats(&self, kind: EventType) -> EventStats {
        self.states[kind.index()].map_or(EventStats::default(), |state| state.stats)
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn has_pending(&self, kind: EventType) -> bool {
        self.states[kind.index()].is_some_and(|state| state.pending.is_some())
    }

    pub fn is_in_cooldown(&self, kind: EventType, now_ms: u64) -> bool {
        let interval_ms = u64::from(self.config_for(kind).interval_ms);
        self.states[kind.index()]
            .is_some_and(|state| state.emitted_within(now_ms, interval_ms))
    }

    /// Runs `event` through its type's strategy. `Some` carries the event to deliver
    /// now, which for debounce and merge is the previously held one.
    pub fn process(&mut self, event: Event) -> Option<Event> {
        let kind = event.kind;
        let idx = kind.index();
        let config = self.seed_state(kind);
        let state = self.states[idx].get_or_insert_with(ConditioningState::default);
        state.stats.received = state.stats.received.saturating_add(1);

        let verdict = match config.strategy {
            Strategy::Immediate => Verdict::Emit(event),
            Strategy::Debounce => strategy::debounce(state, &config, event),
            Strategy::Throttle | Strategy::Cooldown => {
                strategy::gate(state, &config, event)
            }
            Strategy::Merge => strategy::merge(state, &config, event),
            Strategy::Queue => {
                let limit = usize::from(config.max_queue_size).min(QUEUE_CAPACITY);
                if self.queue.len() >= limit || self.queue.push_back(event).is_err() {
                    debug!(
                        "conditioning: drop kind={:?} reason=queue_full len={}",
                        kind,
                        self.queue.len()
                    );
                    Verdict::Dropped
                } else {
                    Verdict::Held
                }
            }
        };

        match verdict {
            Verdict::Emit(out) => {
                state.record_emission(event.t_ms);
                debug!(
                    "conditioning: emit kind={:?} strategy={} t_ms={}",
                    kind,
                    config.strategy.name(),
                    out.t_ms
                );
                Some(out)
            }
            Verdict::Dropped => {
                state.record_drop();
                telemetry::record_event_suppressed();
                debug!(
                    "conditioning: drop kind={:?} strategy={}",
                    kind,
                    config.strategy.name()
                );
                None
            }
            Verdict::Held | Verdict::Merged => None,
        }
    }

    /// Releases the head of the shared queue once its type's interval has elapsed
    /// since that type last emitted. A type that never emitted drains at once.
    pub fn drain_queue(&mut self, now_ms: u64) -> Option<Event> {
        let head = *self.queue.front()?;
        let interval_ms = u64::from(self.config_for(head.kind).interval_ms);
        let idx = head.kind.index();
        let cooling = self.states[idx]
            .is_some_and(|state| state.emitted_within(now_ms, interval_ms));
        if cooling {
            return None;
        }

        let event = self.queue.pop_front()?;
        if let Some(state) = self.states[idx].as_mut() {
            state.record_emission(now_ms);
        }
        debug!(
            "conditioning: dequeue kind={:?} remain={}",
            event.kind,
            self.queue.len()
        );
        Some(event)
    }

    /// Releases held debounce/merge events whose quiet period has run out.
    pub fn poll_pending(&mut self, now_ms: u64) -> Released {
        let mut released = Released::new();
        for kind in EventType::ALL {
            let config = self.config_for(kind);
            let Some(state) = self.states[kind.index()].as_mut() else {
                continue;
            };
            if state.pending.is_none() || !strategy::pending_due(state, &config, now_ms) {
                continue;
            }
            if let Some(event) = state.pending.take() {
                state.pending_count = 0;
                state.record_emission(now_ms);
                debug!(
                    "conditioning: release kind={:?} strategy={} now_ms={}",
                    kind,
                    config.strategy.name(),
                    now_ms
                );
                // Capacity equals the number of types; one pending per type.
                let _ = released.push(event);
            }
        }
        released
    }

    pub fn clear_queue(&mut self, kind: EventType) -> usize {
        self.retain_queued(|event| event.kind != kind)
    }

    pub fn clear_queue_all(&mut self) -> usize {
        self.retain_queued(|_| false)
    }

    fn retain_queued(&mut self, keep: impl Fn(&Event) -> bool) -> usize {
        let mut removed = 0;
        for _ in 0..self.queue.len() {
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            if keep(&event) {
                // Space was just freed by pop_front.
                let _ = self.queue.push_back(event);
            } else {
                removed += 1;
                if let Some(state) = self.states[event.kind.index()].as_mut() {
                    state.record_drop();
                }
            }
        }
        if removed > 0 {
            debug!(
                "conditioning: queue_cleared removed={} remain={}",
                removed,
                self.queue.len()
            );
        }
        removed
    }

    fn seed_state(&mut self, kind: EventType) -> ConditioningConfig {
        let idx = kind.index();
        *self.configs[idx].get_or_insert(self.default_config)
    }
}

#[cfg(test)]
mod tests;
