use crate::event::{Event, EventType};

use super::types::{ConditioningConfig, EventStats};

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct ConditioningState {
    pub(super) last_trigger_ms: u64,
    pub(super) last_emit_ms: Option<u64>,
    pub(super) pending: Option<Event>,
    pub(super) pending_count: u16,
    pub(super) stats: EventStats,
}

impl ConditioningState {
    pub(super) fn record_emission(&mut self, now_ms: u64) {
        self.stats.processed = self.stats.processed.saturating_add(1);
        self.stats.last_process_ms = now_ms;
        self.last_emit_ms = Some(now_ms);
    }

    /// False until the first emission.
    pub(super) fn emitted_within(&self, now_ms: u64, interval_ms: u64) -> bool {
        self.last_emit_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < interval_ms)
    }

    pub(super) fn record_drop(&mut self) {
        self.stats.dropped = self.stats.dropped.saturating_add(1);
    }

    fn record_merge(&mut self) {
        self.stats.merged = self.stats.merged.saturating_add(1);
    }

    fn hold(&mut self, event: Event) {
        self.pending_count = if self.pending.is_some() {
            self.pending_count.saturating_add(1)
        } else {
            1
        };
        self.pending = Some(event);
        self.last_trigger_ms = event.t_ms;
    }

    fn discard_pending(&mut self) {
        if self.pending.take().is_some() {
            self.record_drop();
        }
        self.pending_count = 0;
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) enum Verdict {
    Emit(Event),
    Held,
    Merged,
    Dropped,
}

pub(super) fn debounce(
    state: &mut ConditioningState,
    config: &ConditioningConfig,
    event: Event,
) -> Verdict {
    if config.interval_ms == 0 {
        state.discard_pending();
        return Verdict::Emit(event);
    }

    let settled = event.t_ms.saturating_sub(state.last_trigger_ms) >= u64::from(config.interval_ms);
    let released = match state.pending.take() {
        Some(pending) if settled => {
            state.pending_count = 0;
            Some(pending)
        }
        Some(superseded) => {
            // Keep the burst count; only the payload is replaced.
            state.pending = Some(superseded);
            state.record_drop();
            None
        }
        None => None,
    };

    state.hold(event);
    match released {
        Some(pending) => Verdict::Emit(pending),
        None => Verdict::Held,
    }
}

pub(super) fn gate(
    state: &mut ConditioningState,
    config: &ConditioningConfig,
    event: Event,
) -> Verdict {
    if state.emitted_within(event.t_ms, u64::from(config.interval_ms)) {
        return Verdict::Dropped;
    }
    Verdict::Emit(event)
}

pub(super) fn merge(
    state: &mut ConditioningState,
    config: &ConditioningConfig,
    event: Event,
) -> Verdict {
    if config.merge_window_ms == 0 {
        state.discard_pending();
        return Verdict::Emit(event);
    }

    let in_window = state.pending.is_some()
        && event.t_ms.saturating_sub(state.last_trigger_ms) < u64::from(config.merge_window_ms);

    if in_window {
        if let Some(pending) = state.pending.as_mut() {
            fold_into(pending, &event);
        }
        state.pending_count = state.pending_count.saturating_add(1);
        state.last_trigger_ms = event.t_ms;
        state.record_merge();
        return Verdict::Merged;
    }

    let closed = state.pending.take();
    state.pending_count = 0;
    state.hold(event);
    match closed {
        Some(pending) => Verdict::Emit(pending),
        None => Verdict::Held,
    }
}

/// Whether a held event is due at `now_ms` under `config`.
pub(super) fn pending_due(
    state: &ConditioningState,
    config: &ConditioningConfig,
    now_ms: u64,
) -> bool {
    use super::types::Strategy;

    let elapsed = now_ms.saturating_sub(state.last_trigger_ms);
    match config.strategy {
        Strategy::Debounce => elapsed >= u64::from(config.interval_ms),
        Strategy::Merge => elapsed >= u64::from(config.merge_window_ms),
        _ => true,
    }
}

fn fold_into(existing: &mut Event, incoming: &Event) {
    if existing.kind != incoming.kind {
        return;
    }
    let Some(incoming_touch) = incoming.touch_payload().copied() else {
        return;
    };
    let kind = existing.kind;
    let Some(touch) = existing.touch_payload_mut() else {
        return;
    };
    match kind {
        EventType::Tap => touch.tap_count = touch.tap_count.saturating_add(1),
        EventType::LongPress => touch.duration_ms = touch.duration_ms.max(incoming_touch.duration_ms),
        _ => {}
    }
}
