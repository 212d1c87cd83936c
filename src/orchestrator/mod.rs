//! Glue between the classifiers, the conditioning engine, the affect model and
//! the observers that react to accepted events.
//!
//! Every accepted event follows the same path: affect impact, observer fan-out,
//! then the batch buffer. Events held back by conditioning (debounce, merge,
//! queue) take that path later, from [`Orchestrator::poll`] or from the queue
//! drain that follows each dispatch.

mod batch;
mod observers;

use heapless::Vec;
use log::{debug, info, warn};

use crate::{
    affect::{AffectModel, Quadrant},
    conditioning::{ConditioningConfig, ConditioningEngine, EventStats, QUEUE_CAPACITY},
    config::{BatchConfig, InteractionConfig},
    event::{Event, EventType, ImuSample, TouchPayload},
    motion::MotionClassifier,
    telemetry,
    touch::{TouchClassifier, TouchEvent, TouchGesture, TouchSample},
};

pub use batch::{Batch, BATCH_CAPACITY};
use batch::BatchBuffer;
pub use observers::{
    AffectObserver, AffectReading, BatchObserver, EventObserver, RegistrationError,
    OBSERVER_CAPACITY,
};
use observers::Observers;

/// One held event per type plus a full queue, the most a single call can release.
pub const DISPATCH_CAPACITY: usize = EventType::COUNT + QUEUE_CAPACITY;

/// Events that passed conditioning during one call, in delivery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchOutput {
    pub events: Vec<Event, DISPATCH_CAPACITY>,
}

impl DispatchOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn contains(&self, kind: EventType) -> bool {
        self.events.iter().any(|event| event.kind == kind)
    }

    fn record(&mut self, event: Event) {
        if self.events.push(event).is_err() {
            warn!(
                "orchestrator: dispatch_output_full kind={:?} t_ms={}",
                event.kind, event.t_ms
            );
        }
    }
}

pub struct Orchestrator {
    conditioning: ConditioningEngine,
    motion: MotionClassifier,
    touch: TouchClassifier,
    affect: AffectModel,
    batch_config: BatchConfig,
    batch: BatchBuffer,
    observers: Observers,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(&InteractionConfig::DEFAULT)
    }
}

impl Orchestrator {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            conditioning: config.conditioning_engine(),
            motion: MotionClassifier::new(config.motion),
            touch: TouchClassifier::new(config.touch),
            affect: AffectModel::new(config.affect),
            batch_config: config.batch,
            batch: BatchBuffer::default(),
            observers: Observers::default(),
        }
    }

    // Inbound

    pub fn motion_sample(&mut self, now_ms: u64, sample: ImuSample) -> DispatchOutput {
        let mut out = DispatchOutput::default();
        if let Some(motion) = self.motion.process(now_ms, sample) {
            let event = Event::motion(motion.gesture.event_type(), motion.t_ms, motion.sample);
            self.dispatch(event, now_ms, &mut out);
        }
        out
    }

    pub fn touch_sample(&mut self, now_ms: u64, sample: TouchSample) -> DispatchOutput {
        let mut out = DispatchOutput::default();
        let motion = &self.motion;
        let gestures = self
            .touch
            .process(now_ms, sample, || motion.is_currently_stable());
        for gesture in gestures.iter() {
            self.dispatch(touch_event(gesture), now_ms, &mut out);
        }
        out
    }

    pub fn decay_tick(&mut self, now_ms: u64) -> bool {
        self.affect.tick_decay(now_ms)
    }

    /// Manual injection with the neutral payload for the kind's category.
    pub fn trigger_event(&mut self, kind: EventType, now_ms: u64) -> DispatchOutput {
        self.inject(Event::bare(kind, now_ms), now_ms)
    }

    /// Runs an externally built event (audio or system sources) through the pipeline.
    pub fn inject(&mut self, event: Event, now_ms: u64) -> DispatchOutput {
        let mut out = DispatchOutput::default();
        self.dispatch(event, now_ms, &mut out);
        out
    }

    pub fn set_affect(&mut self, valence: f32, arousal: f32) {
        self.affect.set_state(valence, arousal);
    }

    /// Releases held conditioning events that are due and flushes a stale batch.
    pub fn poll(&mut self, now_ms: u64) -> DispatchOutput {
        let mut out = DispatchOutput::default();
        for event in self.conditioning.poll_pending(now_ms) {
            self.deliver(event, now_ms, &mut out);
        }
        self.drain_queue(now_ms, &mut out);
        if let Some(batch) = self.batch.poll(now_ms, self.batch_config.window_ms) {
            self.flush_batch(&batch);
        }
        out
    }

    // Configuration

    pub fn configure(&mut self, kind: EventType, config: ConditioningConfig) {
        self.conditioning.configure(kind, config);
    }

    pub fn set_default_conditioning(&mut self, config: ConditioningConfig) {
        self.conditioning.set_default(config);
    }

    pub fn clear_queue(&mut self, kind: EventType) -> usize {
        self.conditioning.clear_queue(kind)
    }

    pub fn clear_queue_all(&mut self) -> usize {
        self.conditioning.clear_queue_all()
    }

    pub fn set_motion_enabled(&mut self, enabled: bool) {
        self.motion.set_enabled(enabled);
    }

    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.touch.set_enabled(enabled);
    }

    /// Forgets touch state, as after the controller was re-initialized.
    pub fn reset_touch(&mut self) {
        self.touch.reset();
    }

    /// Disabling hands any buffered events to the batch observers first.
    pub fn set_batch_enabled(&mut self, enabled: bool) {
        if !enabled {
            if let Some(batch) = self.batch.flush() {
                self.flush_batch(&batch);
            }
        }
        self.batch_config.enabled = enabled;
        info!("orchestrator: batch_enabled={}", enabled);
    }

    pub fn affect_mut(&mut self) -> &mut AffectModel {
        &mut self.affect
    }

    // Observers

    pub fn on_event(&mut self, observer: EventObserver) -> Result<(), RegistrationError> {
        self.observers.add_global(observer)
    }

    pub fn on_event_of_type(
        &mut self,
        kind: EventType,
        observer: EventObserver,
    ) -> Result<(), RegistrationError> {
        self.observers.add_typed(kind, observer)
    }

    pub fn on_batch(&mut self, observer: BatchObserver) -> Result<(), RegistrationError> {
        self.observers.add_batch(observer)
    }

    pub fn on_affect(&mut self, observer: AffectObserver) -> Result<(), RegistrationError> {
        self.observers.add_affect(observer)
    }

    // Queries

    pub fn is_picked_up(&self) -> bool {
        self.motion.is_picked_up()
    }

    pub fn is_upside_down(&self) -> bool {
        self.motion.is_upside_down()
    }

    pub fn is_left_touched(&self) -> bool {
        self.touch.is_left_touched()
    }

    pub fn is_right_touched(&self) -> bool {
        self.touch.is_right_touched()
    }

    pub fn is_imu_stable(&self) -> bool {
        self.motion.is_currently_stable()
    }

    pub fn current_quadrant(&self) -> Quadrant {
        self.affect.quadrant()
    }

    pub fn current_valence(&self) -> f32 {
        self.affect.valence()
    }

    pub fn current_arousal(&self) -> f32 {
        self.affect.arousal()
    }

    pub fn event_stats(&self, kind: EventType) -> EventStats {
        self.conditioning.stats(kind)
    }

    pub fn queued_len(&self) -> usize {
        self.conditioning.queued_len()
    }

    pub fn batched_len(&self) -> usize {
        self.batch.len()
    }

    pub fn affect(&self) -> &AffectModel {
        &self.affect
    }

    fn dispatch(&mut self, event: Event, now_ms: u64, out: &mut DispatchOutput) {
        if !event.payload_matches_kind() {
            telemetry::record_payload_mismatch();
            debug_assert!(
                false,
                "payload category does not match event kind {:?}",
                event.kind
            );
            warn!(
                "orchestrator: payload_mismatch kind={:?} t_ms={}",
                event.kind, event.t_ms
            );
            return;
        }
        if let Some(accepted) = self.conditioning.process(event) {
            self.deliver(accepted, now_ms, out);
        }
        self.drain_queue(now_ms, out);
    }

    fn drain_queue(&mut self, now_ms: u64, out: &mut DispatchOutput) {
        while let Some(event) = self.conditioning.drain_queue(now_ms) {
            self.deliver(event, now_ms, out);
        }
    }

    fn deliver(&mut self, event: Event, now_ms: u64, out: &mut DispatchOutput) {
        telemetry::record_event_dispatched();
        debug!(
            "orchestrator: deliver kind={:?} t_ms={} now_ms={}",
            event.kind, event.t_ms, now_ms
        );

        if self.affect.apply_impact(event.kind, now_ms) {
            let (valence, arousal) = self.affect.coordinates();
            self.observers.notify_affect(
                &event,
                AffectReading {
                    valence,
                    arousal,
                    quadrant: self.affect.quadrant(),
                },
            );
        }

        self.observers.notify_event(&event);

        if self.batch_config.enabled && self.observers.has_batch() {
            if let Some(batch) = self.batch.push(event, now_ms, self.batch_config.max_size) {
                self.flush_batch(&batch);
            }
        }

        out.record(event);
    }

    fn flush_batch(&self, batch: &Batch) {
        telemetry::record_batch_flushed();
        debug!("orchestrator: batch_flush size={}", batch.len());
        self.observers.notify_batch(batch);
    }
}

fn touch_event(gesture: &TouchEvent) -> Event {
    let kind = match gesture.gesture {
        TouchGesture::Tap => EventType::Tap,
        TouchGesture::Hold => EventType::LongPress,
        TouchGesture::Cradled => EventType::Cradled,
        TouchGesture::Tickled => EventType::Tickled,
    };
    Event::touch(
        kind,
        gesture.t_ms,
        TouchPayload {
            position: gesture.position,
            duration_ms: gesture.duration_ms,
            tap_count: 1,
        },
    )
}

#[cfg(test)]
mod tests;
