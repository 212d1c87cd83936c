use heapless::Vec;

use crate::{
    affect::Quadrant,
    event::{Event, EventType},
};

pub const OBSERVER_CAPACITY: usize = 8;

pub type EventObserver = fn(&Event);
pub type BatchObserver = fn(&[Event]);
pub type AffectObserver = fn(&Event, AffectReading);

/// Affect coordinates right after an impact was applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffectReading {
    pub valence: f32,
    pub arousal: f32,
    pub quadrant: Quadrant,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistrationError {
    Full,
}

#[derive(Default)]
pub(super) struct Observers {
    global: Vec<EventObserver, OBSERVER_CAPACITY>,
    typed: Vec<(EventType, EventObserver), OBSERVER_CAPACITY>,
    batch: Vec<BatchObserver, OBSERVER_CAPACITY>,
    affect: Vec<AffectObserver, OBSERVER_CAPACITY>,
}

impl Observers {
    pub fn add_global(&mut self, observer: EventObserver) -> Result<(), RegistrationError> {
        self.global
            .push(observer)
            .map_err(|_| RegistrationError::Full)
    }

    pub fn add_typed(
        &mut self,
        kind: EventType,
        observer: EventObserver,
    ) -> Result<(), RegistrationError> {
        self.typed
            .push((kind, observer))
            .map_err(|_| RegistrationError::Full)
    }

    pub fn add_batch(&mut self, observer: BatchObserver) -> Result<(), RegistrationError> {
        self.batch
            .push(observer)
            .map_err(|_| RegistrationError::Full)
    }

    pub fn add_affect(&mut self, observer: AffectObserver) -> Result<(), RegistrationError> {
        self.affect
            .push(observer)
            .map_err(|_| RegistrationError::Full)
    }

    pub fn has_batch(&self) -> bool {
        !self.batch.is_empty()
    }

    /// Global observers first, then the ones registered for `event.kind`.
    pub fn notify_event(&self, event: &Event) {
        for observer in &self.global {
            observer(event);
        }
        for (kind, observer) in &self.typed {
            if *kind == event.kind {
                observer(event);
            }
        }
    }

    pub fn notify_batch(&self, events: &[Event]) {
        for observer in &self.batch {
            observer(events);
        }
    }

    pub fn notify_affect(&self, event: &Event, reading: AffectReading) {
        for observer in &self.affect {
            observer(event, reading);
        }
    }
}
