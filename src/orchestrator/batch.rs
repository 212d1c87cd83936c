use heapless::Vec;

use crate::event::Event;

pub const BATCH_CAPACITY: usize = 32;

pub type Batch = Vec<Event, BATCH_CAPACITY>;

/// Accepted events waiting to be handed to batch observers as one sorted slice.
#[derive(Default)]
pub(super) struct BatchBuffer {
    events: Batch,
    last_buffered_ms: Option<u64>,
}

impl BatchBuffer {
    /// Buffers `event`; returns the flushed batch once `max_size` is reached.
    pub fn push(&mut self, event: Event, now_ms: u64, max_size: usize) -> Option<Batch> {
        let limit = max_size.clamp(1, BATCH_CAPACITY);
        // Room is guaranteed: the buffer is flushed as soon as it reaches `limit`.
        let _ = self.events.push(event);
        self.last_buffered_ms = Some(now_ms);
        if self.events.len() >= limit {
            return self.flush();
        }
        None
    }

    /// Flushes when `window_ms` has passed since the last buffered event.
    pub fn poll(&mut self, now_ms: u64, window_ms: u64) -> Option<Batch> {
        let last = self.last_buffered_ms?;
        if now_ms.saturating_sub(last) < window_ms {
            return None;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Option<Batch> {
        self.last_buffered_ms = None;
        if self.events.is_empty() {
            return None;
        }
        let mut batch = core::mem::take(&mut self.events);
        batch.sort_unstable_by_key(|event| event.t_ms);
        Some(batch)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
