use heapless::Deque;

pub const TICKLE_HISTORY: usize = 16;

/// Sustained two-sided contact, reported once per episode.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct CradleDetector {
    both_since_ms: Option<u64>,
    triggered: bool,
}

impl CradleDetector {
    /// Returns the episode duration when the gesture fires this cycle.
    pub fn update(
        &mut self,
        now_ms: u64,
        both_touched: bool,
        min_ms: u64,
        is_stable: impl FnOnce() -> bool,
    ) -> Option<u64> {
        if !both_touched {
            self.both_since_ms = None;
            self.triggered = false;
            return None;
        }
        let Some(since) = self.both_since_ms else {
            self.both_since_ms = Some(now_ms);
            self.triggered = false;
            return None;
        };
        let duration = now_ms.saturating_sub(since);
        if self.triggered || duration < min_ms || !is_stable() {
            return None;
        }
        self.triggered = true;
        Some(duration)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Sliding window of press timestamps across both pads.
#[derive(Default)]
pub(super) struct TickleDetector {
    presses: Deque<u64, TICKLE_HISTORY>,
}

impl TickleDetector {
    pub fn record_press(&mut self, now_ms: u64) {
        if self.presses.is_full() {
            self.presses.pop_front();
        }
        // Room was made above.
        let _ = self.presses.push_back(now_ms);
    }

    /// Prunes stale presses; returns the press count when the burst qualifies.
    pub fn evaluate(&mut self, now_ms: u64, window_ms: u64, min_touches: u8) -> Option<usize> {
        while self
            .presses
            .front()
            .is_some_and(|t| now_ms.saturating_sub(*t) > window_ms)
        {
            self.presses.pop_front();
        }
        let count = self.presses.len();
        if count == 0 || count < usize::from(min_touches) {
            return None;
        }
        self.presses.clear();
        Some(count)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn reset(&mut self) {
        self.presses.clear();
    }
}
