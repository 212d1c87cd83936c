//! Two-pad touch gesture classifier.
//!
//! Each cycle runs the per-pad machines, then hold coordination across pads, then
//! the composite detectors (cradled, tickled). The cradled detector consults an
//! external stability predicate, normally the motion classifier's.

mod composite;
mod electrode;
mod types;

use log::info;

use crate::event::TouchPosition;

use composite::{CradleDetector, TickleDetector};
use electrode::Electrode;
pub use composite::TICKLE_HISTORY;
pub use types::{TouchConfig, TouchEvent, TouchGesture, TouchOutput, TouchSample};

pub struct TouchClassifier {
    config: TouchConfig,
    enabled: bool,
    left: Electrode,
    right: Electrode,
    cradle: CradleDetector,
    tickle: TickleDetector,
}

impl Default for TouchClassifier {
    fn default() -> Self {
        Self::new(TouchConfig::DEFAULT)
    }
}

impl TouchClassifier {
    pub fn new(config: TouchConfig) -> Self {
        Self {
            config,
            enabled: true,
            left: Electrode::new(TouchPosition::Left, &config),
            right: Electrode::new(TouchPosition::Right, &config),
            cradle: CradleDetector::default(),
            tickle: TickleDetector::default(),
        }
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.reset();
        info!("touch: enabled={}", enabled);
    }

    /// Forgets every pad and composite state, as after a controller reset.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.cradle.reset();
        self.tickle.reset();
    }

    pub fn is_left_touched(&self) -> bool {
        self.left.is_touched()
    }

    pub fn is_right_touched(&self) -> bool {
        self.right.is_touched()
    }

    pub fn process(
        &mut self,
        now_ms: u64,
        sample: TouchSample,
        is_stable: impl FnOnce() -> bool,
    ) -> TouchOutput {
        let mut out = TouchOutput::new();
        if !self.enabled {
            return out;
        }

        for (pad, touched) in [(&mut self.left, sample.left), (&mut self.right, sample.right)] {
            let step = pad.update(now_ms, touched);
            if step.pressed {
                self.tickle.record_press(now_ms);
            }
            if let Some(duration) = step.tap_ms {
                info!(
                    "touch: tap side={:?} duration_ms={}",
                    pad.position(),
                    duration
                );
                out.push(TouchEvent {
                    gesture: TouchGesture::Tap,
                    position: pad.position(),
                    t_ms: now_ms,
                    duration_ms: types::clamp_ms(duration),
                });
            }
        }

        self.coordinate_holds(now_ms, &mut out);

        let both = self.left.is_touched() && self.right.is_touched();
        if let Some(duration) = self
            .cradle
            .update(now_ms, both, self.config.cradled_min_ms, is_stable)
        {
            info!("touch: cradled duration_ms={}", duration);
            out.push(TouchEvent {
                gesture: TouchGesture::Cradled,
                position: TouchPosition::Both,
                t_ms: now_ms,
                duration_ms: types::clamp_ms(duration),
            });
        }

        if let Some(count) = self.tickle.evaluate(
            now_ms,
            self.config.tickle_window_ms,
            self.config.tickle_min_touches,
        ) {
            info!("touch: tickled touches={}", count);
            out.push(TouchEvent {
                gesture: TouchGesture::Tickled,
                position: TouchPosition::Both,
                t_ms: now_ms,
                duration_ms: 0,
            });
        }

        out
    }

    fn coordinate_holds(&mut self, now_ms: u64, out: &mut TouchOutput) {
        if self.left.is_hold_pending() && self.right.is_hold_pending() {
            // Both sides held: leave it to the cradle detector.
            self.left.suppress();
            self.right.suppress();
            return;
        }

        let due_ms = self.config.hold_min_ms.saturating_add(self.config.hold_grace_ms);
        let left_due = self.left.is_hold_pending()
            && self.left.held_ms(now_ms) >= due_ms
            && !self.right.is_touched();
        if left_due {
            if let Some(duration) = self.left.confirm_hold(now_ms) {
                out.push(hold_event(TouchPosition::Left, now_ms, duration));
            }
        }

        let right_due = self.right.is_hold_pending()
            && self.right.held_ms(now_ms) >= due_ms
            && !self.left.is_touched();
        if right_due {
            if let Some(duration) = self.right.confirm_hold(now_ms) {
                out.push(hold_event(TouchPosition::Right, now_ms, duration));
            }
        }
    }
}

fn hold_event(position: TouchPosition, now_ms: u64, duration_ms: u64) -> TouchEvent {
    TouchEvent {
        gesture: TouchGesture::Hold,
        position,
        t_ms: now_ms,
        duration_ms: types::clamp_ms(duration_ms),
    }
}
