//! Inertial gesture classifier.
//!
//! Detectors run in priority order and short-circuit on the first gesture that
//! both matches and is out of its own cooldown, so at most one gesture fires per
//! sample. Detectors lower in the chain are not evaluated once one has fired,
//! which matters for the stateful ones (pickup, upside-down).

mod features;
mod pickup;
mod types;

use log::{debug, info, warn};

use crate::event::ImuSample;

pub use features::{accel_delta, accel_magnitude, compute_features, gyro_magnitude, is_still, MotionFeatures};
use pickup::{PickupDetector, PickupFrame};
pub use types::{
    FlipConfig, FreeFallConfig, MotionConfig, MotionCooldowns, MotionEvent, MotionGesture,
    PickupConfig, ShakeConfig, UpsideDownConfig,
};

/// Consecutive quiet frames required before the device reports itself stable.
const STABLE_READINGS_MIN: u16 = 3;
/// Stability streak lost per mild gesture.
const MILD_STABILITY_PENALTY: u16 = 2;

pub struct MotionClassifier {
    config: MotionConfig,
    enabled: bool,
    last_sample: Option<ImuSample>,
    current_sample: ImuSample,
    /// Sample preceding `current_sample`, for the stillness check.
    previous_sample: Option<ImuSample>,
    free_fall_start_ms: Option<u64>,
    upside_down: bool,
    upside_down_count: u16,
    pickup: PickupDetector,
    last_fired_ms: [Option<u64>; MotionGesture::COUNT],
    last_significant_motion_ms: Option<u64>,
    consecutive_stable: u16,
}

impl Default for MotionClassifier {
    fn default() -> Self {
        Self::new(MotionConfig::DEFAULT)
    }
}

impl MotionClassifier {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            enabled: true,
            last_sample: None,
            current_sample: ImuSample::default(),
            previous_sample: None,
            free_fall_start_ms: None,
            upside_down: false,
            upside_down_count: 0,
            pickup: PickupDetector::new(config.pickup),
            last_fired_ms: [None; MotionGesture::COUNT],
            last_significant_motion_ms: None,
            consecutive_stable: 0,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops all rolling state; the next enabled sample primes again.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.reset();
        info!("motion: enabled={}", enabled);
    }

    pub fn reset(&mut self) {
        self.last_sample = None;
        self.current_sample = ImuSample::default();
        self.previous_sample = None;
        self.free_fall_start_ms = None;
        self.upside_down = false;
        self.upside_down_count = 0;
        self.pickup.reset();
        self.last_fired_ms = [None; MotionGesture::COUNT];
        self.last_significant_motion_ms = None;
        self.consecutive_stable = 0;
    }

    pub fn is_picked_up(&self) -> bool {
        self.pickup.is_picked_up()
    }

    pub fn is_upside_down(&self) -> bool {
        self.upside_down
    }

    pub fn consecutive_stable_readings(&self) -> u16 {
        self.consecutive_stable
    }

    pub fn is_currently_stable(&self) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(previous) = self.previous_sample.as_ref() else {
            return false;
        };
        self.consecutive_stable >= STABLE_READINGS_MIN && is_still(&self.current_sample, previous)
    }

    pub fn process(&mut self, now_ms: u64, sample: ImuSample) -> Option<MotionEvent> {
        if !self.enabled {
            return None;
        }
        let Some(last) = self.last_sample else {
            self.last_sample = Some(sample);
            self.current_sample = sample;
            return None;
        };
        self.current_sample = sample;
        self.previous_sample = Some(last);

        let features = compute_features(&sample, &last);
        let fired = self.classify(now_ms, &sample, &last, &features);

        if let Some(gesture) = fired {
            self.last_fired_ms[gesture.index()] = Some(now_ms);
            if gesture != MotionGesture::Pickup {
                self.last_significant_motion_ms = Some(now_ms);
                if gesture.is_violent() {
                    self.consecutive_stable = 0;
                } else {
                    self.consecutive_stable =
                        self.consecutive_stable.saturating_sub(MILD_STABILITY_PENALTY);
                }
            }
            log_gesture(gesture, &sample, &features);
        }

        if features.delta_g < self.config.stable_delta_g {
            self.consecutive_stable = self.consecutive_stable.saturating_add(1);
        } else {
            self.consecutive_stable = 0;
        }
        self.last_sample = Some(sample);

        fired.map(|gesture| MotionEvent {
            gesture,
            t_ms: now_ms,
            sample,
        })
    }

    fn classify(
        &mut self,
        now_ms: u64,
        sample: &ImuSample,
        last: &ImuSample,
        features: &MotionFeatures,
    ) -> Option<MotionGesture> {
        if self.detect_free_fall(now_ms, features) && self.ready(MotionGesture::FreeFall, now_ms) {
            return Some(MotionGesture::FreeFall);
        }
        if self.detect_shake_violently(features) && self.ready(MotionGesture::ShakeViolently, now_ms)
        {
            return Some(MotionGesture::ShakeViolently);
        }
        if self.detect_flip(features) && self.ready(MotionGesture::Flip, now_ms) {
            return Some(MotionGesture::Flip);
        }
        if features.delta_g > self.config.shake.normal_threshold_g
            && self.ready(MotionGesture::Shake, now_ms)
        {
            return Some(MotionGesture::Shake);
        }
        if self.detect_pickup(now_ms, sample, last, features)
            && self.ready(MotionGesture::Pickup, now_ms)
        {
            return Some(MotionGesture::Pickup);
        }
        if self.detect_upside_down(sample, features) && self.ready(MotionGesture::UpsideDown, now_ms)
        {
            return Some(MotionGesture::UpsideDown);
        }
        None
    }

    fn ready(&self, gesture: MotionGesture, now_ms: u64) -> bool {
        let cooldown_ms = gesture.cooldown_ms(&self.config.cooldowns);
        self.last_fired_ms[gesture.index()]
            .is_none_or(|last| now_ms.saturating_sub(last) > cooldown_ms)
    }

    fn detect_free_fall(&mut self, now_ms: u64, features: &MotionFeatures) -> bool {
        let cfg = &self.config.free_fall;
        if features.magnitude_g >= cfg.threshold_g {
            if let Some(start) = self.free_fall_start_ms.take() {
                debug!(
                    "motion: free_fall_ended duration_ms={}",
                    now_ms.saturating_sub(start)
                );
            }
            return false;
        }
        match self.free_fall_start_ms {
            None => {
                self.free_fall_start_ms = Some(now_ms);
                debug!("motion: free_fall_started magnitude={}", features.magnitude_g);
                false
            }
            Some(start) => now_ms.saturating_sub(start) >= cfg.min_duration_ms,
        }
    }

    fn detect_shake_violently(&self, features: &MotionFeatures) -> bool {
        let cfg = &self.config.shake;
        features.delta_g > cfg.violent_threshold_g
            || (features.delta_g > cfg.violent_combo_delta_g
                && features.gyro_deg_s > cfg.violent_combo_gyro_deg_s)
    }

    fn detect_flip(&self, features: &MotionFeatures) -> bool {
        let cfg = &self.config.flip;
        features.gyro_deg_s > cfg.threshold_deg_s
            && features.gyro_max_axis_deg_s > cfg.threshold_deg_s * cfg.dominant_axis_ratio
            && features.delta_g > cfg.min_accel_delta_g
    }

    fn detect_pickup(
        &mut self,
        now_ms: u64,
        sample: &ImuSample,
        last: &ImuSample,
        features: &MotionFeatures,
    ) -> bool {
        let out = self.pickup.update(PickupFrame {
            now_ms,
            az: sample.az,
            prev_az: last.az,
            features: *features,
            consecutive_stable: self.consecutive_stable,
            last_significant_motion_ms: self.last_significant_motion_ms,
            stable_delta_g: self.config.stable_delta_g,
        });
        if out.put_down {
            self.consecutive_stable = 0;
        }
        out.detected
    }

    fn detect_upside_down(&mut self, sample: &ImuSample, features: &MotionFeatures) -> bool {
        let cfg = &self.config.upside_down;
        let inverted = sample.az < cfg.threshold_g;
        if inverted && features.delta_g < cfg.max_delta_g {
            self.upside_down_count = self.upside_down_count.saturating_add(1);
            if !self.upside_down && self.upside_down_count >= cfg.stable_count {
                self.upside_down = true;
                debug!("motion: upside_down z={}", sample.az);
                return true;
            }
            return false;
        }
        if self.upside_down && !inverted {
            debug!("motion: upright z={}", sample.az);
            self.upside_down = false;
        }
        self.upside_down_count = 0;
        false
    }
}

fn log_gesture(gesture: MotionGesture, sample: &ImuSample, features: &MotionFeatures) {
    match gesture {
        MotionGesture::FreeFall => warn!("motion: free_fall magnitude={}", features.magnitude_g),
        MotionGesture::ShakeViolently => {
            warn!("motion: shake_violently delta={}", features.delta_g)
        }
        MotionGesture::Flip => info!(
            "motion: flip gyro={} gx={} gy={} gz={}",
            features.gyro_deg_s, sample.gx, sample.gy, sample.gz
        ),
        MotionGesture::Shake => info!("motion: shake delta={}", features.delta_g),
        MotionGesture::Pickup => debug!("motion: pickup z_diff={} z={}", features.z_diff_g, sample.az),
        MotionGesture::UpsideDown => info!("motion: upside_down z={}", sample.az),
    }
}
