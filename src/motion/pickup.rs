use log::{debug, info};
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    features::{abs_f32, MotionFeatures},
    types::PickupConfig,
};

const IMPACT_PREV_Z_MAX_G: f32 = 0.9;
const IMPACT_NEAR_1G_MIN: f32 = 0.8;
const IMPACT_NEAR_1G_MAX: f32 = 1.2;
const IMPACT_DELTA_MIN_G: f32 = 0.8;
const SURFACE_Z_MIN_G: f32 = 0.85;
const SURFACE_Z_MAX_G: f32 = 1.15;
const SURFACE_XY_MAX_G: f32 = 0.5;
const ATTITUDE_CHANGE_MIN_G: f32 = 0.4;
const PUT_DOWN_Z_MIN_G: f32 = 0.7;
const PUT_DOWN_Z_MAX_G: f32 = 1.3;

/// Everything the pickup machine needs from one motion frame.
#[derive(Clone, Copy, Debug)]
pub(super) struct PickupFrame {
    pub now_ms: u64,
    pub az: f32,
    pub prev_az: f32,
    pub features: MotionFeatures,
    pub consecutive_stable: u16,
    pub last_significant_motion_ms: Option<u64>,
    pub stable_delta_g: f32,
}

#[derive(Clone, Copy, Debug)]
enum PickupHsmEvent {
    Frame(PickupFrame),
    Reset,
}

#[derive(Default)]
struct DispatchContext {
    detected: bool,
    put_down: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct PickupOutput {
    pub detected: bool,
    pub put_down: bool,
}

pub(super) struct PickupDetector {
    machine: statig::blocking::StateMachine<PickupHsm>,
}

impl PickupDetector {
    pub fn new(config: PickupConfig) -> Self {
        Self {
            machine: PickupHsm::new(config).state_machine(),
        }
    }

    pub fn update(&mut self, frame: PickupFrame) -> PickupOutput {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&PickupHsmEvent::Frame(frame), &mut context);
        PickupOutput {
            detected: context.detected,
            put_down: context.put_down,
        }
    }

    pub fn reset(&mut self) {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&PickupHsmEvent::Reset, &mut context);
    }

    pub fn is_picked_up(&self) -> bool {
        self.machine.inner().picked_up
    }
}

struct PickupHsm {
    config: PickupConfig,
    picked_up: bool,
    stable_count: u16,
    stable_z_reference: f32,
    pickup_start_ms: u64,
}

impl PickupHsm {
    fn new(config: PickupConfig) -> Self {
        Self {
            config,
            picked_up: false,
            stable_count: 0,
            stable_z_reference: 1.0,
            pickup_start_ms: 0,
        }
    }

    fn clear(&mut self) {
        self.picked_up = false;
        self.stable_count = 0;
        self.stable_z_reference = 1.0;
        self.pickup_start_ms = 0;
    }

    fn count_stable(&mut self, relatively_stable: bool) {
        if relatively_stable {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.stable_count = 0;
        }
    }

    /// Returns true when the frame looks like the device leaving a surface.
    fn assess_lift(&mut self, frame: &PickupFrame) -> bool {
        let cfg = self.config;
        let f = frame.features;

        let since_motion = frame
            .last_significant_motion_ms
            .map(|last| frame.now_ms.saturating_sub(last));
        let recent_violent = since_motion.is_some_and(|dt| dt < cfg.violent_block_ms);
        let recent_mild = since_motion.is_some_and(|dt| dt < cfg.mild_window_ms);

        if recent_violent {
            self.stable_count = 0;
            return false;
        }
        if !recent_mild && frame.consecutive_stable < cfg.min_stable_readings {
            return false;
        }

        let abs_z = abs_f32(frame.az);
        let impact_pattern = frame.prev_az < IMPACT_PREV_Z_MAX_G
            && abs_z > IMPACT_NEAR_1G_MIN
            && abs_z < IMPACT_NEAR_1G_MAX
            && f.delta_g > IMPACT_DELTA_MIN_G;
        if impact_pattern {
            debug!(
                "motion: pickup_blocked reason=impact prev_z={} z={} delta={}",
                frame.prev_az, frame.az, f.delta_g
            );
            self.stable_count = 0;
            return false;
        }

        let likely_on_surface = abs_z > SURFACE_Z_MIN_G
            && abs_z < SURFACE_Z_MAX_G
            && f.horizontal_g < SURFACE_XY_MAX_G;
        if likely_on_surface && f.z_diff_g > 0.0 && f.z_diff_g < cfg.threshold_g * 2.0 {
            self.stable_count = 0;
            return false;
        }

        let relatively_stable = f.delta_g < frame.stable_delta_g;
        if relatively_stable {
            self.stable_z_reference = frame.az;
        }
        self.count_stable(relatively_stable);

        let clear_upward = f.z_diff_g > cfg.threshold_g;
        let gradual_upward = clear_upward && relatively_stable && !likely_on_surface;
        let magnitude_change = abs_f32(f.magnitude_g - f.prev_magnitude_g) > cfg.threshold_g;
        let attitude_change = abs_f32(frame.az - self.stable_z_reference) > ATTITUDE_CHANGE_MIN_G;
        let downward = f.z_diff_g < -cfg.threshold_g;

        if downward {
            return false;
        }
        clear_upward
            || (gradual_upward && attitude_change)
            || (magnitude_change && attitude_change && relatively_stable)
    }

    /// Returns true once the device has settled back down.
    fn assess_settle(&mut self, frame: &PickupFrame) -> bool {
        let cfg = self.config;
        let f = frame.features;
        let held_ms = frame.now_ms.saturating_sub(self.pickup_start_ms);
        let timed_out = held_ms > cfg.held_timeout_ms;

        self.count_stable(f.delta_g < frame.stable_delta_g);
        let required = if timed_out {
            cfg.put_down_timeout_stable_count
        } else {
            cfg.put_down_stable_count
        };
        let abs_z = abs_f32(frame.az);
        if self.stable_count >= required && abs_z > PUT_DOWN_Z_MIN_G && abs_z < PUT_DOWN_Z_MAX_G {
            return true;
        }

        timed_out && f.z_diff_g < cfg.drop_step_g && f.magnitude_g < cfg.drop_max_magnitude_g
    }
}

#[state_machine(initial = "State::resting()")]
impl PickupHsm {
    #[state(superstate = "tracking")]
    fn resting(&mut self, context: &mut DispatchContext, event: &PickupHsmEvent) -> Outcome<State> {
        match event {
            PickupHsmEvent::Frame(frame) => {
                if !self.assess_lift(frame) {
                    return Handled;
                }
                self.picked_up = true;
                self.stable_count = 0;
                self.pickup_start_ms = frame.now_ms;
                context.detected = true;
                info!(
                    "motion: picked_up z_diff={} z={}",
                    frame.features.z_diff_g, frame.az
                );
                Transition(State::held())
            }
            PickupHsmEvent::Reset => Super,
        }
    }

    #[state(superstate = "tracking")]
    fn held(&mut self, context: &mut DispatchContext, event: &PickupHsmEvent) -> Outcome<State> {
        match event {
            PickupHsmEvent::Frame(frame) => {
                if !self.assess_settle(frame) {
                    return Handled;
                }
                self.picked_up = false;
                self.stable_count = 0;
                context.put_down = true;
                info!(
                    "motion: put_down z={} held_ms={}",
                    frame.az,
                    frame.now_ms.saturating_sub(self.pickup_start_ms)
                );
                Transition(State::resting())
            }
            PickupHsmEvent::Reset => Super,
        }
    }

    #[superstate]
    fn tracking(&mut self, context: &mut DispatchContext, event: &PickupHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            PickupHsmEvent::Reset => {
                self.clear();
                Transition(State::resting())
            }
            PickupHsmEvent::Frame(_) => Handled,
        }
    }
}
