use crate::event::{EventType, ImuSample};

#[derive(Clone, Copy, Debug)]
pub struct FreeFallConfig {
    pub threshold_g: f32,
    pub min_duration_ms: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct ShakeConfig {
    pub normal_threshold_g: f32,
    pub violent_threshold_g: f32,
    /// Moderate delta that still counts as violent when paired with fast rotation.
    pub violent_combo_delta_g: f32,
    pub violent_combo_gyro_deg_s: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct FlipConfig {
    pub threshold_deg_s: f32,
    /// Share of `threshold_deg_s` the strongest single axis must carry.
    pub dominant_axis_ratio: f32,
    pub min_accel_delta_g: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct PickupConfig {
    pub threshold_g: f32,
    pub violent_block_ms: u64,
    pub mild_window_ms: u64,
    pub min_stable_readings: u16,
    pub put_down_stable_count: u16,
    pub put_down_timeout_stable_count: u16,
    pub held_timeout_ms: u64,
    pub drop_step_g: f32,
    pub drop_max_magnitude_g: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct UpsideDownConfig {
    pub threshold_g: f32,
    pub stable_count: u16,
    pub max_delta_g: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct MotionCooldowns {
    pub free_fall_ms: u64,
    pub shake_violent_ms: u64,
    pub flip_ms: u64,
    pub shake_ms: u64,
    pub pickup_ms: u64,
    pub upside_down_ms: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct MotionConfig {
    pub free_fall: FreeFallConfig,
    pub shake: ShakeConfig,
    pub flip: FlipConfig,
    pub pickup: PickupConfig,
    pub upside_down: UpsideDownConfig,
    pub cooldowns: MotionCooldowns,
    /// Frame delta below which a reading counts toward the stability streak.
    pub stable_delta_g: f32,
}

impl MotionConfig {
    pub const DEFAULT: Self = Self {
        free_fall: FreeFallConfig {
            threshold_g: 0.3,
            min_duration_ms: 200,
        },
        shake: ShakeConfig {
            normal_threshold_g: 1.5,
            violent_threshold_g: 3.0,
            violent_combo_delta_g: 2.0,
            violent_combo_gyro_deg_s: 300.0,
        },
        flip: FlipConfig {
            threshold_deg_s: 400.0,
            dominant_axis_ratio: 0.7,
            min_accel_delta_g: 0.5,
        },
        pickup: PickupConfig {
            threshold_g: 0.15,
            violent_block_ms: 800,
            mild_window_ms: 300,
            min_stable_readings: 3,
            put_down_stable_count: 10,
            put_down_timeout_stable_count: 5,
            held_timeout_ms: 8_000,
            drop_step_g: -0.3,
            drop_max_magnitude_g: 1.4,
        },
        upside_down: UpsideDownConfig {
            threshold_g: -0.8,
            stable_count: 10,
            max_delta_g: 0.5,
        },
        cooldowns: MotionCooldowns {
            free_fall_ms: 500,
            shake_violent_ms: 400,
            flip_ms: 300,
            shake_ms: 200,
            pickup_ms: 1_000,
            upside_down_ms: 500,
        },
        stable_delta_g: 0.2,
    };
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Motion gestures in detector priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum MotionGesture {
    FreeFall = 0,
    ShakeViolently = 1,
    Flip = 2,
    Shake = 3,
    Pickup = 4,
    UpsideDown = 5,
}

impl MotionGesture {
    pub const COUNT: usize = 6;

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn event_type(self) -> EventType {
        match self {
            MotionGesture::FreeFall => EventType::FreeFall,
            MotionGesture::ShakeViolently => EventType::ShakeViolently,
            MotionGesture::Flip => EventType::Flip,
            MotionGesture::Shake => EventType::Shake,
            MotionGesture::Pickup => EventType::Pickup,
            MotionGesture::UpsideDown => EventType::UpsideDown,
        }
    }

    /// Violent gestures wipe the stability streak; mild ones only dent it.
    pub const fn is_violent(self) -> bool {
        matches!(
            self,
            MotionGesture::FreeFall | MotionGesture::ShakeViolently | MotionGesture::Flip
        )
    }

    pub const fn cooldown_ms(self, cooldowns: &MotionCooldowns) -> u64 {
        match self {
            MotionGesture::FreeFall => cooldowns.free_fall_ms,
            MotionGesture::ShakeViolently => cooldowns.shake_violent_ms,
            MotionGesture::Flip => cooldowns.flip_ms,
            MotionGesture::Shake => cooldowns.shake_ms,
            MotionGesture::Pickup => cooldowns.pickup_ms,
            MotionGesture::UpsideDown => cooldowns.upside_down_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionEvent {
    pub gesture: MotionGesture,
    pub t_ms: u64,
    pub sample: ImuSample,
}
