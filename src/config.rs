use crate::{
    affect::AffectConfig,
    conditioning::{ConditioningConfig, ConditioningEngine},
    event::EventType,
    motion::MotionConfig,
    touch::TouchConfig,
};

pub const TOUCH_POLL_MS: u64 = 50;
pub const IMU_POLL_MS: u64 = 20;
pub const DECAY_TICK_MS: u64 = 1_000;
pub const CONDITIONING_POLL_MS: u64 = 50;
pub const TOUCH_READ_ATTEMPTS: u8 = 3;
pub const TOUCH_RETRY_DELAY_MS: u64 = 10;
pub const TOUCH_RESET_AFTER_FAILURES: u16 = 10;
pub const CHANNEL_DEPTH: usize = 16;

#[derive(Clone, Copy, Debug)]
pub struct BatchConfig {
    pub enabled: bool,
    pub window_ms: u64,
    pub max_size: usize,
}

impl BatchConfig {
    pub const DEFAULT: Self = Self {
        enabled: true,
        window_ms: 500,
        max_size: 10,
    };
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug)]
pub struct InteractionConfig {
    pub motion: MotionConfig,
    pub touch: TouchConfig,
    pub affect: AffectConfig,
    pub batch: BatchConfig,
    pub default_conditioning: ConditioningConfig,
    pub conditioning: &'static [(EventType, ConditioningConfig)],
}

const DEFAULT_CONDITIONING_TABLE: [(EventType, ConditioningConfig); 4] = [
    (EventType::Tap, ConditioningConfig::touch_tap()),
    (EventType::Shake, ConditioningConfig::motion()),
    (EventType::Flip, ConditioningConfig::motion()),
    (EventType::FreeFall, ConditioningConfig::emergency()),
];

impl InteractionConfig {
    pub const DEFAULT: Self = Self {
        motion: MotionConfig::DEFAULT,
        touch: TouchConfig::DEFAULT,
        affect: AffectConfig::DEFAULT,
        batch: BatchConfig::DEFAULT,
        default_conditioning: ConditioningConfig::DEFAULT,
        conditioning: &DEFAULT_CONDITIONING_TABLE,
    };

    /// Engine seeded with this config's default and per-type table.
    pub fn conditioning_engine(&self) -> ConditioningEngine {
        let mut engine = ConditioningEngine::new(self.default_conditioning);
        self.apply_conditioning(&mut engine);
        engine
    }

    pub fn apply_conditioning(&self, engine: &mut ConditioningEngine) {
        engine.set_default(self.default_conditioning);
        for (kind, config) in self.conditioning {
            engine.configure(*kind, *config);
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static INTERACTION_CONFIG: InteractionConfig = InteractionConfig::DEFAULT;

pub fn active_config() -> &'static InteractionConfig {
    &INTERACTION_CONFIG
}
