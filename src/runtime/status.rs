use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::{affect::Quadrant, orchestrator::Orchestrator};

/// Query state mirrored out of the actor after every command, readable from any
/// context without touching the actor.
pub struct CoreStatus {
    valence_bits: AtomicU32,
    arousal_bits: AtomicU32,
    quadrant: AtomicU8,
    picked_up: AtomicBool,
    upside_down: AtomicBool,
    left_touched: AtomicBool,
    right_touched: AtomicBool,
    imu_stable: AtomicBool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusSnapshot {
    pub valence: f32,
    pub arousal: f32,
    pub quadrant: Quadrant,
    pub picked_up: bool,
    pub upside_down: bool,
    pub left_touched: bool,
    pub right_touched: bool,
    pub imu_stable: bool,
}

impl CoreStatus {
    pub const fn new() -> Self {
        Self {
            valence_bits: AtomicU32::new(0),
            arousal_bits: AtomicU32::new(0),
            quadrant: AtomicU8::new(Quadrant::NegativeLowArousal.as_u8()),
            picked_up: AtomicBool::new(false),
            upside_down: AtomicBool::new(false),
            left_touched: AtomicBool::new(false),
            right_touched: AtomicBool::new(false),
            imu_stable: AtomicBool::new(false),
        }
    }

    pub fn publish(&self, core: &Orchestrator) {
        self.valence_bits
            .store(core.current_valence().to_bits(), Ordering::Relaxed);
        self.arousal_bits
            .store(core.current_arousal().to_bits(), Ordering::Relaxed);
        self.quadrant
            .store(core.current_quadrant().as_u8(), Ordering::Relaxed);
        self.picked_up.store(core.is_picked_up(), Ordering::Relaxed);
        self.upside_down
            .store(core.is_upside_down(), Ordering::Relaxed);
        self.left_touched
            .store(core.is_left_touched(), Ordering::Relaxed);
        self.right_touched
            .store(core.is_right_touched(), Ordering::Relaxed);
        self.imu_stable.store(core.is_imu_stable(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            valence: f32::from_bits(self.valence_bits.load(Ordering::Relaxed)),
            arousal: f32::from_bits(self.arousal_bits.load(Ordering::Relaxed)),
            quadrant: Quadrant::from_u8(self.quadrant.load(Ordering::Relaxed))
                .unwrap_or(Quadrant::NegativeLowArousal),
            picked_up: self.picked_up.load(Ordering::Relaxed),
            upside_down: self.upside_down.load(Ordering::Relaxed),
            left_touched: self.left_touched.load(Ordering::Relaxed),
            right_touched: self.right_touched.load(Ordering::Relaxed),
            imu_stable: self.imu_stable.load(Ordering::Relaxed),
        }
    }
}

impl Default for CoreStatus {
    fn default() -> Self {
        Self::new()
    }
}
