//! Two-axis affect state (valence, arousal) driven by gesture impacts and a
//! periodic pull back toward a baseline.

use log::{debug, info};

use crate::event::EventType;

#[derive(Clone, Copy, Debug)]
pub struct AffectConfig {
    pub initial_valence: f32,
    pub initial_arousal: f32,
    pub baseline_valence: f32,
    pub baseline_arousal: f32,
    /// Per-tick step toward baseline while an event is recent.
    pub slow_decay_per_tick: f32,
    /// Per-tick step once `fast_decay_after_ms` has passed without events.
    pub fast_decay_per_tick: f32,
    pub fast_decay_after_ms: u64,
    pub tick_period_ms: u64,
    pub decay_enabled: bool,
}

impl AffectConfig {
    pub const DEFAULT: Self = Self {
        initial_valence: 0.2,
        initial_arousal: 0.2,
        baseline_valence: 0.2,
        baseline_arousal: 0.2,
        slow_decay_per_tick: 0.01,
        fast_decay_per_tick: 0.05,
        fast_decay_after_ms: 15_000,
        tick_period_ms: 1_000,
        decay_enabled: true,
    };
}

impl Default for AffectConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Quadrant {
    PositiveHighArousal = 0,
    PositiveLowArousal = 1,
    NegativeHighArousal = 2,
    NegativeLowArousal = 3,
}

impl Quadrant {
    /// Zero counts as negative valence and low arousal.
    pub fn classify(valence: f32, arousal: f32) -> Self {
        match (valence > 0.0, arousal > 0.0) {
            (true, true) => Quadrant::PositiveHighArousal,
            (true, false) => Quadrant::PositiveLowArousal,
            (false, true) => Quadrant::NegativeHighArousal,
            (false, false) => Quadrant::NegativeLowArousal,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Quadrant::PositiveHighArousal),
            1 => Some(Quadrant::PositiveLowArousal),
            2 => Some(Quadrant::NegativeHighArousal),
            3 => Some(Quadrant::NegativeLowArousal),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    pub valence: f32,
    pub arousal: f32,
}

impl Impact {
    const fn new(valence: f32, arousal: f32) -> Self {
        Self { valence, arousal }
    }
}

pub const fn impact_for(kind: EventType) -> Option<Impact> {
    let impact = match kind {
        EventType::FreeFall => Impact::new(-0.8, 0.9),
        EventType::ShakeViolently => Impact::new(-0.3, 0.7),
        EventType::Flip => Impact::new(0.2, 0.4),
        EventType::Shake => Impact::new(0.1, 0.3),
        EventType::Pickup => Impact::new(0.05, 0.2),
        EventType::UpsideDown => Impact::new(-0.2, 0.3),
        EventType::Tap => Impact::new(0.1, 0.1),
        EventType::LongPress => Impact::new(0.3, -0.1),
        EventType::Cradled => Impact::new(0.5, -0.3),
        EventType::Tickled => Impact::new(0.4, 0.6),
        EventType::WakeWord => Impact::new(0.1, 0.3),
        EventType::Speaking => Impact::new(0.0, 0.2),
        EventType::Listening => Impact::new(0.0, -0.1),
        _ => return None,
    };
    Some(impact)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffectModel {
    valence: f32,
    arousal: f32,
    baseline_valence: f32,
    baseline_arousal: f32,
    slow_decay_per_tick: f32,
    fast_decay_per_tick: f32,
    fast_decay_after_ms: u64,
    decay_enabled: bool,
    last_event_ms: u64,
}

impl Default for AffectModel {
    fn default() -> Self {
        Self::new(AffectConfig::DEFAULT)
    }
}

impl AffectModel {
    pub fn new(config: AffectConfig) -> Self {
        Self {
            valence: clamp_unit(config.initial_valence),
            arousal: clamp_unit(config.initial_arousal),
            baseline_valence: clamp_unit(config.baseline_valence),
            baseline_arousal: clamp_unit(config.baseline_arousal),
            slow_decay_per_tick: clamp_rate(config.slow_decay_per_tick),
            fast_decay_per_tick: clamp_rate(config.fast_decay_per_tick),
            fast_decay_after_ms: config.fast_decay_after_ms,
            decay_enabled: config.decay_enabled,
            last_event_ms: 0,
        }
    }

    pub fn valence(&self) -> f32 {
        self.valence
    }

    pub fn arousal(&self) -> f32 {
        self.arousal
    }

    pub fn coordinates(&self) -> (f32, f32) {
        (self.valence, self.arousal)
    }

    pub fn quadrant(&self) -> Quadrant {
        Quadrant::classify(self.valence, self.arousal)
    }

    pub fn baseline(&self) -> (f32, f32) {
        (self.baseline_valence, self.baseline_arousal)
    }

    pub fn decay_rates(&self) -> (f32, f32) {
        (self.slow_decay_per_tick, self.fast_decay_per_tick)
    }

    pub fn last_event_ms(&self) -> u64 {
        self.last_event_ms
    }

    /// Records the event time and applies its impact. Returns whether the state
    /// was moved (unmapped kinds only refresh the event time).
    pub fn apply_impact(&mut self, kind: EventType, now_ms: u64) -> bool {
        self.last_event_ms = now_ms;
        let Some(impact) = impact_for(kind) else {
            return false;
        };
        self.valence = clamp_unit(self.valence + impact.valence);
        self.arousal = clamp_unit(self.arousal + impact.arousal);
        debug!(
            "affect: impact kind={:?} dv={} da={} v={} a={}",
            kind, impact.valence, impact.arousal, self.valence, self.arousal
        );
        true
    }

    /// Direct override; does not count as an event for decay timing.
    pub fn set_state(&mut self, valence: f32, arousal: f32) {
        self.valence = clamp_unit(valence);
        self.arousal = clamp_unit(arousal);
        info!("affect: set_state v={} a={}", self.valence, self.arousal);
    }

    pub fn set_baseline(&mut self, valence: f32, arousal: f32) {
        self.baseline_valence = clamp_unit(valence);
        self.baseline_arousal = clamp_unit(arousal);
        info!(
            "affect: baseline v={} a={}",
            self.baseline_valence, self.baseline_arousal
        );
    }

    /// Sets the slow rate; the fast rate follows at five times it.
    pub fn set_decay_rate(&mut self, rate: f32) {
        self.slow_decay_per_tick = clamp_rate(rate);
        self.fast_decay_per_tick = clamp_rate(rate * 5.0);
        info!(
            "affect: decay_rates slow={} fast={}",
            self.slow_decay_per_tick, self.fast_decay_per_tick
        );
    }

    pub fn set_decay_enabled(&mut self, enabled: bool) {
        self.decay_enabled = enabled;
        info!("affect: decay_enabled={}", enabled);
    }

    pub fn is_decay_enabled(&self) -> bool {
        self.decay_enabled
    }

    /// One decay step toward baseline. Returns whether the state moved.
    pub fn tick_decay(&mut self, now_ms: u64) -> bool {
        if !self.decay_enabled {
            return false;
        }
        let idle_ms = now_ms.saturating_sub(self.last_event_ms);
        let rate = if idle_ms < self.fast_decay_after_ms {
            self.slow_decay_per_tick
        } else {
            self.fast_decay_per_tick
        };

        let dv = step_toward(self.valence, self.baseline_valence, rate);
        let da = step_toward(self.arousal, self.baseline_arousal, rate);
        if dv == 0.0 && da == 0.0 {
            return false;
        }
        self.valence = clamp_unit(self.valence + dv);
        self.arousal = clamp_unit(self.arousal + da);
        debug!(
            "affect: decay idle_ms={} rate={} v={} a={}",
            idle_ms, rate, self.valence, self.arousal
        );
        true
    }
}

/// Step from `current` toward `target`, capped at `rate` so it never overshoots.
fn step_toward(current: f32, target: f32, rate: f32) -> f32 {
    let diff = target - current;
    if diff > 0.0 {
        diff.min(rate)
    } else {
        diff.max(-rate)
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-1.0, 1.0)
    }
}

fn clamp_rate(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
