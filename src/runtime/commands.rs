use crate::{
    conditioning::{ConditioningConfig, EventStats},
    event::{EventType, ImuSample},
    touch::TouchSample,
};

/// Everything that mutates the interaction core arrives as one of these.
#[derive(Clone, Copy, Debug)]
pub enum CoreCommand {
    MotionSample { t_ms: u64, sample: ImuSample },
    TouchSample { t_ms: u64, sample: TouchSample },
    DecayTick { t_ms: u64 },
    Poll { t_ms: u64 },
    Trigger { kind: EventType, t_ms: u64 },
    SetAffect { valence: f32, arousal: f32 },
    Configure { kind: EventType, config: ConditioningConfig },
    /// The touch controller was re-initialized; pad state is stale.
    ResetTouch,
    ReportStats { kind: EventType },
}

impl CoreCommand {
    pub const fn label(&self) -> &'static str {
        match self {
            CoreCommand::MotionSample { .. } => "motion_sample",
            CoreCommand::TouchSample { .. } => "touch_sample",
            CoreCommand::DecayTick { .. } => "decay_tick",
            CoreCommand::Poll { .. } => "poll",
            CoreCommand::Trigger { .. } => "trigger",
            CoreCommand::SetAffect { .. } => "set_affect",
            CoreCommand::Configure { .. } => "configure",
            CoreCommand::ResetTouch => "reset_touch",
            CoreCommand::ReportStats { .. } => "report_stats",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatsReport {
    pub kind: EventType,
    pub stats: EventStats,
}
