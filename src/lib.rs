#![cfg_attr(not(test), no_std)]

pub mod affect;
pub mod conditioning;
pub mod config;
pub mod event;
pub mod motion;
pub mod orchestrator;
pub mod runtime;
pub mod telemetry;
pub mod touch;

pub use affect::{AffectModel, Quadrant};
pub use conditioning::{ConditioningConfig, ConditioningEngine, EventStats, Strategy};
pub use config::{active_config, InteractionConfig};
pub use event::{Event, EventPayload, EventType, ImuSample, TouchPayload, TouchPosition};
pub use orchestrator::{DispatchOutput, Orchestrator};
