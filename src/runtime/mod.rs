//! Task plumbing around the orchestrator: one actor owns all interaction state
//! and the pollers feed it through channels.

mod actor;
mod channels;
mod commands;
mod pollers;
mod source;
mod status;

pub use actor::CoreActor;
pub use channels::{
    CommandChannel, CoreChannels, EventChannel, SharedCoreChannels, StatsChannel, STATS_DEPTH,
};
pub use commands::{CoreCommand, StatsReport};
pub use pollers::{conditioning_poll_loop, decay_tick_loop, imu_poll_loop, now_ms, touch_poll_loop};
pub use source::{ImuSource, RetryPolicy, SourceError, TouchRead, TouchReader, TouchSource};
pub use status::{CoreStatus, StatusSnapshot};
