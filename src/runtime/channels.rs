use embassy_sync::{
    blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex},
    channel::Channel,
};

use crate::{config::CHANNEL_DEPTH, event::Event};

use super::commands::{CoreCommand, StatsReport};

pub const STATS_DEPTH: usize = 4;

pub type CommandChannel<M> = Channel<M, CoreCommand, CHANNEL_DEPTH>;
pub type EventChannel<M> = Channel<M, Event, CHANNEL_DEPTH>;
pub type StatsChannel<M> = Channel<M, StatsReport, STATS_DEPTH>;

/// Mailboxes around the core actor: commands in, accepted events and stats out.
pub struct CoreChannels<M: RawMutex> {
    pub commands: CommandChannel<M>,
    pub events: EventChannel<M>,
    pub stats: StatsChannel<M>,
}

impl<M: RawMutex> CoreChannels<M> {
    pub const fn new() -> Self {
        Self {
            commands: Channel::new(),
            events: Channel::new(),
            stats: Channel::new(),
        }
    }
}

impl<M: RawMutex> Default for CoreChannels<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Channels shared between executors or interrupt priorities.
pub type SharedCoreChannels = CoreChannels<CriticalSectionRawMutex>;
