use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{debug, info, warn};

use crate::{
    orchestrator::{DispatchOutput, Orchestrator},
    telemetry,
};

use super::{
    channels::CoreChannels,
    commands::{CoreCommand, StatsReport},
    status::CoreStatus,
};

/// Sole owner of the orchestrator. Pollers and other tasks only talk to it
/// through [`CoreChannels`], so every mutation happens on this task.
pub struct CoreActor<'a, M: RawMutex> {
    core: Orchestrator,
    channels: &'a CoreChannels<M>,
    status: &'a CoreStatus,
}

impl<'a, M: RawMutex> CoreActor<'a, M> {
    pub fn new(core: Orchestrator, channels: &'a CoreChannels<M>, status: &'a CoreStatus) -> Self {
        status.publish(&core);
        Self {
            core,
            channels,
            status,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.core
    }

    /// Observer registration happens here, before the actor starts running.
    pub fn orchestrator_mut(&mut self) -> &mut Orchestrator {
        &mut self.core
    }

    pub async fn run(&mut self) {
        info!("core: actor_started");
        loop {
            let command = self.channels.commands.receive().await;
            self.handle(command);
        }
    }

    pub fn handle(&mut self, command: CoreCommand) {
        let output = match command {
            CoreCommand::MotionSample { t_ms, sample } => self.core.motion_sample(t_ms, sample),
            CoreCommand::TouchSample { t_ms, sample } => self.core.touch_sample(t_ms, sample),
            CoreCommand::DecayTick { t_ms } => {
                self.core.decay_tick(t_ms);
                DispatchOutput::default()
            }
            CoreCommand::Poll { t_ms } => self.core.poll(t_ms),
            CoreCommand::Trigger { kind, t_ms } => self.core.trigger_event(kind, t_ms),
            CoreCommand::SetAffect { valence, arousal } => {
                self.core.set_affect(valence, arousal);
                DispatchOutput::default()
            }
            CoreCommand::Configure { kind, config } => {
                self.core.configure(kind, config);
                DispatchOutput::default()
            }
            CoreCommand::ResetTouch => {
                self.core.reset_touch();
                DispatchOutput::default()
            }
            CoreCommand::ReportStats { kind } => {
                let report = StatsReport {
                    kind,
                    stats: self.core.event_stats(kind),
                };
                if self.channels.stats.try_send(report).is_err() {
                    warn!("core: stats_dropped kind={:?}", kind);
                }
                DispatchOutput::default()
            }
        };

        self.forward(&output);
        self.status.publish(&self.core);
        telemetry::record_command_handled();
        debug!(
            "core: handled command={} emitted={}",
            command.label(),
            output.len()
        );
    }

    fn forward(&self, output: &DispatchOutput) {
        for event in output.iter() {
            if self.channels.events.try_send(*event).is_err() {
                telemetry::record_outbound_event_dropped();
                warn!(
                    "core: outbound_full dropped kind={:?} t_ms={}",
                    event.kind, event.t_ms
                );
            }
        }
    }
}
