use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Instant, Ticker};
use log::warn;

use crate::{
    config::{CONDITIONING_POLL_MS, DECAY_TICK_MS, IMU_POLL_MS, TOUCH_POLL_MS},
    telemetry,
};

use super::{
    channels::CoreChannels,
    commands::CoreCommand,
    source::{ImuSource, TouchRead, TouchReader, TouchSource},
};

/// Milliseconds on the core's clock, counted from `epoch`.
pub fn now_ms(epoch: Instant) -> u64 {
    Instant::now().saturating_duration_since(epoch).as_millis()
}

pub async fn touch_poll_loop<M: RawMutex, S: TouchSource>(
    reader: &mut TouchReader<S>,
    channels: &CoreChannels<M>,
    epoch: Instant,
) {
    let mut ticker = Ticker::every(Duration::from_millis(TOUCH_POLL_MS));
    loop {
        ticker.next().await;
        match reader.read().await {
            Ok(TouchRead::Sample(sample)) => {
                let t_ms = now_ms(epoch);
                channels
                    .commands
                    .send(CoreCommand::TouchSample { t_ms, sample })
                    .await;
            }
            Ok(TouchRead::NoSample) => {}
            Ok(TouchRead::Reinitialized) => {
                channels.commands.send(CoreCommand::ResetTouch).await;
            }
            // Already counted and logged by the reader.
            Err(_) => {}
        }
    }
}

pub async fn imu_poll_loop<M: RawMutex, S: ImuSource>(
    source: &mut S,
    channels: &CoreChannels<M>,
    epoch: Instant,
) {
    let mut ticker = Ticker::every(Duration::from_millis(IMU_POLL_MS));
    loop {
        ticker.next().await;
        match source.read() {
            Ok(Some(sample)) => {
                let t_ms = now_ms(epoch);
                channels
                    .commands
                    .send(CoreCommand::MotionSample { t_ms, sample })
                    .await;
            }
            Ok(None) => {}
            Err(err) => {
                telemetry::record_imu_read_failure();
                warn!("imu: read_failed err={:?}", err);
            }
        }
    }
}

pub async fn decay_tick_loop<M: RawMutex>(channels: &CoreChannels<M>, epoch: Instant) {
    let mut ticker = Ticker::every(Duration::from_millis(DECAY_TICK_MS));
    loop {
        ticker.next().await;
        let t_ms = now_ms(epoch);
        channels.commands.send(CoreCommand::DecayTick { t_ms }).await;
    }
}

/// Drives conditioning release (debounce, merge, queue) and batch timeouts.
pub async fn conditioning_poll_loop<M: RawMutex>(channels: &CoreChannels<M>, epoch: Instant) {
    let mut ticker = Ticker::every(Duration::from_millis(CONDITIONING_POLL_MS));
    loop {
        ticker.next().await;
        let t_ms = now_ms(epoch);
        channels.commands.send(CoreCommand::Poll { t_ms }).await;
    }
}
