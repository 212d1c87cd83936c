use core::sync::atomic::{AtomicU32, Ordering};

static EVENTS_DISPATCHED: AtomicU32 = AtomicU32::new(0);
static EVENTS_SUPPRESSED: AtomicU32 = AtomicU32::new(0);
static BATCHES_FLUSHED: AtomicU32 = AtomicU32::new(0);
static OUTBOUND_EVENTS_DROPPED: AtomicU32 = AtomicU32::new(0);
static PAYLOAD_MISMATCHES: AtomicU32 = AtomicU32::new(0);
static TOUCH_READ_FAILURES: AtomicU32 = AtomicU32::new(0);
static TOUCH_READ_RETRIES: AtomicU32 = AtomicU32::new(0);
static TOUCH_RESETS: AtomicU32 = AtomicU32::new(0);
static TOUCH_RESET_FAILURES: AtomicU32 = AtomicU32::new(0);
static IMU_READ_FAILURES: AtomicU32 = AtomicU32::new(0);
static COMMANDS_HANDLED: AtomicU32 = AtomicU32::new(0);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TelemetrySnapshot {
    pub events_dispatched: u32,
    pub events_suppressed: u32,
    pub batches_flushed: u32,
    pub outbound_events_dropped: u32,
    pub payload_mismatches: u32,
    pub touch_read_failures: u32,
    pub touch_read_retries: u32,
    pub touch_resets: u32,
    pub touch_reset_failures: u32,
    pub imu_read_failures: u32,
    pub commands_handled: u32,
}

pub fn snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        events_dispatched: EVENTS_DISPATCHED.load(Ordering::Relaxed),
        events_suppressed: EVENTS_SUPPRESSED.load(Ordering::Relaxed),
        batches_flushed: BATCHES_FLUSHED.load(Ordering::Relaxed),
        outbound_events_dropped: OUTBOUND_EVENTS_DROPPED.load(Ordering::Relaxed),
        payload_mismatches: PAYLOAD_MISMATCHES.load(Ordering::Relaxed),
        touch_read_failures: TOUCH_READ_FAILURES.load(Ordering::Relaxed),
        touch_read_retries: TOUCH_READ_RETRIES.load(Ordering::Relaxed),
        touch_resets: TOUCH_RESETS.load(Ordering::Relaxed),
        touch_reset_failures: TOUCH_RESET_FAILURES.load(Ordering::Relaxed),
        imu_read_failures: IMU_READ_FAILURES.load(Ordering::Relaxed),
        commands_handled: COMMANDS_HANDLED.load(Ordering::Relaxed),
    }
}

pub(crate) fn record_event_dispatched() {
    EVENTS_DISPATCHED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_event_suppressed() {
    EVENTS_SUPPRESSED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_batch_flushed() {
    BATCHES_FLUSHED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_outbound_event_dropped() {
    OUTBOUND_EVENTS_DROPPED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_payload_mismatch() {
    PAYLOAD_MISMATCHES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_touch_read_failure() {
    TOUCH_READ_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_touch_read_retry() {
    TOUCH_READ_RETRIES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_touch_reset(ok: bool) {
    TOUCH_RESETS.fetch_add(1, Ordering::Relaxed);
    if !ok {
        TOUCH_RESET_FAILURES.fetch_add(1, Ordering::Relaxed);
    }
}

pub(crate) fn record_imu_read_failure() {
    IMU_READ_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_command_handled() {
    COMMANDS_HANDLED.fetch_add(1, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Counters are process-wide and other tests bump them concurrently, so only
    // monotonic growth is asserted.
    #[test]
    fn reset_failure_counts_as_reset_too() {
        let before = snapshot();
        record_touch_reset(false);
        record_touch_reset(true);
        let after = snapshot();
        assert!(after.touch_resets >= before.touch_resets + 2);
        assert!(after.touch_reset_failures > before.touch_reset_failures);
    }
}
