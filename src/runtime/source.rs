use core::fmt::Debug;

use embassy_time::Timer;
use log::{error, info, warn};

use crate::{
    config::{TOUCH_READ_ATTEMPTS, TOUCH_RESET_AFTER_FAILURES, TOUCH_RETRY_DELAY_MS},
    event::ImuSample,
    telemetry,
    touch::TouchSample,
};

/// Two-electrode touch controller. `Ok(None)` means no fresh sample this cycle.
pub trait TouchSource {
    type Error: Debug;

    fn read(&mut self) -> Result<Option<TouchSample>, Self::Error>;

    /// Hard reset and re-initialization of the controller.
    fn reinitialize(&mut self) -> Result<(), Self::Error>;
}

pub trait ImuSource {
    type Error: Debug;

    fn read(&mut self) -> Result<Option<ImuSample>, Self::Error>;
}

#[derive(Debug)]
pub enum SourceError<E> {
    Bus(E),
    ResetFailed(E),
}

impl<E> From<E> for SourceError<E> {
    fn from(value: E) -> Self {
        Self::Bus(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u8,
    pub retry_delay_ms: u64,
    /// Consecutive failed polls before the controller is re-initialized.
    pub reset_after_failures: u16,
}

impl RetryPolicy {
    pub const DEFAULT: Self = Self {
        attempts: TOUCH_READ_ATTEMPTS,
        retry_delay_ms: TOUCH_RETRY_DELAY_MS,
        reset_after_failures: TOUCH_RESET_AFTER_FAILURES,
    };
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TouchRead {
    Sample(TouchSample),
    NoSample,
    /// The controller was reset; classifier pad state must be dropped.
    Reinitialized,
}

pub struct TouchReader<S> {
    source: S,
    policy: RetryPolicy,
    consecutive_failures: u16,
}

impl<S: TouchSource> TouchReader<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u16 {
        self.consecutive_failures
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn read(&mut self) -> Result<TouchRead, SourceError<S::Error>> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1u8;
        let last_error = loop {
            match self.source.read() {
                Ok(sample) => {
                    self.consecutive_failures = 0;
                    return Ok(sample.map_or(TouchRead::NoSample, TouchRead::Sample));
                }
                Err(err) if attempt >= attempts => break err,
                Err(err) => {
                    telemetry::record_touch_read_retry();
                    warn!("touch: read_failed attempt={} err={:?}", attempt, err);
                    attempt = attempt.saturating_add(1);
                    if self.policy.retry_delay_ms > 0 {
                        Timer::after_millis(self.policy.retry_delay_ms).await;
                    }
                }
            }
        };

        telemetry::record_touch_read_failure();
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        warn!(
            "touch: poll_failed attempts={} consecutive={} err={:?}",
            attempts, self.consecutive_failures, last_error
        );
        if self.consecutive_failures < self.policy.reset_after_failures {
            return Err(SourceError::from(last_error));
        }

        self.consecutive_failures = 0;
        match self.source.reinitialize() {
            Ok(()) => {
                telemetry::record_touch_reset(true);
                info!("touch: controller_reset ok");
                Ok(TouchRead::Reinitialized)
            }
            Err(err) => {
                telemetry::record_touch_reset(false);
                error!("touch: controller_reset failed err={:?}", err);
                Err(SourceError::ResetFailed(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use embassy_futures::block_on;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Nack;

    #[derive(Default)]
    struct ScriptedTouch {
        reads: VecDeque<Result<Option<TouchSample>, Nack>>,
        reset_ok: bool,
        resets: u32,
    }

    impl TouchSource for ScriptedTouch {
        type Error = Nack;

        fn read(&mut self) -> Result<Option<TouchSample>, Nack> {
            self.reads.pop_front().unwrap_or(Err(Nack))
        }

        fn reinitialize(&mut self) -> Result<(), Nack> {
            self.resets += 1;
            if self.reset_ok {
                Ok(())
            } else {
                Err(Nack)
            }
        }
    }

    const FAST: RetryPolicy = RetryPolicy {
        attempts: 3,
        retry_delay_ms: 0,
        reset_after_failures: 2,
    };

    #[test]
    fn transient_failure_is_retried_within_one_poll() {
        let touched = TouchSample::new(true, false);
        let source = ScriptedTouch {
            reads: VecDeque::from([Err(Nack), Ok(Some(touched))]),
            ..ScriptedTouch::default()
        };
        let mut reader = TouchReader::new(source, FAST);

        assert_eq!(block_on(reader.read()).unwrap(), TouchRead::Sample(touched));
        assert_eq!(reader.consecutive_failures(), 0);
    }

    #[test]
    fn missing_sample_is_not_a_failure() {
        let source = ScriptedTouch {
            reads: VecDeque::from([Ok(None)]),
            ..ScriptedTouch::default()
        };
        let mut reader = TouchReader::new(source, FAST);
        assert_eq!(block_on(reader.read()).unwrap(), TouchRead::NoSample);
    }

    #[test]
    fn repeated_failed_polls_reinitialize_the_controller() {
        let source = ScriptedTouch {
            reset_ok: true,
            ..ScriptedTouch::default()
        };
        let mut reader = TouchReader::new(source, FAST);

        assert!(matches!(block_on(reader.read()), Err(SourceError::Bus(Nack))));
        assert_eq!(reader.consecutive_failures(), 1);
        assert_eq!(block_on(reader.read()).unwrap(), TouchRead::Reinitialized);
        assert_eq!(reader.source().resets, 1);
        assert_eq!(reader.consecutive_failures(), 0);
    }

    #[test]
    fn failed_reset_is_reported() {
        let mut reader = TouchReader::new(ScriptedTouch::default(), FAST);
        let _ = block_on(reader.read());
        assert!(matches!(
            block_on(reader.read()),
            Err(SourceError::ResetFailed(Nack))
        ));
    }
}
