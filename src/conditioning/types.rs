#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum Strategy {
    #[default]
    Immediate = 0,
    Debounce = 1,
    Throttle = 2,
    Queue = 3,
    Merge = 4,
    Cooldown = 5,
}

impl Strategy {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Immediate => "immediate",
            Strategy::Debounce => "debounce",
            Strategy::Throttle => "throttle",
            Strategy::Queue => "queue",
            Strategy::Merge => "merge",
            Strategy::Cooldown => "cooldown",
        }
    }
}

/// Per-type shaping policy. Which fields matter depends on `strategy`:
/// `interval_ms` for debounce/throttle/cooldown/queue, `merge_window_ms` for merge,
/// `max_queue_size` for queue. `allow_interrupt` is carried for consumers that
/// preempt running reactions and is not consulted by the engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConditioningConfig {
    pub strategy: Strategy,
    pub interval_ms: u32,
    pub merge_window_ms: u32,
    pub max_queue_size: u8,
    pub allow_interrupt: bool,
}

impl ConditioningConfig {
    pub const DEFAULT: Self = Self {
        strategy: Strategy::Immediate,
        interval_ms: 500,
        merge_window_ms: 1_000,
        max_queue_size: 10,
        allow_interrupt: false,
    };

    pub const fn immediate() -> Self {
        Self::DEFAULT
    }

    pub const fn debounce(interval_ms: u32) -> Self {
        Self {
            strategy: Strategy::Debounce,
            interval_ms,
            ..Self::DEFAULT
        }
    }

    pub const fn throttle(interval_ms: u32) -> Self {
        Self {
            strategy: Strategy::Throttle,
            interval_ms,
            ..Self::DEFAULT
        }
    }

    pub const fn cooldown(interval_ms: u32) -> Self {
        Self {
            strategy: Strategy::Cooldown,
            interval_ms,
            ..Self::DEFAULT
        }
    }

    pub const fn queue(interval_ms: u32, max_queue_size: u8) -> Self {
        Self {
            strategy: Strategy::Queue,
            interval_ms,
            max_queue_size,
            ..Self::DEFAULT
        }
    }

    pub const fn merge(merge_window_ms: u32) -> Self {
        Self {
            strategy: Strategy::Merge,
            merge_window_ms,
            ..Self::DEFAULT
        }
    }

    pub const fn touch_tap() -> Self {
        Self::cooldown(300)
    }

    pub const fn multi_tap() -> Self {
        Self {
            strategy: Strategy::Merge,
            interval_ms: 500,
            merge_window_ms: 2_000,
            ..Self::DEFAULT
        }
    }

    pub const fn motion() -> Self {
        Self::throttle(1_000)
    }

    pub const fn emergency() -> Self {
        Self {
            strategy: Strategy::Immediate,
            allow_interrupt: true,
            ..Self::DEFAULT
        }
    }

    pub const fn queued() -> Self {
        Self::queue(800, 5)
    }

    pub(super) fn clamped(self, queue_capacity: usize) -> Self {
        let cap = u8::try_from(queue_capacity).unwrap_or(u8::MAX);
        Self {
            max_queue_size: self.max_queue_size.min(cap),
            ..self
        }
    }
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EventStats {
    pub received: u32,
    pub processed: u32,
    pub dropped: u32,
    pub merged: u32,
    pub last_process_ms: u64,
}
