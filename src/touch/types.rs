use crate::event::TouchPosition;

#[derive(Clone, Copy, Debug)]
pub struct TouchConfig {
    pub debounce_ms: u64,
    pub tap_max_ms: u64,
    pub hold_min_ms: u64,
    /// Extra wait before a one-sided hold fires, giving the other side a chance.
    pub hold_grace_ms: u64,
    pub cradled_min_ms: u64,
    pub tickle_window_ms: u64,
    pub tickle_min_touches: u8,
}

impl TouchConfig {
    pub const DEFAULT: Self = Self {
        debounce_ms: 50,
        tap_max_ms: 500,
        hold_min_ms: 500,
        hold_grace_ms: 200,
        cradled_min_ms: 2_000,
        tickle_window_ms: 2_000,
        tickle_min_touches: 5,
    };
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TouchSample {
    pub left: bool,
    pub right: bool,
}

impl TouchSample {
    pub const RELEASED: Self = Self {
        left: false,
        right: false,
    };

    pub const fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum TouchGesture {
    Tap = 0,
    Hold = 1,
    Cradled = 2,
    Tickled = 3,
}

impl TouchGesture {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TouchEvent {
    pub gesture: TouchGesture,
    pub position: TouchPosition,
    pub t_ms: u64,
    pub duration_ms: u32,
}

/// Gestures produced by one classifier cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TouchOutput {
    len: usize,
    slots: [Option<TouchEvent>; Self::MAX],
}

impl TouchOutput {
    pub const MAX: usize = 4;

    pub const fn new() -> Self {
        Self {
            len: 0,
            slots: [None; Self::MAX],
        }
    }

    pub fn push(&mut self, event: TouchEvent) {
        if self.len >= Self::MAX {
            return;
        }
        self.slots[self.len] = Some(event);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &TouchEvent> {
        self.slots[..self.len].iter().filter_map(Option::as_ref)
    }

    pub fn contains(&self, gesture: TouchGesture) -> bool {
        self.iter().any(|event| event.gesture == gesture)
    }
}

impl Default for TouchOutput {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn clamp_ms(ms: u64) -> u32 {
    u32::try_from(ms).unwrap_or(u32::MAX)
}
