#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum EventType {
    #[default]
    None = 0,
    FreeFall = 1,
    ShakeViolently = 2,
    Flip = 3,
    Shake = 4,
    Pickup = 5,
    UpsideDown = 6,
    Tap = 7,
    DoubleTap = 8,
    LongPress = 9,
    Cradled = 10,
    Tickled = 11,
    Hold = 12,
    Release = 13,
    WakeWord = 14,
    Speaking = 15,
    Listening = 16,
    Boot = 17,
    Shutdown = 18,
    SystemError = 19,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventCategory {
    Motion,
    Touch,
    Audio,
    System,
}

impl EventType {
    pub const COUNT: usize = 20;

    pub const ALL: [EventType; Self::COUNT] = [
        EventType::None,
        EventType::FreeFall,
        EventType::ShakeViolently,
        EventType::Flip,
        EventType::Shake,
        EventType::Pickup,
        EventType::UpsideDown,
        EventType::Tap,
        EventType::DoubleTap,
        EventType::LongPress,
        EventType::Cradled,
        EventType::Tickled,
        EventType::Hold,
        EventType::Release,
        EventType::WakeWord,
        EventType::Speaking,
        EventType::Listening,
        EventType::Boot,
        EventType::Shutdown,
        EventType::SystemError,
    ];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn category(self) -> EventCategory {
        match self {
            EventType::None
            | EventType::FreeFall
            | EventType::ShakeViolently
            | EventType::Flip
            | EventType::Shake
            | EventType::Pickup
            | EventType::UpsideDown => EventCategory::Motion,
            EventType::Tap
            | EventType::DoubleTap
            | EventType::LongPress
            | EventType::Cradled
            | EventType::Tickled
            | EventType::Hold
            | EventType::Release => EventCategory::Touch,
            EventType::WakeWord | EventType::Speaking | EventType::Listening => {
                EventCategory::Audio
            }
            EventType::Boot | EventType::Shutdown | EventType::SystemError => {
                EventCategory::System
            }
        }
    }
}

/// One inertial reading: acceleration in g, angular rate in deg/s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImuSample {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
    pub temperature: f32,
}

impl ImuSample {
    pub const fn accel(ax: f32, ay: f32, az: f32) -> Self {
        Self {
            ax,
            ay,
            az,
            gx: 0.0,
            gy: 0.0,
            gz: 0.0,
            temperature: 0.0,
        }
    }

    pub const fn with_gyro(mut self, gx: f32, gy: f32, gz: f32) -> Self {
        self.gx = gx;
        self.gy = gy;
        self.gz = gz;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum TouchPosition {
    Left = 0,
    Right = 1,
    Both = 2,
    #[default]
    Any = 3,
}

impl TouchPosition {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TouchPayload {
    pub position: TouchPosition,
    pub duration_ms: u32,
    pub tap_count: u16,
}

impl Default for TouchPayload {
    fn default() -> Self {
        Self {
            position: TouchPosition::Any,
            duration_ms: 0,
            tap_count: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventPayload {
    Imu(ImuSample),
    Touch(TouchPayload),
    Audio { level: i32 },
    System { code: i32 },
}

impl EventPayload {
    pub const fn category(&self) -> EventCategory {
        match self {
            EventPayload::Imu(_) => EventCategory::Motion,
            EventPayload::Touch(_) => EventCategory::Touch,
            EventPayload::Audio { .. } => EventCategory::Audio,
            EventPayload::System { .. } => EventCategory::System,
        }
    }

    pub fn default_for(kind: EventType) -> Self {
        match kind.category() {
            EventCategory::Motion => EventPayload::Imu(ImuSample::default()),
            EventCategory::Touch => EventPayload::Touch(TouchPayload::default()),
            EventCategory::Audio => EventPayload::Audio { level: 0 },
            EventCategory::System => EventPayload::System { code: 0 },
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PayloadMismatch {
    pub kind: EventType,
    pub payload: EventCategory,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    pub kind: EventType,
    pub t_ms: u64,
    pub payload: EventPayload,
}

impl Event {
    pub fn try_new(
        kind: EventType,
        t_ms: u64,
        payload: EventPayload,
    ) -> Result<Self, PayloadMismatch> {
        if kind.category() != payload.category() {
            return Err(PayloadMismatch {
                kind,
                payload: payload.category(),
            });
        }
        Ok(Self {
            kind,
            t_ms,
            payload,
        })
    }

    /// Event with the neutral payload for its category (manual injection).
    pub fn bare(kind: EventType, t_ms: u64) -> Self {
        Self {
            kind,
            t_ms,
            payload: EventPayload::default_for(kind),
        }
    }

    pub fn motion(kind: EventType, t_ms: u64, sample: ImuSample) -> Self {
        debug_assert!(matches!(kind.category(), EventCategory::Motion));
        Self {
            kind,
            t_ms,
            payload: EventPayload::Imu(sample),
        }
    }

    pub fn touch(kind: EventType, t_ms: u64, touch: TouchPayload) -> Self {
        debug_assert!(matches!(kind.category(), EventCategory::Touch));
        Self {
            kind,
            t_ms,
            payload: EventPayload::Touch(touch),
        }
    }

    pub fn payload_matches_kind(&self) -> bool {
        self.kind.category() == self.payload.category()
    }

    pub fn touch_payload(&self) -> Option<&TouchPayload> {
        match &self.payload {
            EventPayload::Touch(touch) => Some(touch),
            _ => None,
        }
    }

    pub fn touch_payload_mut(&mut self) -> Option<&mut TouchPayload> {
        match &mut self.payload {
            EventPayload::Touch(touch) => Some(touch),
            _ => None,
        }
    }

    pub fn imu_sample(&self) -> Option<&ImuSample> {
        match &self.payload {
            EventPayload::Imu(sample) => Some(sample),
            _ => None,
        }
    }
}
