mod types;

pub use types::{
    Event, EventCategory, EventPayload, EventType, ImuSample, PayloadMismatch, TouchPayload,
    TouchPosition,
};
