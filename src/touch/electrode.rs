use log::{debug, info};
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::event::TouchPosition;

use super::types::TouchConfig;

#[derive(Clone, Copy, Debug)]
enum ElectrodeEvent {
    /// Debounced contact level for this cycle.
    Level { now_ms: u64, touched: bool },
    ConfirmHold { now_ms: u64 },
    Suppress,
    Reset,
}

#[derive(Default)]
struct DispatchContext {
    pressed: bool,
    tap_ms: Option<u64>,
    hold_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct ElectrodeOutput {
    /// Rising edge accepted this cycle.
    pub pressed: bool,
    /// Completed tap and its contact duration.
    pub tap_ms: Option<u64>,
}

/// One touch pad: debounce filter in front of a press/hold state machine.
pub(super) struct Electrode {
    position: TouchPosition,
    debounce_ms: u64,
    was_touched: bool,
    last_change_ms: Option<u64>,
    machine: statig::blocking::StateMachine<ElectrodeHsm>,
}

impl Electrode {
    pub fn new(position: TouchPosition, config: &TouchConfig) -> Self {
        Self {
            position,
            debounce_ms: config.debounce_ms,
            was_touched: false,
            last_change_ms: None,
            machine: ElectrodeHsm::new(position, config).state_machine(),
        }
    }

    pub fn update(&mut self, now_ms: u64, touched: bool) -> ElectrodeOutput {
        if touched != self.was_touched {
            let bouncing = self
                .last_change_ms
                .is_some_and(|last| now_ms.saturating_sub(last) < self.debounce_ms);
            if bouncing {
                return ElectrodeOutput::default();
            }
            self.last_change_ms = Some(now_ms);
        }
        self.was_touched = touched;

        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&ElectrodeEvent::Level { now_ms, touched }, &mut context);
        ElectrodeOutput {
            pressed: context.pressed,
            tap_ms: context.tap_ms,
        }
    }

    /// Fires the pending hold; returns its duration net of the grace delay.
    pub fn confirm_hold(&mut self, now_ms: u64) -> Option<u64> {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&ElectrodeEvent::ConfirmHold { now_ms }, &mut context);
        context.hold_ms
    }

    /// Marks a pending hold as handled without emitting it.
    pub fn suppress(&mut self) {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&ElectrodeEvent::Suppress, &mut context);
    }

    pub fn reset(&mut self) {
        self.was_touched = false;
        self.last_change_ms = None;
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&ElectrodeEvent::Reset, &mut context);
    }

    pub fn position(&self) -> TouchPosition {
        self.position
    }

    pub fn is_touched(&self) -> bool {
        self.machine.inner().touched
    }

    pub fn is_hold_pending(&self) -> bool {
        self.machine.inner().hold_pending
    }

    pub fn held_ms(&self, now_ms: u64) -> u64 {
        let inner = self.machine.inner();
        if inner.touched {
            now_ms.saturating_sub(inner.touch_start_ms)
        } else {
            0
        }
    }
}

struct ElectrodeHsm {
    position: TouchPosition,
    tap_max_ms: u64,
    hold_min_ms: u64,
    hold_grace_ms: u64,
    touched: bool,
    hold_pending: bool,
    touch_start_ms: u64,
}

impl ElectrodeHsm {
    fn new(position: TouchPosition, config: &TouchConfig) -> Self {
        Self {
            position,
            tap_max_ms: config.tap_max_ms,
            hold_min_ms: config.hold_min_ms,
            hold_grace_ms: config.hold_grace_ms,
            touched: false,
            hold_pending: false,
            touch_start_ms: 0,
        }
    }

    fn release(&mut self, now_ms: u64) -> u64 {
        let duration = now_ms.saturating_sub(self.touch_start_ms);
        self.touched = false;
        self.hold_pending = false;
        duration
    }
}

#[state_machine(initial = "State::released()")]
impl ElectrodeHsm {
    #[state(superstate = "electrode")]
    fn released(
        &mut self,
        context: &mut DispatchContext,
        event: &ElectrodeEvent,
    ) -> Outcome<State> {
        match event {
            ElectrodeEvent::Level {
                now_ms,
                touched: true,
            } => {
                self.touched = true;
                self.touch_start_ms = *now_ms;
                context.pressed = true;
                debug!("touch: pressed side={:?}", self.position);
                Transition(State::pressed())
            }
            ElectrodeEvent::Level { .. } => Handled,
            _ => Super,
        }
    }

    #[state(superstate = "electrode")]
    fn pressed(&mut self, context: &mut DispatchContext, event: &ElectrodeEvent) -> Outcome<State> {
        match event {
            ElectrodeEvent::Level {
                now_ms,
                touched: true,
            } => {
                if now_ms.saturating_sub(self.touch_start_ms) < self.hold_min_ms {
                    return Handled;
                }
                self.hold_pending = true;
                debug!("touch: hold_pending side={:?}", self.position);
                Transition(State::hold_pending())
            }
            ElectrodeEvent::Level {
                now_ms,
                touched: false,
            } => {
                let duration = self.release(*now_ms);
                if duration < self.tap_max_ms {
                    context.tap_ms = Some(duration);
                }
                debug!(
                    "touch: released side={:?} duration_ms={}",
                    self.position, duration
                );
                Transition(State::released())
            }
            _ => Super,
        }
    }

    #[state(superstate = "electrode")]
    fn hold_pending(
        &mut self,
        context: &mut DispatchContext,
        event: &ElectrodeEvent,
    ) -> Outcome<State> {
        match event {
            ElectrodeEvent::Level { touched: true, .. } => Handled,
            ElectrodeEvent::Level {
                now_ms,
                touched: false,
            } => {
                let duration = self.release(*now_ms);
                debug!(
                    "touch: hold_cancelled side={:?} duration_ms={}",
                    self.position, duration
                );
                Transition(State::released())
            }
            ElectrodeEvent::ConfirmHold { now_ms } => {
                let held = now_ms.saturating_sub(self.touch_start_ms);
                let reported = held.saturating_sub(self.hold_grace_ms);
                self.hold_pending = false;
                context.hold_ms = Some(reported);
                info!(
                    "touch: hold side={:?} duration_ms={}",
                    self.position, reported
                );
                Transition(State::handled())
            }
            ElectrodeEvent::Suppress => {
                self.hold_pending = false;
                Transition(State::handled())
            }
            ElectrodeEvent::Reset => Super,
        }
    }

    #[state(superstate = "electrode")]
    fn handled(&mut self, context: &mut DispatchContext, event: &ElectrodeEvent) -> Outcome<State> {
        let _ = context;
        match event {
            ElectrodeEvent::Level { touched: true, .. } => Handled,
            ElectrodeEvent::Level {
                now_ms,
                touched: false,
            } => {
                self.release(*now_ms);
                Transition(State::released())
            }
            _ => Super,
        }
    }

    #[superstate]
    fn electrode(
        &mut self,
        context: &mut DispatchContext,
        event: &ElectrodeEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            ElectrodeEvent::Reset => {
                self.touched = false;
                self.hold_pending = false;
                self.touch_start_ms = 0;
                Transition(State::released())
            }
            _ => Handled,
        }
    }
}
