//! Button input - raw pin levels to a per-cycle [`InputSnapshot`].
//!
//! Six buttons, all active-low with internal pull-up (a grounded pin reads
//! as pressed):
//!   - UP / DOWN / LEFT / RIGHT - manual-mode pointer movement, read raw
//!   - CIRCLE  - toggles manual/circular mode, press edge debounced
//!   - TRIGGER - raw level, activates the keyboard/consumer/gamepad reports
//!
//! A missing pin or a failed read counts as "not pressed".

pub mod debounce;

use crate::config::TOGGLE_DEBOUNCE_MS;
use crate::timing::Millis;
use debounce::EdgeDebouncer;
use embedded_hal::digital::InputPin;

/// Button state captured once per report cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Raw level of the mode button.
    pub circle: bool,
    /// Raw level of the activation button.
    pub trigger: bool,
    /// A debounced mode-button press edge was registered this cycle.
    pub toggle: bool,
}

impl InputSnapshot {
    /// Nothing pressed.
    pub const fn idle() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            circle: false,
            trigger: false,
            toggle: false,
        }
    }

    /// Level that drives the keyboard, consumer and gamepad reports.
    pub fn activation(&self) -> bool {
        self.trigger
    }

    /// Any button held. Used to decide on remote wakeup.
    pub fn is_active(&self) -> bool {
        self.up || self.down || self.left || self.right || self.circle || self.trigger
    }
}

/// Board pins. `None` for a button that is not fitted.
pub struct InputPins<P> {
    pub up: Option<P>,
    pub down: Option<P>,
    pub left: Option<P>,
    pub right: Option<P>,
    pub circle: Option<P>,
    pub trigger: Option<P>,
}

impl<P> InputPins<P> {
    /// No buttons fitted.
    pub const fn none() -> Self {
        Self {
            up: None,
            down: None,
            left: None,
            right: None,
            circle: None,
            trigger: None,
        }
    }
}

/// Reads the buttons and debounces the mode button.
pub struct InputSampler<P> {
    pins: InputPins<P>,
    toggle: EdgeDebouncer,
}

impl<P: InputPin> InputSampler<P> {
    pub fn new(pins: InputPins<P>) -> Self {
        Self {
            pins,
            toggle: EdgeDebouncer::new(TOGGLE_DEBOUNCE_MS),
        }
    }

    /// Read every button once.
    pub fn sample(&mut self, now: Millis) -> InputSnapshot {
        let circle = pressed(&mut self.pins.circle);
        let snapshot = InputSnapshot {
            up: pressed(&mut self.pins.up),
            down: pressed(&mut self.pins.down),
            left: pressed(&mut self.pins.left),
            right: pressed(&mut self.pins.right),
            circle,
            trigger: pressed(&mut self.pins.trigger),
            toggle: self.toggle.update(circle, now),
        };
        trace!("input: {}", snapshot);
        snapshot
    }
}

fn pressed<P: InputPin>(pin: &mut Option<P>) -> bool {
    match pin {
        Some(pin) => pin.is_low().unwrap_or(false),
        None => false,
    }
}
