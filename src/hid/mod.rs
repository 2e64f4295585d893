//! HID report types for the composite device.
//!
//! Every report travels over the same interrupt IN endpoint, prefixed with
//! the report id of its [`ReportChannel`].

pub mod channel;
pub mod consumer;
pub mod descriptor;
pub mod gamepad;
pub mod keyboard;
pub mod mouse;


pub use channel::{ReportChannel, CHANNEL_COUNT};
pub use consumer::ConsumerReport;
pub use gamepad::GamepadReport;
pub use keyboard::KeyboardReport;
pub use mouse::MouseReport;

use consumer::CONSUMER_REPORT_SIZE;
use gamepad::GAMEPAD_REPORT_SIZE;
use keyboard::KEYBOARD_REPORT_SIZE;
use mouse::MOUSE_REPORT_SIZE;

/// Largest report body of any channel.
pub const MAX_REPORT_BODY: usize = GAMEPAD_REPORT_SIZE;

/// One report of any channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
    Consumer(ConsumerReport),
    Gamepad(GamepadReport),
}

impl HidReport {
    /// Channel (and so report id) this report belongs to.
    pub fn channel(&self) -> ReportChannel {
        match self {
            HidReport::Keyboard(_) => ReportChannel::Keyboard,
            HidReport::Mouse(_) => ReportChannel::Mouse,
            HidReport::Consumer(_) => ReportChannel::ConsumerControl,
            HidReport::Gamepad(_) => ReportChannel::Gamepad,
        }
    }

    /// Size of the serialized body, without the report id.
    pub fn body_len(&self) -> usize {
        match self {
            HidReport::Keyboard(_) => KEYBOARD_REPORT_SIZE,
            HidReport::Mouse(_) => MOUSE_REPORT_SIZE,
            HidReport::Consumer(_) => CONSUMER_REPORT_SIZE,
            HidReport::Gamepad(_) => GAMEPAD_REPORT_SIZE,
        }
    }

    /// Serialize the body (no report id). Returns 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match self {
            HidReport::Keyboard(k) => k.serialize(buf),
            HidReport::Mouse(m) => m.serialize(buf),
            HidReport::Consumer(c) => c.serialize(buf),
            HidReport::Gamepad(g) => g.serialize(buf),
        }
    }

    /// Returns `true` for release/neutral reports that carry no held input.
    pub fn is_release(&self) -> bool {
        match self {
            HidReport::Keyboard(k) => k.is_empty(),
            HidReport::Mouse(m) => m.is_idle(),
            HidReport::Consumer(c) => c.is_empty(),
            HidReport::Gamepad(g) => g.is_neutral(),
        }
    }
}
