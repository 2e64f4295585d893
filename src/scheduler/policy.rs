//! Per-channel report construction and the channel visit order.

use crate::config::{CONSUMER_USAGE, GAMEPAD_BUTTONS, GAMEPAD_HAT, KEYBOARD_KEYCODE};
use crate::hid::{
    ConsumerReport, GamepadReport, HidReport, KeyboardReport, MouseReport, ReportChannel,
    CHANNEL_COUNT,
};
use crate::input::InputSnapshot;
use crate::mode::MotionDelta;

/// First channel of every report cycle.
pub const FIRST_CHANNEL: ReportChannel = ReportChannel::Mouse;

/// Successor of each channel within a cycle, indexed by
/// [`ReportChannel::index`]. `None` ends the cycle.
const NEXT_CHANNEL: [Option<ReportChannel>; CHANNEL_COUNT] = [
    /* Keyboard        */ Some(ReportChannel::ConsumerControl),
    /* Mouse           */ Some(ReportChannel::Keyboard),
    /* ConsumerControl */ Some(ReportChannel::Gamepad),
    /* Gamepad         */ None,
];

/// Channel visited after `channel`, or `None` at the end of the cycle.
pub const fn next_channel(channel: ReportChannel) -> Option<ReportChannel> {
    NEXT_CHANNEL[channel.index()]
}

/// Input captured when a cycle starts; every report of the cycle is built
/// from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleInput {
    pub snapshot: InputSnapshot,
    pub delta: MotionDelta,
}

impl CycleInput {
    pub const fn new(snapshot: InputSnapshot, delta: MotionDelta) -> Self {
        Self { snapshot, delta }
    }

    fn active(&self) -> bool {
        self.snapshot.activation()
    }
}

/// Which channels last sent a non-idle report and still owe the host a
/// release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingState {
    latched: [bool; CHANNEL_COUNT],
}

impl PendingState {
    pub const fn new() -> Self {
        Self {
            latched: [false; CHANNEL_COUNT],
        }
    }

    pub fn is_latched(&self, channel: ReportChannel) -> bool {
        self.latched[channel.index()]
    }

    pub fn set(&mut self, channel: ReportChannel, latched: bool) {
        self.latched[channel.index()] = latched;
    }

    pub fn clear(&mut self) {
        self.latched = [false; CHANNEL_COUNT];
    }
}

/// A report to send and the latch value to record once it is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Planned {
    pub report: HidReport,
    pub latch: bool,
}

/// Decide what `channel` sends this cycle, if anything.
///
/// Mouse always reports. The other channels send their pressed report while
/// the activation input is held, a single release after it lets go, and
/// nothing otherwise.
pub fn plan(channel: ReportChannel, input: &CycleInput, pending: &PendingState) -> Option<Planned> {
    if channel == ReportChannel::Mouse {
        return Some(Planned {
            report: HidReport::Mouse(MouseReport::movement(input.delta.x, input.delta.y)),
            latch: false,
        });
    }

    if input.active() {
        return Some(Planned {
            report: pressed_report(channel),
            latch: true,
        });
    }

    if pending.is_latched(channel) {
        return Some(Planned {
            report: release_report(channel),
            latch: false,
        });
    }

    None
}

fn pressed_report(channel: ReportChannel) -> HidReport {
    match channel {
        ReportChannel::Keyboard => HidReport::Keyboard(KeyboardReport::single_key(KEYBOARD_KEYCODE)),
        ReportChannel::Mouse => HidReport::Mouse(MouseReport::empty()),
        ReportChannel::ConsumerControl => {
            HidReport::Consumer(ConsumerReport::from_code(CONSUMER_USAGE))
        }
        ReportChannel::Gamepad => {
            HidReport::Gamepad(GamepadReport::pressed(GAMEPAD_HAT, GAMEPAD_BUTTONS))
        }
    }
}

fn release_report(channel: ReportChannel) -> HidReport {
    match channel {
        ReportChannel::Keyboard => HidReport::Keyboard(KeyboardReport::empty()),
        ReportChannel::Mouse => HidReport::Mouse(MouseReport::empty()),
        ReportChannel::ConsumerControl => HidReport::Consumer(ConsumerReport::empty()),
        ReportChannel::Gamepad => HidReport::Gamepad(GamepadReport::neutral()),
    }
}
