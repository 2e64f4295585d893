//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

use crate::hid::consumer::USAGE_VOLUME_DECREMENT;
use crate::hid::gamepad::{Hat, GAMEPAD_BUTTON_A};

// Scheduling

/// One composite report cycle (mouse, keyboard, consumer, gamepad) starts
/// every this many milliseconds.
pub const REPORT_INTERVAL_MS: u64 = 10;

/// Quiescent window after a registered mode-button press (ms).
pub const TOGGLE_DEBOUNCE_MS: u64 = 200;

/// Upper bound on how long the firmware loop sleeps between polls (ms).
pub const LOOP_POLL_MS: u64 = 1;

// Heartbeat LED

/// Blink period while the device is not mounted.
pub const BLINK_NOT_MOUNTED_MS: u64 = 250;

/// Blink period while mounted.
pub const BLINK_MOUNTED_MS: u64 = 1000;

/// Blink period while the bus is suspended.
pub const BLINK_SUSPENDED_MS: u64 = 2500;

// Motion

/// Per-report displacement in manual mode.
pub const MANUAL_STEP: i8 = 5;

/// Radius of the circle traced in circular mode.
pub const CIRCLE_RADIUS: f32 = 5.0;

/// Phase advance per circular-mode report (radians).
pub const CIRCLE_ANGLE_STEP: f32 = 0.05;

// Report contents while the trigger button is held

/// Keyboard usage sent while held (`A`).
pub const KEYBOARD_KEYCODE: u8 = 0x04;

/// Consumer usage sent while held (Volume Decrement).
pub const CONSUMER_USAGE: u16 = USAGE_VOLUME_DECREMENT;

/// Gamepad hat direction sent while held.
pub const GAMEPAD_HAT: Hat = Hat::Up;

/// Gamepad buttons sent while held.
pub const GAMEPAD_BUTTONS: u32 = GAMEPAD_BUTTON_A;

/// Caps Lock bit of the keyboard LED output report (HID LED page).
pub const KEYBOARD_LED_CAPSLOCK: u8 = 1 << 1;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "hid-composite";
pub const USB_PRODUCT: &str = "Composite HID (kbd/mouse/consumer/gamepad)";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 5;

/// Interrupt endpoint packet size. The largest report (gamepad, 11 bytes
/// plus report id) fits in one packet.
pub const USB_HID_MAX_PACKET: u16 = 16;

// GPIO pin assignments (nRF52840-DK)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  All buttons are active-low with internal pull-up.
//
//   Button UP      → P0.03
//   Button RIGHT   → P0.04
//   Button DOWN    → P0.28
//   Button LEFT    → P0.29
//   Button CIRCLE  → P0.11 (DK button 1) - toggles manual/circular mode
//   Button TRIGGER → P0.12 (DK button 2) - keyboard/consumer/gamepad activation
//   Heartbeat LED  → P0.13 (DK LED 1)
//   Mode LED       → P0.14 (DK LED 2)

/// The DK LEDs light when the pin is driven low.
pub const LED_ACTIVE_LOW: bool = true;
