//! Composite USB HID report scheduling.
//!
//! Keyboard, mouse, consumer-control and gamepad reports share a single
//! interrupt IN endpoint. This library holds every piece of logic that does
//! not touch hardware, so it builds for the nRF52840 firmware (`main.rs`,
//! `embedded` feature) and runs its tests on the host.
//!
//! Usage: `cargo test` on the host, `cargo build --release --features
//! embedded --target thumbv7em-none-eabihf` for the firmware.
//!
//! Per loop iteration the firmware calls [`app::App::poll`]:
//! power state → heartbeat blinker → input sampler → mode controller →
//! report scheduler. USB completions re-enter the scheduler through
//! [`app::App::on_report_sent`].

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod app;
pub mod blink;
pub mod config;
pub mod error;
pub mod hid;
pub mod input;
pub mod mode;
pub mod power;
pub mod power_logic;
pub mod scheduler;
pub mod timing;
pub mod transport;

pub use app::App;
pub use error::Error;
