//! USB device subsystem - presents the composite HID device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. One HID interface carries all four report channels,
//! distinguished by report id, over a single interrupt IN endpoint.
//!
//! Everything the USB stack learns (configuration, suspend, completions,
//! host output reports) is forwarded to the control loop as a [`UsbEvent`];
//! the control loop hands reports back through [`transport::UsbTransport`].

pub mod hid_device;
pub mod transport;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use hid_composite::hid::ReportChannel;

/// Longest host output report forwarded to the control loop.
pub const HOST_REPORT_MAX: usize = 8;

/// USB stack → control loop.
#[derive(Clone, Debug, PartialEq, Eq, defmt::Format)]
pub enum UsbEvent {
    Mounted,
    Unmounted,
    Suspended { remote_wakeup_allowed: bool },
    Resumed,
    /// The host took the report of this channel off the endpoint.
    ReportSent(ReportChannel),
    /// SET_REPORT (Output) or an OUT endpoint transfer, report id stripped.
    HostOutput {
        report_id: u8,
        data: heapless::Vec<u8, HOST_REPORT_MAX>,
    },
}

/// Events queued by the USB handlers, drained by the control loop.
pub static EVENTS: Channel<CriticalSectionRawMutex, UsbEvent, 8> = Channel::new();

/// Queue an event from a synchronous USB callback.
pub fn post(event: UsbEvent) {
    if EVENTS.try_send(event).is_err() {
        defmt::warn!("USB event queue full, event dropped");
    }
}
