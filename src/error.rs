//! Unified error type for hid-composite.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! None of these are fatal: the firmware degrades to sending nothing
//! rather than halting.

/// Top-level error type used across the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Transport
    /// The shared HID endpoint still holds a report. Retried on the next tick.
    TransportBusy,

    // Host requests
    /// A control request from the host carried too little payload.
    MalformedHostRequest,

    /// A report id that maps to no channel of the composite descriptor.
    UnknownReportId(u8),

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}
