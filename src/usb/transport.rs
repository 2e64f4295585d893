//! [`HidTransport`] over the embassy-usb HID writer.
//!
//! The control loop never awaits the endpoint. A payload is parked in a
//! one-slot outbox; the writer task moves it onto the wire and reports the
//! completion back as [`UsbEvent::ReportSent`].

use super::hid_device::UsbHidWriter;
use super::{post, UsbEvent};
use core::sync::atomic::{AtomicBool, Ordering};
use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use hid_composite::transport::{HidTransport, ReportPayload};
use hid_composite::Error;

/// Host has configured the device.
pub static CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Bus is suspended.
pub static SUSPENDED: AtomicBool = AtomicBool::new(false);

/// Host allowed remote wakeup (DEVICE_REMOTE_WAKEUP feature).
pub static REMOTE_WAKEUP_ENABLED: AtomicBool = AtomicBool::new(false);

/// Raised by the control loop, consumed by the USB device task.
pub static REMOTE_WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// One report at a time: the endpoint holds at most one.
static OUTBOX: Channel<CriticalSectionRawMutex, ReportPayload, 1> = Channel::new();

/// Control-loop side of the endpoint.
pub struct UsbTransport;

impl HidTransport for UsbTransport {
    fn is_ready(&self) -> bool {
        CONFIGURED.load(Ordering::Acquire)
            && !SUSPENDED.load(Ordering::Acquire)
            && OUTBOX.is_empty()
    }

    fn send(&mut self, payload: ReportPayload) -> Result<(), Error> {
        OUTBOX.try_send(payload).map_err(|_| Error::TransportBusy)
    }

    fn request_remote_wakeup(&mut self) {
        REMOTE_WAKEUP.signal(());
    }
}

/// Writes queued payloads to the interrupt IN endpoint, forever.
pub async fn hid_writer_task(mut writer: UsbHidWriter) -> ! {
    info!("HID writer task started - waiting for reports");

    loop {
        let payload = OUTBOX.receive().await;
        let channel = payload.channel();

        match writer.write(payload.as_bytes()).await {
            Ok(()) => post(UsbEvent::ReportSent(channel)),
            // Only happens when the endpoint is disabled; the unmount that
            // goes with it resets the scheduler.
            Err(e) => warn!("USB write of {} failed: {}", channel, e),
        }
    }
}
