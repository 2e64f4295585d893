//! Seam between the report scheduler and the USB stack.
//!
//! The scheduler never touches endpoints. It asks the transport whether a
//! report may be sent, hands over an owned [`ReportPayload`], and later
//! learns through a completion notification that the host has taken it.

use crate::error::Error;
use crate::hid::{HidReport, ReportChannel, MAX_REPORT_BODY};
use heapless::Vec;

/// Report id byte plus the largest report body.
pub const MAX_PAYLOAD_SIZE: usize = 1 + MAX_REPORT_BODY;

/// Wire bytes of one report, report id first.
///
/// Built by the scheduler and moved into [`HidTransport::send`]; never kept
/// after the send.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportPayload {
    channel: ReportChannel,
    bytes: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl ReportPayload {
    /// Frame `report` with its report id.
    pub fn new(report: &HidReport) -> Result<Self, Error> {
        let channel = report.channel();
        let mut body = [0u8; MAX_REPORT_BODY];
        let n = report.serialize(&mut body);
        if n == 0 {
            return Err(Error::BufferOverflow);
        }

        let mut bytes = Vec::new();
        bytes
            .push(channel.report_id())
            .map_err(|_| Error::BufferOverflow)?;
        bytes
            .extend_from_slice(&body[..n])
            .map_err(|_| Error::BufferOverflow)?;
        Ok(Self { channel, bytes })
    }

    pub fn channel(&self) -> ReportChannel {
        self.channel
    }

    /// Report id followed by the body, as written to the endpoint.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Report body without the id.
    pub fn body(&self) -> &[u8] {
        &self.bytes[1..]
    }
}

/// What the scheduler needs from the USB stack.
pub trait HidTransport {
    /// `true` when the shared endpoint can take a new report.
    fn is_ready(&self) -> bool;

    /// Queue `payload` on the endpoint. `Ok` promises a later completion
    /// notification for `payload.channel()`; a busy endpoint returns
    /// [`Error::TransportBusy`] and the payload is dropped.
    fn send(&mut self, payload: ReportPayload) -> Result<(), Error>;

    /// Signal resume to a suspended host.
    fn request_remote_wakeup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::{ConsumerReport, KeyboardReport};

    #[test]
    fn payload_is_prefixed_with_report_id() {
        let payload =
            ReportPayload::new(&HidReport::Keyboard(KeyboardReport::single_key(0x04))).unwrap();
        assert_eq!(payload.channel(), ReportChannel::Keyboard);
        assert_eq!(payload.as_bytes(), &[1, 0, 0, 0x04, 0, 0, 0, 0, 0]);
        assert_eq!(payload.body().len(), 8);
    }

    #[test]
    fn consumer_payload_length() {
        let payload = ReportPayload::new(&HidReport::Consumer(ConsumerReport::from_code(0x00EA)))
            .unwrap();
        assert_eq!(payload.as_bytes(), &[3, 0xEA, 0x00]);
    }
}
