//! Logical HID profiles multiplexed over the single interrupt IN endpoint.

use crate::error::Error;

/// Number of report channels in the composite descriptor.
pub const CHANNEL_COUNT: usize = 4;

/// One logical HID profile. The discriminant is the report id on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReportChannel {
    Keyboard = 1,
    Mouse = 2,
    ConsumerControl = 3,
    Gamepad = 4,
}

impl ReportChannel {
    /// All channels in report-id order.
    pub const ALL: [ReportChannel; CHANNEL_COUNT] = [
        ReportChannel::Keyboard,
        ReportChannel::Mouse,
        ReportChannel::ConsumerControl,
        ReportChannel::Gamepad,
    ];

    /// Report id prefixed to every payload of this channel.
    pub const fn report_id(self) -> u8 {
        self as u8
    }

    /// Dense zero-based index, for per-channel tables.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Map a wire report id back to its channel.
    pub fn from_report_id(id: u8) -> Result<Self, Error> {
        match id {
            1 => Ok(ReportChannel::Keyboard),
            2 => Ok(ReportChannel::Mouse),
            3 => Ok(ReportChannel::ConsumerControl),
            4 => Ok(ReportChannel::Gamepad),
            other => Err(Error::UnknownReportId(other)),
        }
    }
}

impl TryFrom<u8> for ReportChannel {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Error> {
        Self::from_report_id(id)
    }
}
