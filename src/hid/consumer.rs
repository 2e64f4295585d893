//! Consumer Control report (usage page 0x0C).
//!
//! A single 16-bit usage, little-endian; 0 means nothing pressed. The
//! descriptor declares the full 0..0x3FF usage range, so any code fits.

/// Consumer control report size (2 bytes for usage ID).
pub const CONSUMER_REPORT_SIZE: usize = 2;

/// Volume Decrement (usage 0x00EA).
pub const USAGE_VOLUME_DECREMENT: u16 = 0x00EA;

/// One consumer usage held, or none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    pub usage: u16,
}

impl ConsumerReport {
    /// Release report.
    pub const fn empty() -> Self {
        Self { usage: 0 }
    }

    pub const fn from_code(usage: u16) -> Self {
        Self { usage }
    }

    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < CONSUMER_REPORT_SIZE {
            return 0;
        }
        buf[..CONSUMER_REPORT_SIZE].copy_from_slice(&self.usage.to_le_bytes());
        CONSUMER_REPORT_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.usage == 0
    }
}
