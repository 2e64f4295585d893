//! USB HID gamepad report.
//!
//! Layout (11 bytes):
//! ```text
//! Byte 0-5:  X, Y, Z, Rz, Rx, Ry (signed, -127..127)
//! Byte 6:    Hat switch (0 = centered, 1 = up, clockwise to 8 = up-left)
//! Byte 7-10: 32 button bits, little-endian (bit 0 = button A / south)
//! ```

/// Gamepad report size in bytes.
pub const GAMEPAD_REPORT_SIZE: usize = 11;

/// Button A (south face button).
pub const GAMEPAD_BUTTON_A: u32 = 1 << 0;

/// Hat switch direction. `Centered` is the descriptor's null state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Hat {
    #[default]
    Centered = 0,
    Up = 1,
    UpRight = 2,
    Right = 3,
    DownRight = 4,
    Down = 5,
    DownLeft = 6,
    Left = 7,
    UpLeft = 8,
}

/// Six 8-bit axes, a hat switch and 32 buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GamepadReport {
    pub x: i8,
    pub y: i8,
    pub z: i8,
    pub rz: i8,
    pub rx: i8,
    pub ry: i8,
    pub hat: Hat,
    pub buttons: u32,
}

impl GamepadReport {
    /// Sticks centered, hat centered, nothing pressed.
    pub const fn neutral() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            rz: 0,
            rx: 0,
            ry: 0,
            hat: Hat::Centered,
            buttons: 0,
        }
    }

    /// Hat direction plus a button mask, sticks centered.
    pub const fn pressed(hat: Hat, buttons: u32) -> Self {
        Self {
            hat,
            buttons,
            ..Self::neutral()
        }
    }

    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < GAMEPAD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.x as u8;
        buf[1] = self.y as u8;
        buf[2] = self.z as u8;
        buf[3] = self.rz as u8;
        buf[4] = self.rx as u8;
        buf[5] = self.ry as u8;
        buf[6] = self.hat as u8;
        buf[7..11].copy_from_slice(&self.buttons.to_le_bytes());
        GAMEPAD_REPORT_SIZE
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }
}
