//! Pointer motion modes.
//!
//! Manual mode moves the pointer with the direction buttons; circular mode
//! traces a circle on its own. The circle button flips between them.

use crate::config::{CIRCLE_ANGLE_STEP, CIRCLE_RADIUS, MANUAL_STEP};
use crate::input::InputSnapshot;
use core::f32::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeState {
    #[default]
    Manual,
    Circular,
}

/// Relative pointer displacement for one mouse report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionDelta {
    pub x: i8,
    pub y: i8,
}

impl MotionDelta {
    pub const ZERO: MotionDelta = MotionDelta { x: 0, y: 0 };

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

/// Owns the mode and the circular-mode phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeController {
    mode: ModeState,
    /// Phase in `[0, 2π)`.
    angle: f32,
}

impl ModeController {
    pub const fn new() -> Self {
        Self {
            mode: ModeState::Manual,
            angle: 0.0,
        }
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Mode LED level: lit in circular mode.
    pub fn indicator(&self) -> bool {
        self.mode == ModeState::Circular
    }

    /// Flip the mode. Returns the new mode LED level.
    pub fn toggle(&mut self) -> bool {
        self.mode = match self.mode {
            ModeState::Manual => ModeState::Circular,
            ModeState::Circular => ModeState::Manual,
        };
        info!("mode: {}", self.mode);
        self.indicator()
    }

    /// Displacement for this cycle's mouse report.
    pub fn advance(&mut self, snapshot: &InputSnapshot) -> MotionDelta {
        match self.mode {
            ModeState::Manual => manual_delta(snapshot),
            ModeState::Circular => {
                self.angle += CIRCLE_ANGLE_STEP;
                if self.angle >= TAU {
                    self.angle -= TAU;
                }
                MotionDelta {
                    x: saturate(CIRCLE_RADIUS * libm::cosf(self.angle)),
                    y: saturate(CIRCLE_RADIUS * libm::sinf(self.angle)),
                }
            }
        }
    }
}

/// Down and right are applied last, so they win over up and left when both
/// of a pair are held.
fn manual_delta(snapshot: &InputSnapshot) -> MotionDelta {
    let mut delta = MotionDelta::ZERO;
    if snapshot.up {
        delta.y = -MANUAL_STEP;
    }
    if snapshot.down {
        delta.y = MANUAL_STEP;
    }
    if snapshot.left {
        delta.x = -MANUAL_STEP;
    }
    if snapshot.right {
        delta.x = MANUAL_STEP;
    }
    delta
}

/// Mouse axes are declared -127..=127; -128 is never sent.
fn saturate(value: f32) -> i8 {
    libm::roundf(value).clamp(-127.0, 127.0) as i8
}
