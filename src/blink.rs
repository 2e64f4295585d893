//! Heartbeat LED.

use crate::power::BlinkInterval;
use crate::timing::{Cadence, Millis};

/// Toggles the heartbeat level once per blink interval.
///
/// The interval is re-read every tick, so a power transition takes effect on
/// the next boundary without restarting the phase.
#[derive(Clone, Copy, Debug)]
pub struct HeartbeatBlinker {
    cadence: Cadence,
    level: bool,
    paused: bool,
}

impl HeartbeatBlinker {
    /// LED off, phase starting at `origin`.
    pub const fn new(origin: Millis) -> Self {
        Self {
            cadence: Cadence::new(origin),
            level: false,
            paused: false,
        }
    }

    /// Advance the blinker. Returns the new level when it toggled.
    pub fn tick(&mut self, now: Millis, interval: BlinkInterval) -> Option<bool> {
        let Some(period) = interval.as_millis() else {
            self.paused = true;
            return None;
        };

        if self.paused {
            // Blinking resumes one full period after the hold is released.
            self.paused = false;
            self.cadence.rebase(now);
            return None;
        }

        if !self.cadence.elapsed(now, period) {
            return None;
        }
        self.level = !self.level;
        Some(self.level)
    }

    /// Hold the LED at `level` (lock indicator).
    pub fn force(&mut self, level: bool) {
        self.level = level;
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_off_and_toggles_per_interval() {
        let mut blinker = HeartbeatBlinker::new(0);
        assert!(!blinker.level());
        assert_eq!(blinker.tick(249, BlinkInterval::NotMounted), None);
        assert_eq!(blinker.tick(250, BlinkInterval::NotMounted), Some(true));
        assert_eq!(blinker.tick(499, BlinkInterval::NotMounted), None);
        assert_eq!(blinker.tick(500, BlinkInterval::NotMounted), Some(false));
    }

    #[test]
    fn interval_change_applies_on_next_boundary() {
        let mut blinker = HeartbeatBlinker::new(0);
        assert_eq!(blinker.tick(250, BlinkInterval::NotMounted), Some(true));
        assert_eq!(blinker.tick(1000, BlinkInterval::Mounted), None);
        assert_eq!(blinker.tick(1250, BlinkInterval::Mounted), Some(false));
    }

    #[test]
    fn disabled_is_a_no_op() {
        let mut blinker = HeartbeatBlinker::new(0);
        blinker.force(true);
        for now in (0..10_000).step_by(100) {
            assert_eq!(blinker.tick(now, BlinkInterval::Disabled), None);
        }
        assert!(blinker.level());
    }

    #[test]
    fn resumes_a_full_period_after_disabled() {
        let mut blinker = HeartbeatBlinker::new(0);
        assert_eq!(blinker.tick(5000, BlinkInterval::Disabled), None);
        blinker.force(false);

        assert_eq!(blinker.tick(6000, BlinkInterval::Mounted), None);
        assert_eq!(blinker.tick(6999, BlinkInterval::Mounted), None);
        assert_eq!(blinker.tick(7000, BlinkInterval::Mounted), Some(true));
    }
}
