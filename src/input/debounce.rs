//! Press-edge debouncing without blocking.

use crate::timing::Millis;

/// Registers a press edge at most once per quiescent window.
///
/// A held button produces one edge; contact bounce inside the window after a
/// registered edge is ignored.
#[derive(Clone, Copy, Debug)]
pub struct EdgeDebouncer {
    window_ms: Millis,
    was_pressed: bool,
    quiet_until: Option<Millis>,
}

impl EdgeDebouncer {
    pub const fn new(window_ms: Millis) -> Self {
        Self {
            window_ms,
            was_pressed: false,
            quiet_until: None,
        }
    }

    /// Feed the current raw level. Returns `true` on a registered press edge.
    pub fn update(&mut self, pressed: bool, now: Millis) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        if !edge {
            return false;
        }

        if let Some(until) = self.quiet_until {
            if now < until {
                return false;
            }
        }
        self.quiet_until = Some(now + self.window_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_button_registers_once() {
        let mut d = EdgeDebouncer::new(200);
        assert!(d.update(true, 0));
        for t in (10..1000).step_by(10) {
            assert!(!d.update(true, t));
        }
    }

    #[test]
    fn bounce_inside_window_is_ignored() {
        let mut d = EdgeDebouncer::new(200);
        assert!(d.update(true, 0));
        assert!(!d.update(false, 10));
        assert!(!d.update(true, 50));
        assert!(!d.update(false, 60));
        assert!(!d.update(true, 199));
    }

    #[test]
    fn edge_after_window_registers() {
        let mut d = EdgeDebouncer::new(200);
        assert!(d.update(true, 0));
        assert!(!d.update(false, 100));
        assert!(d.update(true, 250));
    }

    #[test]
    fn edge_exactly_at_window_end_registers() {
        let mut d = EdgeDebouncer::new(200);
        assert!(d.update(true, 0));
        assert!(!d.update(false, 100));
        assert!(d.update(true, 200));
    }
}
