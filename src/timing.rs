//! Monotonic millisecond time helpers.
//!
//! Every periodic task in the control loop checks elapsed time and returns
//! immediately when its interval has not passed. Thresholds advance by the
//! interval itself, never by "now", so jitter in the loop does not
//! accumulate into drift.

/// Milliseconds on the monotonic clock (time since boot on the target).
pub type Millis = u64;

/// Drift-free periodic threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cadence {
    start_ms: Millis,
}

impl Cadence {
    /// Start counting from `origin`.
    pub const fn new(origin: Millis) -> Self {
        Self { start_ms: origin }
    }

    /// Returns `true` when at least `interval_ms` has elapsed since the
    /// running threshold, advancing the threshold by exactly one interval.
    ///
    /// After a long stall this returns `true` on consecutive calls until the
    /// threshold has caught up with `now`. A zero interval never fires.
    pub fn elapsed(&mut self, now: Millis, interval_ms: Millis) -> bool {
        if interval_ms == 0 || now.saturating_sub(self.start_ms) < interval_ms {
            return false;
        }
        self.start_ms += interval_ms;
        true
    }

    /// Move the threshold to `now`, discarding any backlog.
    pub fn rebase(&mut self, now: Millis) {
        self.start_ms = now;
    }

    /// Current threshold.
    pub fn threshold(&self) -> Millis {
        self.start_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut cadence = Cadence::new(0);
        assert!(!cadence.elapsed(9, 10));
        assert!(cadence.elapsed(10, 10));
        assert!(!cadence.elapsed(15, 10));
        assert!(cadence.elapsed(20, 10));
    }

    #[test]
    fn threshold_advances_by_interval_not_now() {
        let mut cadence = Cadence::new(0);
        // Loop ran late: 13 ms instead of 10.
        assert!(cadence.elapsed(13, 10));
        assert_eq!(cadence.threshold(), 10);
        // Next boundary is still 20, not 23.
        assert!(cadence.elapsed(20, 10));
    }

    #[test]
    fn catches_up_after_stall() {
        let mut cadence = Cadence::new(0);
        assert!(cadence.elapsed(35, 10));
        assert!(cadence.elapsed(35, 10));
        assert!(cadence.elapsed(35, 10));
        assert!(!cadence.elapsed(35, 10));
    }

    #[test]
    fn zero_interval_never_fires() {
        let mut cadence = Cadence::new(0);
        assert!(!cadence.elapsed(1000, 0));
    }

    #[test]
    fn rebase_drops_backlog() {
        let mut cadence = Cadence::new(0);
        cadence.rebase(500);
        assert!(!cadence.elapsed(505, 10));
        assert!(cadence.elapsed(510, 10));
    }
}
