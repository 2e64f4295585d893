//! USB power-state tracking.
//!
//! Transitions are driven only by the USB stack's lifecycle callbacks, never
//! polled. The state picks the heartbeat interval and gates remote wakeup.
//!
//! | event          | from        | to                                |
//! |----------------|-------------|-----------------------------------|
//! | `on_mount`     | any         | Mounted                           |
//! | `on_unmount`   | any         | Unattached                        |
//! | `on_suspend`   | any         | Suspended                         |
//! | `on_resume`    | Suspended   | Mounted if attached, else Unattached |

use crate::config::{BLINK_MOUNTED_MS, BLINK_NOT_MOUNTED_MS, BLINK_SUSPENDED_MS};
use crate::power_logic;
use crate::timing::Millis;

/// Device state as seen from the bus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Not configured by a host.
    #[default]
    Unattached,
    /// Configured and running.
    Mounted,
    /// Bus suspended by the host.
    Suspended,
}

/// Heartbeat LED period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkInterval {
    NotMounted,
    Mounted,
    Suspended,
    /// No blinking; the LED is held by the lock indicator.
    Disabled,
}

impl BlinkInterval {
    /// Period in milliseconds, `None` when disabled.
    pub const fn as_millis(self) -> Option<Millis> {
        match self {
            BlinkInterval::NotMounted => Some(BLINK_NOT_MOUNTED_MS),
            BlinkInterval::Mounted => Some(BLINK_MOUNTED_MS),
            BlinkInterval::Suspended => Some(BLINK_SUSPENDED_MS),
            BlinkInterval::Disabled => None,
        }
    }
}

/// Tracks bus power state, remote-wakeup permission and the lock indicator.
#[derive(Clone, Copy, Debug, Default)]
pub struct PowerMonitor {
    state: DeviceState,
    /// Configured by a host; survives suspend.
    attached: bool,
    remote_wakeup_allowed: bool,
    /// A wakeup was already signalled in the current suspend episode.
    wakeup_requested: bool,
    lock_indicator: bool,
}

impl PowerMonitor {
    pub const fn new() -> Self {
        Self {
            state: DeviceState::Unattached,
            attached: false,
            remote_wakeup_allowed: false,
            wakeup_requested: false,
            lock_indicator: false,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_suspended(&self) -> bool {
        self.state == DeviceState::Suspended
    }

    pub fn remote_wakeup_allowed(&self) -> bool {
        self.remote_wakeup_allowed
    }

    pub fn lock_indicator(&self) -> bool {
        self.lock_indicator
    }

    /// Current heartbeat interval.
    pub fn blink_interval(&self) -> BlinkInterval {
        power_logic::blink_interval(self.state, self.lock_indicator)
    }

    /// Host configured the device.
    pub fn on_mount(&mut self) {
        self.attached = true;
        self.transition(DeviceState::Mounted);
    }

    /// Host deconfigured the device or the cable was pulled.
    pub fn on_unmount(&mut self) {
        self.attached = false;
        self.remote_wakeup_allowed = false;
        self.transition(DeviceState::Unattached);
    }

    /// Bus suspended. `remote_wakeup_allowed` is the host's
    /// DEVICE_REMOTE_WAKEUP feature at suspend time.
    pub fn on_suspend(&mut self, remote_wakeup_allowed: bool) {
        self.remote_wakeup_allowed = remote_wakeup_allowed;
        self.wakeup_requested = false;
        self.transition(DeviceState::Suspended);
    }

    /// Bus resumed.
    pub fn on_resume(&mut self) {
        if self.state != DeviceState::Suspended {
            return;
        }
        let next = if self.attached {
            DeviceState::Mounted
        } else {
            DeviceState::Unattached
        };
        self.transition(next);
    }

    /// Returns `true` when the caller should signal a remote wakeup now.
    ///
    /// Safe to call every cycle: at most one `true` per suspend episode.
    pub fn request_wakeup_if_applicable(&mut self, input_active: bool) -> bool {
        let wake = power_logic::should_wake_host(
            self.is_suspended(),
            input_active,
            self.remote_wakeup_allowed,
            self.wakeup_requested,
        );
        if wake {
            info!("power: requesting remote wakeup");
            self.wakeup_requested = true;
        }
        wake
    }

    /// Host lock indicator (Caps Lock) changed. While on, blinking stops.
    pub fn set_lock_indicator(&mut self, on: bool) {
        if self.lock_indicator != on {
            debug!("power: lock indicator {}", on);
            self.lock_indicator = on;
        }
    }

    fn transition(&mut self, next: DeviceState) {
        if next != self.state {
            info!("power: {} -> {}", self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unattached_blinking_fast() {
        let power = PowerMonitor::new();
        assert_eq!(power.state(), DeviceState::Unattached);
        assert_eq!(power.blink_interval(), BlinkInterval::NotMounted);
        assert_eq!(power.blink_interval().as_millis(), Some(250));
    }

    #[test]
    fn mount_unmount_intervals() {
        let mut power = PowerMonitor::new();
        power.on_mount();
        assert_eq!(power.state(), DeviceState::Mounted);
        assert_eq!(power.blink_interval().as_millis(), Some(1000));

        power.on_unmount();
        assert_eq!(power.state(), DeviceState::Unattached);
        assert_eq!(power.blink_interval(), BlinkInterval::NotMounted);
    }

    #[test]
    fn suspend_resume_returns_to_mounted() {
        let mut power = PowerMonitor::new();
        power.on_mount();
        power.on_suspend(true);
        assert_eq!(power.state(), DeviceState::Suspended);
        assert_eq!(power.blink_interval().as_millis(), Some(2500));
        assert!(power.remote_wakeup_allowed());

        power.on_resume();
        assert_eq!(power.state(), DeviceState::Mounted);
        assert_eq!(power.blink_interval(), BlinkInterval::Mounted);
    }

    #[test]
    fn resume_without_mount_is_unattached() {
        let mut power = PowerMonitor::new();
        power.on_suspend(false);
        power.on_resume();
        assert_eq!(power.state(), DeviceState::Unattached);
        assert_eq!(power.blink_interval(), BlinkInterval::NotMounted);
    }

    #[test]
    fn resume_when_not_suspended_is_ignored() {
        let mut power = PowerMonitor::new();
        power.on_mount();
        power.on_resume();
        assert_eq!(power.state(), DeviceState::Mounted);
    }

    #[test]
    fn wakeup_once_per_suspend_episode() {
        let mut power = PowerMonitor::new();
        power.on_mount();
        power.on_suspend(true);

        assert!(power.request_wakeup_if_applicable(true));
        assert!(!power.request_wakeup_if_applicable(true));
        assert!(!power.request_wakeup_if_applicable(true));

        power.on_resume();
        power.on_suspend(true);
        assert!(power.request_wakeup_if_applicable(true));
    }

    #[test]
    fn wakeup_needs_permission_input_and_suspend() {
        let mut power = PowerMonitor::new();
        power.on_mount();
        assert!(!power.request_wakeup_if_applicable(true)); // not suspended

        power.on_suspend(false);
        assert!(!power.request_wakeup_if_applicable(true)); // not allowed

        power.on_suspend(true);
        assert!(!power.request_wakeup_if_applicable(false)); // no input
        assert!(power.request_wakeup_if_applicable(true));
    }

    #[test]
    fn lock_indicator_disables_blink_until_cleared() {
        let mut power = PowerMonitor::new();
        power.on_mount();
        power.set_lock_indicator(true);
        assert_eq!(power.blink_interval(), BlinkInterval::Disabled);
        assert_eq!(power.blink_interval().as_millis(), None);

        // Survives power transitions.
        power.on_suspend(false);
        assert_eq!(power.blink_interval(), BlinkInterval::Disabled);
        power.on_resume();

        power.set_lock_indicator(false);
        assert_eq!(power.blink_interval(), BlinkInterval::Mounted);
    }

    #[test]
    fn blink_policy_table() {
        use power_logic::blink_interval;
        assert_eq!(blink_interval(DeviceState::Unattached, false), BlinkInterval::NotMounted);
        assert_eq!(blink_interval(DeviceState::Mounted, false), BlinkInterval::Mounted);
        assert_eq!(blink_interval(DeviceState::Suspended, false), BlinkInterval::Suspended);
        assert_eq!(blink_interval(DeviceState::Suspended, true), BlinkInterval::Disabled);
    }
}
