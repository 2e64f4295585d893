//! Pure heartbeat policy, kept free of state so it can be tested directly.

use crate::power::{BlinkInterval, DeviceState};

/// Heartbeat interval for a device state. A latched lock indicator
/// overrides everything and stops the blinking.
pub fn blink_interval(state: DeviceState, lock_indicator_on: bool) -> BlinkInterval {
    if lock_indicator_on {
        return BlinkInterval::Disabled;
    }

    match state {
        DeviceState::Unattached => BlinkInterval::NotMounted,
        DeviceState::Mounted => BlinkInterval::Mounted,
        DeviceState::Suspended => BlinkInterval::Suspended,
    }
}

/// Whether a remote wakeup should be signalled now.
pub fn should_wake_host(
    suspended: bool,
    input_active: bool,
    remote_wakeup_allowed: bool,
    already_requested: bool,
) -> bool {
    suspended && input_active && remote_wakeup_allowed && !already_requested
}
