//! End-to-end tests: fake buttons in, report bytes out.
//!
//! The [`App`] is polled once per simulated millisecond exactly as the
//! firmware loop does. The mock host completes every report on the next
//! millisecond, so whole report cycles run as they would on the bus.

use core::cell::Cell;
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin};
use hid_composite::hid::ReportChannel;
use hid_composite::input::InputPins;
use hid_composite::mode::ModeState;
use hid_composite::power::{BlinkInterval, DeviceState};
use hid_composite::scheduler::Step;
use hid_composite::transport::{HidTransport, ReportPayload};
use hid_composite::{App, Error};

/// Active-low button: `true` on the cell means the pin is pulled high.
struct FakePin<'a>(&'a Cell<bool>);

impl ErrorType for FakePin<'_> {
    type Error = Infallible;
}

impl InputPin for FakePin<'_> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

/// Board buttons, all released.
struct Buttons {
    up: Cell<bool>,
    down: Cell<bool>,
    left: Cell<bool>,
    right: Cell<bool>,
    circle: Cell<bool>,
    trigger: Cell<bool>,
}

impl Buttons {
    fn new() -> Self {
        Self {
            up: Cell::new(true),
            down: Cell::new(true),
            left: Cell::new(true),
            right: Cell::new(true),
            circle: Cell::new(true),
            trigger: Cell::new(true),
        }
    }

    fn pins(&self) -> InputPins<FakePin<'_>> {
        InputPins {
            up: Some(FakePin(&self.up)),
            down: Some(FakePin(&self.down)),
            left: Some(FakePin(&self.left)),
            right: Some(FakePin(&self.right)),
            circle: Some(FakePin(&self.circle)),
            trigger: Some(FakePin(&self.trigger)),
        }
    }

    fn press(button: &Cell<bool>) {
        button.set(false);
    }

    fn release(button: &Cell<bool>) {
        button.set(true);
    }
}

/// Host side of the endpoint.
#[derive(Default)]
struct MockHost {
    /// Report written to the endpoint and not yet collected by the host.
    endpoint: Option<Vec<u8>>,
    /// Every report the host collected, in order.
    received: Vec<Vec<u8>>,
    wakeups: usize,
    suspended: bool,
    /// Host is not polling the endpoint.
    stalled: bool,
}

impl HidTransport for MockHost {
    fn is_ready(&self) -> bool {
        !self.suspended && !self.stalled && self.endpoint.is_none()
    }

    fn send(&mut self, payload: ReportPayload) -> Result<(), Error> {
        if self.endpoint.is_some() {
            return Err(Error::TransportBusy);
        }
        self.endpoint = Some(payload.as_bytes().to_vec());
        Ok(())
    }

    fn request_remote_wakeup(&mut self) {
        self.wakeups += 1;
    }
}

impl MockHost {
    fn reports_on(&self, channel: ReportChannel) -> Vec<&[u8]> {
        self.received
            .iter()
            .filter(|r| r[0] == channel.report_id())
            .map(|r| &r[1..])
            .collect()
    }
}

/// Poll every millisecond in `from..to`, letting the host collect each report
/// one millisecond after it was written.
fn run<P: InputPin>(app: &mut App<P>, host: &mut MockHost, from: u64, to: u64) {
    for now in from..to {
        if let Some(report) = host.endpoint.take() {
            host.received.push(report.clone());
            app.on_report_complete(&report, host);
        }
        app.poll(now, host);
    }
}

#[test]
fn idle_device_sends_only_mouse_reports() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    run(&mut app, &mut host, 0, 102);

    assert_eq!(host.received.len(), 10);
    assert!(host.received.iter().all(|r| r.as_slice() == [2, 0, 0, 0, 0]));
}

#[test]
fn manual_mode_deltas() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    Buttons::press(&buttons.down);
    run(&mut app, &mut host, 0, 11);
    Buttons::release(&buttons.down);
    Buttons::press(&buttons.left);
    run(&mut app, &mut host, 11, 21);
    Buttons::release(&buttons.left);
    run(&mut app, &mut host, 21, 32);

    let mouse = host.reports_on(ReportChannel::Mouse);
    assert_eq!(mouse[0], [0, 0, 5, 0]);
    assert_eq!(mouse[1], [0, (-5i8) as u8, 0, 0]);
    assert_eq!(mouse[2], [0, 0, 0, 0]);
}

#[test]
fn opposite_buttons_later_axis_wins() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    Buttons::press(&buttons.up);
    Buttons::press(&buttons.down);
    Buttons::press(&buttons.left);
    Buttons::press(&buttons.right);
    run(&mut app, &mut host, 0, 12);

    assert_eq!(host.reports_on(ReportChannel::Mouse)[0], [0, 5, 5, 0]);
}

#[test]
fn trigger_press_release_and_silence_on_every_channel() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    Buttons::press(&buttons.trigger);
    run(&mut app, &mut host, 0, 20);
    Buttons::release(&buttons.trigger);
    run(&mut app, &mut host, 20, 60);

    // Cycle order on the wire: mouse, keyboard, consumer, gamepad.
    let ids: Vec<u8> = host.received.iter().take(4).map(|r| r[0]).collect();
    assert_eq!(ids, [2, 1, 3, 4]);

    assert_eq!(
        host.reports_on(ReportChannel::Keyboard),
        [&[0u8, 0, 0x04, 0, 0, 0, 0, 0][..], &[0u8; 8][..]]
    );
    assert_eq!(
        host.reports_on(ReportChannel::ConsumerControl),
        [&[0xEAu8, 0x00][..], &[0u8, 0][..]]
    );
    let gamepad = host.reports_on(ReportChannel::Gamepad);
    assert_eq!(gamepad.len(), 2);
    assert_eq!(gamepad[0], [0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0]);
    assert_eq!(gamepad[1], [0; 11]);

    // Later cycles are mouse only.
    assert_eq!(host.received.last().map(|r| r[0]), Some(2));
}

#[test]
fn mode_button_is_debounced() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    // Edge at t=10 flips to circular.
    Buttons::press(&buttons.circle);
    run(&mut app, &mut host, 0, 15);
    assert_eq!(app.mode(), ModeState::Circular);
    assert!(app.mode_indicator());

    // Second press 50 ms later is inside the quiet window.
    Buttons::release(&buttons.circle);
    run(&mut app, &mut host, 15, 55);
    Buttons::press(&buttons.circle);
    run(&mut app, &mut host, 55, 65);
    assert_eq!(app.mode(), ModeState::Circular);

    // A press 250 ms after the first flips back.
    Buttons::release(&buttons.circle);
    run(&mut app, &mut host, 65, 255);
    Buttons::press(&buttons.circle);
    run(&mut app, &mut host, 255, 265);
    assert_eq!(app.mode(), ModeState::Manual);
    assert!(!app.mode_indicator());
}

#[test]
fn circular_mode_traces_a_circle() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    Buttons::press(&buttons.circle);
    run(&mut app, &mut host, 0, 12);

    let mouse = host.reports_on(ReportChannel::Mouse);
    assert_eq!(mouse[0], [0, 5, 0, 0]);
}

#[test]
fn circle_resumes_where_it_stopped_after_backpressure() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    // Toggle at t=10 while the host is not taking reports.
    host.stalled = true;
    Buttons::press(&buttons.circle);
    run(&mut app, &mut host, 0, 320);
    assert_eq!(app.mode(), ModeState::Circular);
    assert!(host.received.is_empty());

    host.stalled = false;
    run(&mut app, &mut host, 320, 332);

    // First step of the circle, not a quarter turn in.
    assert_eq!(host.received[0], [2, 0, 5, 0, 0]);
}

#[test]
fn suspend_wakes_host_once_and_sends_nothing() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();
    run(&mut app, &mut host, 0, 15);
    let before = host.received.len();

    host.suspended = true;
    app.on_suspend(true);
    assert_eq!(app.blink_interval(), BlinkInterval::Suspended);

    run(&mut app, &mut host, 15, 100);
    assert_eq!(host.wakeups, 0);

    Buttons::press(&buttons.trigger);
    run(&mut app, &mut host, 100, 200);
    assert_eq!(host.wakeups, 1);
    assert_eq!(host.received.len(), before);

    host.suspended = false;
    app.on_resume();
    assert_eq!(app.device_state(), DeviceState::Mounted);
    assert_eq!(app.blink_interval(), BlinkInterval::Mounted);

    run(&mut app, &mut host, 200, 215);
    assert!(host.received.len() > before);
}

#[test]
fn heartbeat_follows_power_state() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();

    run(&mut app, &mut host, 0, 250);
    assert!(!app.led());
    run(&mut app, &mut host, 250, 251);
    assert!(app.led());

    app.on_mount();
    run(&mut app, &mut host, 251, 1250);
    assert!(app.led());
    run(&mut app, &mut host, 1250, 1251);
    assert!(!app.led());
}

#[test]
fn caps_lock_overrides_heartbeat() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    app.on_host_output_report(1, &[0x02]).unwrap();
    run(&mut app, &mut host, 0, 3000);
    assert!(app.led());
    assert_eq!(app.blink_interval(), BlinkInterval::Disabled);

    app.on_host_output_report(1, &[0x00]).unwrap();
    assert!(!app.led());
    run(&mut app, &mut host, 3000, 3999);
    assert!(!app.led());
    run(&mut app, &mut host, 3999, 4001);
    assert!(app.led());
}

#[test]
fn unmount_mid_cycle_recovers_on_remount() {
    let buttons = Buttons::new();
    let mut app = App::new(buttons.pins(), 0);
    let mut host = MockHost::default();
    app.on_mount();

    Buttons::press(&buttons.trigger);
    assert_eq!(app.poll(10, &mut host), Step::Sent(ReportChannel::Mouse));

    // The host vanishes with the report still on the endpoint.
    host.endpoint = None;
    app.on_unmount();
    assert_eq!(app.scheduler().in_flight(), None);

    app.on_mount();
    assert_eq!(app.poll(20, &mut host), Step::Sent(ReportChannel::Mouse));
}
