//! One control-loop iteration over every component.
//!
//! [`App`] owns all scheduler-side state. The firmware calls [`App::poll`]
//! from its loop and forwards USB events to the `on_*` methods; host tests
//! drive it the same way with fake pins and a mock transport.

use crate::blink::HeartbeatBlinker;
use crate::error::Error;
use crate::hid::keyboard::KeyboardLeds;
use crate::hid::ReportChannel;
use crate::input::{InputPins, InputSampler};
use crate::mode::{ModeController, ModeState};
use crate::power::{BlinkInterval, DeviceState, PowerMonitor};
use crate::scheduler::{ReportScheduler, Step};
use crate::timing::Millis;
use crate::transport::HidTransport;
use embedded_hal::digital::InputPin;

pub struct App<P> {
    sampler: InputSampler<P>,
    mode: ModeController,
    power: PowerMonitor,
    blinker: HeartbeatBlinker,
    scheduler: ReportScheduler,
}

impl<P: InputPin> App<P> {
    /// Fresh state: unattached, manual mode, LEDs off, clocks starting at
    /// `origin`.
    pub fn new(pins: InputPins<P>, origin: Millis) -> Self {
        Self {
            sampler: InputSampler::new(pins),
            mode: ModeController::new(),
            power: PowerMonitor::new(),
            blinker: HeartbeatBlinker::new(origin),
            scheduler: ReportScheduler::new(origin),
        }
    }

    /// Run one loop iteration: heartbeat, then a report cycle if one is due.
    pub fn poll<T: HidTransport>(&mut self, now: Millis, transport: &mut T) -> Step {
        self.blinker.tick(now, self.power.blink_interval());

        if !self.scheduler.is_due(now) {
            return Step::NotDue;
        }

        let snapshot = self.sampler.sample(now);
        if snapshot.toggle {
            self.mode.toggle();
        }

        self.scheduler
            .start_cycle(snapshot, &mut self.mode, &mut self.power, transport)
    }

    /// The transport finished a report of `channel`.
    pub fn on_report_sent<T: HidTransport>(
        &mut self,
        channel: ReportChannel,
        transport: &mut T,
    ) -> Step {
        self.scheduler.on_report_sent(channel, transport)
    }

    /// The transport finished a report, identified by its wire bytes.
    pub fn on_report_complete<T: HidTransport>(&mut self, report: &[u8], transport: &mut T) -> Step {
        self.scheduler.on_report_complete(report, transport)
    }

    pub fn on_mount(&mut self) {
        self.power.on_mount();
    }

    /// Host went away: in-flight reports will never complete.
    pub fn on_unmount(&mut self) {
        self.power.on_unmount();
        self.scheduler.reset();
        self.set_lock_indicator(false);
    }

    pub fn on_suspend(&mut self, remote_wakeup_allowed: bool) {
        self.power.on_suspend(remote_wakeup_allowed);
    }

    pub fn on_resume(&mut self) {
        self.power.on_resume();
    }

    /// SET_REPORT (Output) from the host.
    ///
    /// Only the keyboard LED report is understood. Anything else is rejected
    /// without touching state.
    pub fn on_host_output_report(&mut self, report_id: u8, data: &[u8]) -> Result<(), Error> {
        let channel = ReportChannel::from_report_id(report_id)?;
        if channel != ReportChannel::Keyboard {
            return Err(Error::UnknownReportId(report_id));
        }

        let leds = KeyboardLeds::from_output_report(data)?;
        self.set_lock_indicator(leds.caps_lock());
        Ok(())
    }

    /// Heartbeat LED level.
    pub fn led(&self) -> bool {
        self.blinker.level()
    }

    /// Mode LED level.
    pub fn mode_indicator(&self) -> bool {
        self.mode.indicator()
    }

    pub fn blink_interval(&self) -> BlinkInterval {
        self.power.blink_interval()
    }

    pub fn mode(&self) -> ModeState {
        self.mode.mode()
    }

    pub fn device_state(&self) -> DeviceState {
        self.power.state()
    }

    pub fn scheduler(&self) -> &ReportScheduler {
        &self.scheduler
    }

    fn set_lock_indicator(&mut self, on: bool) {
        self.power.set_lock_indicator(on);
        self.blinker.force(on);
    }
}
