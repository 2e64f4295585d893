//! Composite report scheduler.
//!
//! Four logical HID profiles share one interrupt IN endpoint, and the host
//! acknowledges one report at a time. Every [`REPORT_INTERVAL_MS`] the
//! scheduler starts a cycle at [`FIRST_CHANNEL`]. Each completion
//! notification advances it to the next channel of the transition table
//! until the table ends. Channels with nothing to say, or that the transport
//! cannot take right now, are skipped on the spot.
//!
//! At most one report is ever awaiting completion. A tick that finds a
//! report still in flight does nothing; the cycle it would have started is
//! simply dropped.

mod policy;

pub use policy::{next_channel, plan, CycleInput, PendingState, Planned, FIRST_CHANNEL};

use crate::config::REPORT_INTERVAL_MS;
use crate::error::Error;
use crate::hid::ReportChannel;
use crate::input::InputSnapshot;
use crate::mode::ModeController;
use crate::power::PowerMonitor;
use crate::timing::{Cadence, Millis};
use crate::transport::{HidTransport, ReportPayload};

/// Per-channel transmission state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    Idle,
    AwaitingCompletion,
}

/// Outcome of one scheduler entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// The report interval has not elapsed.
    NotDue,
    /// Bus suspended, nothing sent.
    Suspended,
    /// Bus suspended with input held; remote wakeup was signalled.
    Wakeup,
    /// A report of this channel is still awaiting completion.
    Busy(ReportChannel),
    /// The transport refused the first report of the cycle.
    NotReady,
    /// A report of this channel was handed to the transport.
    Sent(ReportChannel),
    /// Every remaining channel was skipped; the cycle is over.
    CycleComplete,
    /// A completion that matched nothing in flight.
    Ignored,
}

/// Owns the pending table and the single in-flight slot.
#[derive(Debug)]
pub struct ReportScheduler {
    cadence: Cadence,
    pending: PendingState,
    in_flight: Option<ReportChannel>,
    /// Input captured at the start of the running cycle.
    cycle: Option<CycleInput>,
}

impl ReportScheduler {
    /// Scheduler whose first cycle is due one interval after `origin`.
    pub const fn new(origin: Millis) -> Self {
        Self {
            cadence: Cadence::new(origin),
            pending: PendingState::new(),
            in_flight: None,
            cycle: None,
        }
    }

    /// Consume one report interval if it has elapsed.
    ///
    /// Returns `true` at most once per interval boundary; callers sample
    /// input and call [`start_cycle`](Self::start_cycle) only then.
    pub fn is_due(&mut self, now: Millis) -> bool {
        self.cadence.elapsed(now, REPORT_INTERVAL_MS)
    }

    /// Periodic entry point: [`is_due`](Self::is_due) followed by
    /// [`start_cycle`](Self::start_cycle).
    pub fn tick<T: HidTransport>(
        &mut self,
        now: Millis,
        snapshot: InputSnapshot,
        mode: &mut ModeController,
        power: &mut PowerMonitor,
        transport: &mut T,
    ) -> Step {
        if !self.is_due(now) {
            return Step::NotDue;
        }
        self.start_cycle(snapshot, mode, power, transport)
    }

    /// Start a report cycle with the input sampled for it.
    ///
    /// The pointer motion is taken from `mode` only once the mouse report
    /// has been accepted, so a cycle that sends nothing leaves the circular
    /// phase where it was.
    pub fn start_cycle<T: HidTransport>(
        &mut self,
        snapshot: InputSnapshot,
        mode: &mut ModeController,
        power: &mut PowerMonitor,
        transport: &mut T,
    ) -> Step {
        if power.is_suspended() {
            if power.request_wakeup_if_applicable(snapshot.is_active()) {
                transport.request_remote_wakeup();
                return Step::Wakeup;
            }
            return Step::Suspended;
        }

        if let Some(channel) = self.in_flight {
            trace!("scheduler: {} still in flight, cycle skipped", channel);
            return Step::Busy(channel);
        }

        if !transport.is_ready() {
            return Step::NotReady;
        }

        let mut next_mode = *mode;
        let input = CycleInput::new(snapshot, next_mode.advance(&snapshot));

        match self.emit(FIRST_CHANNEL, &input, transport) {
            Some(Ok(())) => {
                *mode = next_mode;
                self.cycle = Some(input);
                Step::Sent(FIRST_CHANNEL)
            }
            Some(Err(e)) => {
                debug!("scheduler: cycle deferred: {}", e);
                self.cycle = None;
                Step::NotReady
            }
            None => {
                self.cycle = Some(input);
                self.advance(next_channel(FIRST_CHANNEL), transport)
            }
        }
    }

    /// The transport finished sending a report of `channel`.
    ///
    /// Frees the endpoint and moves on to the next channel of the cycle.
    pub fn on_report_sent<T: HidTransport>(
        &mut self,
        channel: ReportChannel,
        transport: &mut T,
    ) -> Step {
        match self.in_flight {
            Some(expected) if expected == channel => {}
            Some(expected) => {
                warn!(
                    "scheduler: completion for {} while {} in flight",
                    channel, expected
                );
                return Step::Ignored;
            }
            None => {
                debug!("scheduler: completion for {} with nothing in flight", channel);
                return Step::Ignored;
            }
        }

        self.in_flight = None;
        self.advance(next_channel(channel), transport)
    }

    /// Completion carrying the raw report as sent, report id first.
    pub fn on_report_complete<T: HidTransport>(
        &mut self,
        report: &[u8],
        transport: &mut T,
    ) -> Step {
        let Some(&id) = report.first() else {
            warn!("scheduler: empty completion report");
            return Step::Ignored;
        };

        match ReportChannel::from_report_id(id) {
            Ok(channel) => self.on_report_sent(channel, transport),
            Err(e) => {
                warn!("scheduler: completion ignored: {}", e);
                Step::Ignored
            }
        }
    }

    pub fn channel_state(&self, channel: ReportChannel) -> ChannelState {
        if self.in_flight == Some(channel) {
            ChannelState::AwaitingCompletion
        } else {
            ChannelState::Idle
        }
    }

    pub fn in_flight(&self) -> Option<ReportChannel> {
        self.in_flight
    }

    /// `true` while `channel` owes the host a release report.
    pub fn is_latched(&self, channel: ReportChannel) -> bool {
        self.pending.is_latched(channel)
    }

    /// `true` between the start of a cycle and its last report.
    pub fn cycle_active(&self) -> bool {
        self.cycle.is_some()
    }

    /// Drop the running cycle, the in-flight slot and every latch.
    ///
    /// Used when the host deconfigures the device: completions for reports
    /// sent before that will never arrive.
    pub fn reset(&mut self) {
        if let Some(channel) = self.in_flight.take() {
            debug!("scheduler: reset with {} in flight", channel);
        }
        self.cycle = None;
        self.pending.clear();
    }

    /// Walk the transition table from `start` until a report is accepted or
    /// the table ends.
    fn advance<T: HidTransport>(
        &mut self,
        start: Option<ReportChannel>,
        transport: &mut T,
    ) -> Step {
        let Some(input) = self.cycle else {
            return Step::Ignored;
        };

        let mut next = start;
        while let Some(channel) = next {
            next = next_channel(channel);

            if !transport.is_ready() {
                debug!("scheduler: transport not ready, {} skipped", channel);
                continue;
            }

            match self.emit(channel, &input, transport) {
                Some(Ok(())) => return Step::Sent(channel),
                Some(Err(e)) => debug!("scheduler: {} skipped: {}", channel, e),
                None => {}
            }
        }

        self.cycle = None;
        Step::CycleComplete
    }

    /// Build and hand over the report of `channel`. `None` when the channel
    /// has nothing to send; on success the channel is in flight and its
    /// latch is updated.
    fn emit<T: HidTransport>(
        &mut self,
        channel: ReportChannel,
        input: &CycleInput,
        transport: &mut T,
    ) -> Option<Result<(), Error>> {
        let planned = plan(channel, input, &self.pending)?;
        let result = ReportPayload::new(&planned.report).and_then(|payload| transport.send(payload));
        if result.is_ok() {
            self.pending.set(channel, planned.latch);
            self.in_flight = Some(channel);
            trace!("scheduler: sent {}", channel);
        }
        Some(result)
    }
}
