//! Body of the control loop: one owner for the bus, the clock, the device
//! state, the command gate and the polling sequencer.
//!
//! A [`Controller::tick`] does, in order:
//! 1. drain every frame already received and feed it to the parser;
//! 2. let the polling sequencer transmit whatever batch is due;
//! 3. clear the settling window if it ran out (polling restarts from `Idle`).
//!
//! Write requests go through [`Controller::submit`] between ticks.
use crate::config::BridgeConfig;
use crate::core::{Measurement, WriteCommand};
use crate::error::CommandError;
use crate::protocol::control::gate::{Ack, CommandGate};
use crate::protocol::control::poller::{PollSequencer, PollTiming};
use crate::protocol::control::state::{DeviceState, Readings};
use crate::protocol::frames::builder::Request;
use crate::protocol::frames::parser;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::{can_bus::CanBus, clock::Clock};

/// What the status endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub readings: Readings,
    pub command_pending: bool,
    /// Whole seconds until the settling window clears; `0` when idle.
    pub remaining_secs: u32,
}

/// Counters describing one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Frames pulled from the bus.
    pub received: usize,
    /// Frames that updated a reading.
    pub accepted: usize,
    /// Read requests handed to the bus.
    pub requested: usize,
    /// The settling window cleared during this tick.
    pub settled: bool,
}

/// Rectifier control loop state.
pub struct Controller<C: CanBus, K: Clock> {
    bus: C,
    clock: K,
    config: BridgeConfig,
    state: DeviceState,
    gate: CommandGate,
    poller: PollSequencer,
}

impl<C: CanBus, K: Clock> Controller<C, K>
where
    C::Error: core::fmt::Debug,
{
    pub fn new(bus: C, clock: K, config: BridgeConfig) -> Self {
        let now = clock.now();
        Self {
            bus,
            clock,
            state: DeviceState::new(),
            gate: CommandGate::new(&config),
            poller: PollSequencer::new(PollTiming::from_config(&config), now),
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn gate(&self) -> &CommandGate {
        &self.gate
    }

    pub fn poller(&self) -> &PollSequencer {
        &self.poller
    }

    pub fn bus(&self) -> &C {
        &self.bus
    }

    /// Driver access, used to restart the controller after a receive error.
    pub fn bus_mut(&mut self) -> &mut C {
        &mut self.bus
    }

    /// Request every measurement once, back to back. Used right after start so
    /// the status endpoint has data before the first polling cycle.
    pub async fn prime(&mut self) -> usize {
        let mut requested = 0;
        for measurement in Measurement::ALL {
            if self.request(measurement).await {
                requested += 1;
            }
        }
        requested
    }

    /// One pass of the control loop.
    ///
    /// Returns the bus error if the receive queue cannot be read; frames
    /// already drained in this tick have been applied.
    pub async fn tick(&mut self) -> Result<TickReport, C::Error> {
        let mut report = TickReport::default();

        while let Some(frame) = self.bus.try_recv()? {
            report.received += 1;
            if self.handle_frame(&frame) {
                report.accepted += 1;
            }
        }

        let now = self.clock.now();
        if let Some(batch) = self.poller.advance(now, self.gate.is_settling()) {
            for measurement in batch {
                if self.request(*measurement).await {
                    report.requested += 1;
                }
            }
        }

        if self.gate.expire(now) {
            self.poller.reset();
            report.settled = true;
        }

        Ok(report)
    }

    /// Submit a write request at the current time.
    pub async fn submit(&mut self, command: WriteCommand) -> Result<Ack, CommandError<C::Error>> {
        let now = self.clock.now();
        self.gate.submit(&mut self.bus, command, now).await
    }

    /// Readings plus settling status at the current time.
    pub fn status(&self) -> StatusReport {
        let now = self.clock.now();
        let window = self.gate.window();
        StatusReport {
            readings: self.state.snapshot(),
            command_pending: window.is_pending(),
            remaining_secs: window.remaining_secs(now),
        }
    }

    /// Apply one received frame. Returns `true` if a reading was updated.
    fn handle_frame(&mut self, frame: &CanFrame) -> bool {
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "RX id={:#010x} len={} data={:02x}",
            frame.id.as_raw(),
            frame.len,
            frame.payload()
        );

        match parser::ingest(&mut self.state, frame, self.config.response_id) {
            Ok(_reading) => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "Reading {:#04x} = {}",
                    _reading.measurement.code(),
                    _reading.value
                );
                true
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                log_dropped(&_err);
                false
            }
        }
    }

    /// Send one read request. Failures are logged; the next cycle retries.
    async fn request(&mut self, measurement: Measurement) -> bool {
        let frame = Request::Read(measurement).frame(&self.config);
        match self.bus.send(&frame).await {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("Sent read request {:#04x}", measurement.code());
                true
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Error requesting measurement {:#04x}", measurement.code());
                false
            }
        }
    }
}

#[cfg(feature = "defmt")]
fn log_dropped(err: &crate::error::FrameError) {
    match err {
        crate::error::FrameError::UnknownMeasurement { code, value } => {
            defmt::warn!("Unknown measurement code {:#04x} = {}", code, value)
        }
        other => defmt::debug!("Frame dropped: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::codec::float;
    use crate::protocol::control::poller::PollCycle;
    use crate::protocol::control::test_support::{block_on, ManualClock, RecordingBus};
    use crate::protocol::transport::can_id::CanId;

    fn answer(measurement: Measurement, value: f32) -> CanFrame {
        let b = float::encode(value);
        CanFrame::new(
            CanId::RESPONSE,
            [0x41, 0xF0, 0x00, measurement.code(), b[0], b[1], b[2], b[3]],
        )
    }

    fn requested_codes(bus: &RecordingBus) -> heapless::Vec<u8, 32> {
        bus.sent
            .iter()
            .filter(|f| f.id == CanId::READ_REQUEST)
            .map(|f| f.data[3])
            .collect()
    }

    #[test]
    fn prime_requests_all_five() {
        let clock = ManualClock::default();
        let mut ctl = Controller::new(RecordingBus::default(), &clock, BridgeConfig::new());
        assert_eq!(block_on(ctl.prime()), 5);
        assert_eq!(&requested_codes(ctl.bus())[..], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn read_requests_use_configured_layout() {
        let clock = ManualClock::default();
        let config = BridgeConfig::new();
        let mut ctl = Controller::new(RecordingBus::default(), &clock, config);
        block_on(ctl.prime());

        for (frame, measurement) in ctl.bus().sent.iter().zip(Measurement::ALL) {
            assert_eq!(*frame, Request::Read(measurement).frame(&config));
        }
    }

    #[test]
    fn tick_drains_inbound_frames() {
        let clock = ManualClock::default();
        let mut bus = RecordingBus::default();
        bus.inbound.push_back(answer(Measurement::OutputVoltage, 53.5)).unwrap();
        bus.inbound.push_back(answer(Measurement::Temperature, 38.0)).unwrap();
        let mut foreign = answer(Measurement::OutputCurrent, 1.0);
        foreign.id = CanId::from_raw(0x0707_0707);
        bus.inbound.push_back(foreign).unwrap();

        let mut ctl = Controller::new(bus, &clock, BridgeConfig::new());
        let report = block_on(ctl.tick()).unwrap();

        assert_eq!(report.received, 3);
        assert_eq!(report.accepted, 2);
        assert_eq!(ctl.state().get(Measurement::OutputVoltage), 53.5);
        assert_eq!(ctl.state().get(Measurement::Temperature), 38.0);
        assert_eq!(ctl.state().get(Measurement::OutputCurrent), 0.0);
    }

    #[test]
    fn polling_suspended_while_settling_then_resumes_from_idle() {
        let clock = ManualClock::default();
        let mut ctl = Controller::new(RecordingBus::default(), &clock, BridgeConfig::new());

        // Enter mid-cycle.
        clock.set(5_001);
        block_on(ctl.tick()).unwrap();
        assert_eq!(ctl.poller().state(), PollCycle::AwaitingCurrentBatch);

        clock.set(5_050);
        block_on(ctl.submit(WriteCommand::permanent_voltage(52.5))).unwrap();
        let sent_before = ctl.bus().sent.len();

        for t in [5_200, 10_000, 30_000, 50_049] {
            clock.set(t);
            let report = block_on(ctl.tick()).unwrap();
            assert_eq!(report.requested, 0);
        }
        assert_eq!(ctl.bus().sent.len(), sent_before);
        assert_eq!(ctl.poller().state(), PollCycle::AwaitingCurrentBatch);

        clock.set(50_050);
        let report = block_on(ctl.tick()).unwrap();
        assert!(report.settled);
        assert_eq!(ctl.poller().state(), PollCycle::Idle);

        // Idle has been waiting since 5_001: the next tick starts a new cycle.
        clock.set(50_060);
        let report = block_on(ctl.tick()).unwrap();
        assert_eq!(report.requested, 1);
        assert_eq!(ctl.bus().sent.last().map(|f| f.data[3]), Some(0x01));
    }

    #[test]
    fn status_counts_down() {
        let clock = ManualClock::default();
        let mut ctl = Controller::new(RecordingBus::default(), &clock, BridgeConfig::new());

        clock.set(1_000);
        block_on(ctl.submit(WriteCommand::permanent_voltage(52.5))).unwrap();

        clock.set(11_000);
        let status = ctl.status();
        assert!(status.command_pending);
        assert_eq!(status.remaining_secs, 35);
    }
}
