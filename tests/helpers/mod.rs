/// Test doubles to simulate the CAN bus, the rectifier, time and delays
/// during integration tests.
use embassy_time::Instant;
use r48_can_bridge::config::BridgeConfig;
use r48_can_bridge::core::Measurement;
use r48_can_bridge::protocol::frames::builder::response_frame;
use r48_can_bridge::protocol::frames::READ_PREFIX;
use r48_can_bridge::protocol::transport::{
    can_frame::CanFrame,
    traits::{bridge_timer::BridgeTimer, can_bus::CanBus, clock::Clock},
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::{sleep, Duration};

#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: mpsc::UnboundedReceiver<CanFrame>,
    fail_sends: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses (bridge ↔ rectifier).
    pub fn create_pair() -> (Self, Self) {
        let (dut_tx, host_rx) = mpsc::unbounded_channel();
        let (host_tx, dut_rx) = mpsc::unbounded_channel();

        let dut_bus = Self {
            tx: dut_tx,
            rx: dut_rx,
            fail_sends: Arc::new(AtomicBool::new(false)),
        };

        let host_bus = Self {
            tx: host_tx,
            rx: host_rx,
            fail_sends: Arc::new(AtomicBool::new(false)),
        };

        (dut_bus, host_bus)
    }

    /// Switch that makes every later `send` fail.
    pub fn send_failure_switch(&self) -> Arc<AtomicBool> {
        self.fail_sends.clone()
    }

    /// Wait for the next frame from the other end.
    pub async fn recv(&mut self) -> Option<CanFrame> {
        self.rx.recv().await
    }

    /// Every frame already delivered by the other end.
    pub fn drain(&mut self) -> Vec<CanFrame> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(frame);
        }
        frames
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(());
        }
        self.tx.send(*frame).map_err(|_| ())?;
        Ok(())
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(()),
        }
    }
}

#[allow(dead_code)]
#[derive(Clone, Default)]
/// Clock stepped by the test, shared with the bridge.
pub struct SharedClock(Arc<AtomicU64>);

#[allow(dead_code)]
impl SharedClock {
    pub fn set_ms(&self, millis: u64) {
        self.0.store(millis, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, millis: u64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for SharedClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0.load(Ordering::SeqCst))
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive delays in tests.
pub struct MockTimer;

impl BridgeTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[allow(dead_code)]
/// Readings the simulated rectifier reports.
pub const BENCH_READINGS: [(Measurement, f32); 5] = [
    (Measurement::OutputVoltage, 53.5),
    (Measurement::OutputCurrent, 12.25),
    (Measurement::OutputCurrentLimit, 1.0),
    (Measurement::Temperature, 31.0),
    (Measurement::SupplyVoltage, 230.5),
];

#[allow(dead_code)]
/// Answer every read request already queued on `host_bus`; returns the
/// frames that were not read requests (write commands).
pub async fn answer_reads(host_bus: &mut MockCanBus) -> Vec<CanFrame> {
    let config = BridgeConfig::new();
    let mut others = Vec::new();

    for frame in host_bus.drain() {
        if frame.id != config.read_request_id || frame.data[..3] != READ_PREFIX {
            others.push(frame);
            continue;
        }
        let Some(measurement) = Measurement::from_code(frame.data[3]) else {
            continue;
        };
        let value = BENCH_READINGS
            .iter()
            .find(|(m, _)| *m == measurement)
            .map(|(_, v)| *v)
            .unwrap_or_default();
        host_bus
            .send(&response_frame(measurement, value, &config))
            .await
            .expect("bridge side must be alive");
    }
    others
}

#[allow(dead_code)]
/// Utility loop: play the rectifier until the bridge hangs up.
pub async fn simulate_rectifier(mut host_bus: MockCanBus) {
    loop {
        answer_reads(&mut host_bus).await;
        sleep(Duration::from_millis(5)).await;
    }
}
