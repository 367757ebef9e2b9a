//! Test doubles shared by the control-loop unit tests.
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::traits::clock::Clock;
use core::cell::Cell;
use core::future::Future;
use core::task::{Context, Poll, Waker};
use embassy_time::Instant;
use heapless::{Deque, Vec};

/// Drive a future that never waits on I/O to completion.
pub(crate) fn block_on<F: Future>(fut: F) -> F::Output {
    let mut fut = core::pin::pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(output) = fut.as_mut().poll(&mut cx) {
            return output;
        }
    }
}

/// Bus that records sent frames and replays queued inbound ones.
#[derive(Default)]
pub(crate) struct RecordingBus {
    pub sent: Vec<CanFrame, 32>,
    pub inbound: Deque<CanFrame, 16>,
    pub fail_sends: bool,
}

impl CanBus for RecordingBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        if self.fail_sends {
            return Err(());
        }
        self.sent.push(*frame).map_err(|_| ())
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        Ok(self.inbound.pop_front())
    }
}

/// Manually stepped clock.
#[derive(Default)]
pub(crate) struct ManualClock {
    millis: Cell<u64>,
}

impl ManualClock {
    pub fn set(&self, millis: u64) {
        self.millis.set(millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.millis.get())
    }
}

/// Timer that returns at once and accumulates the requested delays.
#[derive(Default)]
pub(crate) struct CountingTimer {
    pub waited_ms: u64,
    pub calls: usize,
}

impl crate::protocol::transport::traits::bridge_timer::BridgeTimer for CountingTimer {
    async fn delay_ms<'a>(&'a mut self, millis: u32) {
        self.waited_ms += u64::from(millis);
        self.calls += 1;
    }
}
