//! Bridge supervisor built on top of [`Controller`].
//!
//! It keeps the control loop ticking and serialises the network layer's
//! requests into it, so the device state, the settling window and the
//! polling cycle are only ever touched from the runner:
//!
//! * [`BridgeHandle`]: what the network layer calls (submit a write, read status);
//! * [`BridgeRunner`]: the loop to spawn (or `select` on) in the firmware.
//!
//! Firmware provides a pre-allocated [`BridgeChannels`]; no allocation is
//! performed by the library and there is no dependency on a particular BSP.

use core::fmt::Debug;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use futures_util::{future::select, future::Either, pin_mut};

use crate::config::BridgeConfig;
use crate::core::WriteCommand;
use crate::error::{BridgeRunError, CommandError, InitError};
use crate::protocol::control::controller::{Controller, StatusReport};
use crate::protocol::control::gate::Ack;
use crate::protocol::control::startup::bring_up;
use crate::protocol::transport::traits::{
    bridge_timer::BridgeTimer, can_bus::CanBus, clock::Clock,
};

/// Outcome of a write request as seen by the network layer.
pub type SubmitResult = Result<Ack, CommandError<()>>;

/// Requests queued by the network layer. `seq` ties a request to its reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BridgeRequest {
    Submit { seq: u32, command: WriteCommand },
    Status { seq: u32 },
}

/// Reply to the request carrying the same `seq`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tagged<T> {
    pub seq: u32,
    pub value: T,
}

/// Channels shared between the runner and its handle.
///
/// A caller that gives up on a request leaves it queued; its reply is
/// still produced and is discarded by the next caller.
pub struct BridgeChannels<const CAP: usize> {
    requests: Channel<CriticalSectionRawMutex, BridgeRequest, CAP>,
    acks: Channel<CriticalSectionRawMutex, Tagged<SubmitResult>, CAP>,
    statuses: Channel<CriticalSectionRawMutex, Tagged<StatusReport>, CAP>,
}

impl<const CAP: usize> Default for BridgeChannels<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> BridgeChannels<CAP> {
    pub const fn new() -> Self {
        Self {
            requests: Channel::new(),
            acks: Channel::new(),
            statuses: Channel::new(),
        }
    }
}

/// Service assembling the supervisor components.
pub struct BridgeService<'a, C: CanBus, K: Clock, T: BridgeTimer, const CAP: usize>
where
    C::Error: Debug,
{
    controller: Controller<C, K>,
    timer: T,
    channels: &'a BridgeChannels<CAP>,
}

impl<'a, C, K, T, const CAP: usize> BridgeService<'a, C, K, T, CAP>
where
    C: CanBus,
    C::Error: Debug,
    K: Clock,
    T: BridgeTimer,
{
    /// Wrap an already-running [`Controller`].
    pub fn new(controller: Controller<C, K>, timer: T, channels: &'a BridgeChannels<CAP>) -> Self {
        Self {
            controller,
            timer,
            channels,
        }
    }

    /// Convenience helper: bring the bus up, build the controller, prime the
    /// readings, then build the service.
    pub async fn start(
        mut bus: C,
        clock: K,
        mut timer: T,
        config: BridgeConfig,
        channels: &'a BridgeChannels<CAP>,
    ) -> Result<Self, InitError<C::Error>> {
        bring_up(&mut bus, &mut timer, &config).await?;

        let mut controller = Controller::new(bus, clock, config);
        if config.prime_on_start {
            controller.prime().await;
        }
        Ok(Self::new(controller, timer, channels))
    }

    /// Split into handle/runner components.
    pub fn into_parts(self) -> (BridgeHandle<'a, CAP>, BridgeRunner<'a, C, K, T, CAP>) {
        (
            BridgeHandle {
                channels: self.channels,
                next_seq: 0,
            },
            BridgeRunner {
                controller: self.controller,
                timer: self.timer,
                channels: self.channels,
            },
        )
    }
}

/// Runner that drives the control loop.
pub struct BridgeRunner<'a, C, K, T, const CAP: usize>
where
    C: CanBus,
    C::Error: Debug,
    K: Clock,
    T: BridgeTimer,
{
    controller: Controller<C, K>,
    timer: T,
    channels: &'a BridgeChannels<CAP>,
}

impl<'a, C, K, T, const CAP: usize> BridgeRunner<'a, C, K, T, CAP>
where
    C: CanBus,
    C::Error: Debug,
    K: Clock,
    T: BridgeTimer,
{
    pub fn controller(&self) -> &Controller<C, K> {
        &self.controller
    }

    /// Run the control loop.
    ///
    /// Waits for either a request or the tick period. A request is served
    /// and followed by a tick, so a busy client cannot starve polling.
    ///
    /// A receive error restarts the controller with the bring-up policy.
    /// Only a failed restart ends the loop.
    pub async fn drive(mut self) -> Result<(), BridgeRunError<C::Error>> {
        let channels = self.channels;
        let tick_ms = self.controller.config().tick_ms;

        loop {
            let request = {
                let request_future = channels.requests.receive();
                let tick_future = self.timer.delay_ms(tick_ms);
                pin_mut!(request_future);
                pin_mut!(tick_future);

                match select(request_future, tick_future).await {
                    Either::Left((request, _)) => Some(request),
                    Either::Right(_) => None,
                }
            };

            if let Some(request) = request {
                self.serve(request).await;
            }

            if let Err(_err) = self.controller.tick().await {
                #[cfg(feature = "defmt")]
                defmt::error!("CAN receive error, restarting controller");
                self.restart().await?;
            }
        }
    }

    async fn restart(&mut self) -> Result<(), BridgeRunError<C::Error>> {
        let config = *self.controller.config();
        bring_up(self.controller.bus_mut(), &mut self.timer, &config).await?;
        Ok(())
    }

    async fn serve(&mut self, request: BridgeRequest) {
        match request {
            BridgeRequest::Submit { seq, command } => {
                let value = self.controller.submit(command).await.map_err(CommandError::erase);
                if self.channels.acks.try_send(Tagged { seq, value }).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Acknowledgement {} dropped, no reader", seq);
                }
            }
            BridgeRequest::Status { seq } => {
                let value = self.controller.status();
                if self.channels.statuses.try_send(Tagged { seq, value }).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Status {} dropped, no reader", seq);
                }
            }
        }
    }
}

/// Handle used by the network layer. One request is in flight at a time.
pub struct BridgeHandle<'a, const CAP: usize> {
    channels: &'a BridgeChannels<CAP>,
    next_seq: u32,
}

impl<'a, const CAP: usize> BridgeHandle<'a, CAP> {
    fn take_seq(&mut self) -> u32 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        seq
    }

    /// Queue a write request and wait for the gate's verdict.
    pub async fn submit(&mut self, command: WriteCommand) -> SubmitResult {
        let seq = self.take_seq();
        self.channels
            .requests
            .send(BridgeRequest::Submit { seq, command })
            .await;
        loop {
            let reply = self.channels.acks.receive().await;
            if reply.seq == seq {
                return reply.value;
            }
        }
    }

    /// Current readings and settling status.
    pub async fn status(&mut self) -> StatusReport {
        let seq = self.take_seq();
        self.channels.requests.send(BridgeRequest::Status { seq }).await;
        loop {
            let reply = self.channels.statuses.receive().await;
            if reply.seq == seq {
                return reply.value;
            }
        }
    }
}
