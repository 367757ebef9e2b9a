//! Minimal abstraction over the CAN controller driving the rectifier link.
//! Lets the bridge plug into any driver (MCP2515 over SPI, on-chip TWAI/bxCAN,
//! a desktop adapter, a test double).
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Contract to bring up the controller, send frames, and poll for received ones.
pub trait CanBus {
    type Error: core::fmt::Debug;

    /// Start the controller (bitrate, acceptance filters, normal mode).
    ///
    /// Drivers that come up already configured keep the default.
    fn start<'a>(
        &'a mut self,
        _bitrate: u32,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a {
        async { Ok(()) }
    }

    /// Hand a frame to the controller. Must not wait for bus acknowledgement.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Return the next frame already received, or `None` if the RX queue is empty.
    /// Never blocks.
    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error>;
}
