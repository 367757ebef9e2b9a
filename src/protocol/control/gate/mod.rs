//! Command gate: admission of write requests and ownership of the settling window.
//!
//! Order of checks for every request:
//! 1. argument domain (no bus traffic on failure);
//! 2. running settling window, under [`OverlapPolicy::Reject`] only;
//! 3. transmission; a refused frame leaves the window untouched;
//! 4. settling commands (re)arm the window, online commands never touch it.
use crate::config::{BridgeConfig, OverlapPolicy};
use crate::core::WriteCommand;
use crate::error::CommandError;
use crate::protocol::control::settling::SettlingWindow;
use crate::protocol::frames::builder::Request;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::traits::can_bus::CanBus;
use embassy_time::{Duration, Instant};

/// Successful submission.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ack {
    /// Command as transmitted.
    pub command: WriteCommand,
    /// Wait announced to the operator when the command settles.
    pub settling_secs: Option<u32>,
}

#[derive(Debug, Clone)]
/// Write admission state machine.
pub struct CommandGate {
    window: SettlingWindow,
    policy: OverlapPolicy,
    command_id: CanId,
}

impl CommandGate {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            window: SettlingWindow::new(Duration::from_millis(config.settling_ms)),
            policy: config.overlap_policy,
            command_id: config.command_id,
        }
    }

    /// Read access for the poller and the status endpoint.
    pub fn window(&self) -> &SettlingWindow {
        &self.window
    }

    pub fn is_settling(&self) -> bool {
        self.window.is_pending()
    }

    /// Seconds left in the running window, or `None` when writes are not
    /// blocked at `now`.
    pub fn blocked(&self, now: Instant) -> Option<u32> {
        match self.policy {
            OverlapPolicy::Reject if self.window.is_pending() && !self.window.is_due(now) => {
                Some(self.window.remaining_secs(now))
            }
            _ => None,
        }
    }

    /// Validate, transmit and, for settling commands, arm the window at `now`.
    pub async fn submit<C: CanBus>(
        &mut self,
        bus: &mut C,
        command: WriteCommand,
        now: Instant,
    ) -> Result<Ack, CommandError<C::Error>> {
        command.validate()?;

        if let Some(remaining_secs) = self.blocked(now) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Command {} refused, settling for {} s",
                command.opcode,
                remaining_secs
            );
            return Err(CommandError::Settling { remaining_secs });
        }

        let frame = CanFrame::new(self.command_id, Request::Write(command).payload());
        if let Err(err) = bus.send(&frame).await {
            #[cfg(feature = "defmt")]
            defmt::error!("Error sending command {}", command.opcode);
            return Err(CommandError::Transport(err));
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Sent command {}: {}", command.opcode, command.argument);

        let settling_secs = if command.opcode.settles() {
            self.window.arm(now);
            #[cfg(feature = "defmt")]
            defmt::info!("Settling window armed");
            Some(self.window.remaining_secs(now))
        } else {
            None
        };

        Ok(Ack {
            command,
            settling_secs,
        })
    }

    /// Clear the window if it ran its full length. Returns `true` on the tick
    /// that cleared it.
    pub fn expire(&mut self, now: Instant) -> bool {
        let cleared = self.window.expire(now);
        if cleared {
            #[cfg(feature = "defmt")]
            defmt::info!("Settling window elapsed, resuming polling");
        }
        cleared
    }
}
