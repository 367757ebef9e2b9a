//! Control loop of the bridge.
//!
//! Everything here runs on one logical thread: the [`supervisor`] runner
//! interleaves queued network requests with periodic ticks of the
//! [`controller`], which owns the device state, the command gate (and its
//! settling window) and the polling sequencer. No locks are needed.
pub mod controller;
pub mod gate;
pub mod poller;
pub mod settling;
pub mod startup;
pub mod state;
pub mod supervisor;

#[cfg(test)]
pub(crate) mod test_support;
