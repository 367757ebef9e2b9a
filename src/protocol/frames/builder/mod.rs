//! Payload generator for outbound frames. Pure functions: no I/O, no state.
//!
//! Callers pick the identifier ([`CanId::COMMAND`] for writes,
//! [`CanId::READ_REQUEST`] for reads) or use the `*_frame` helpers, which take
//! it from the bridge configuration.
use crate::config::BridgeConfig;
use crate::core::{Argument, Measurement, WriteCommand};
use crate::infra::codec::float;
use crate::protocol::frames::{READ_PREFIX, RESPONSE_PREFIX, WRITE_PREFIX};
use crate::protocol::transport::can_frame::{CanFrame, FRAME_LEN};
#[cfg(doc)]
use crate::protocol::transport::can_id::CanId;

/// Outbound request kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Ask the rectifier for one measurement.
    Read(Measurement),
    /// Change a setting.
    Write(WriteCommand),
}

impl Request {
    /// Build the eight-byte payload for this request.
    pub fn payload(&self) -> [u8; FRAME_LEN] {
        match self {
            Request::Read(measurement) => read_payload(*measurement),
            Request::Write(command) => write_payload(command),
        }
    }

    /// Build the complete frame, identifier included.
    pub fn frame(&self, config: &BridgeConfig) -> CanFrame {
        match self {
            Request::Read(measurement) => read_frame(*measurement, config),
            Request::Write(command) => write_frame(command, config),
        }
    }
}

/// `[0x01, 0xF0, 0x00, code, 0, 0, 0, 0]`
pub fn read_payload(measurement: Measurement) -> [u8; FRAME_LEN] {
    let mut data = [0u8; FRAME_LEN];
    data[..3].copy_from_slice(&READ_PREFIX);
    data[3] = measurement.code();
    data
}

/// `[0x03, 0xF0, 0x00, opcode, argument...]`
///
/// Float arguments fill bytes 4..8 most-significant first. Flag arguments set
/// byte 4 to `0x01`/`0x00` and leave bytes 5..8 zero. The argument is not
/// validated here; that is the command gate's job.
pub fn write_payload(command: &WriteCommand) -> [u8; FRAME_LEN] {
    let mut data = [0u8; FRAME_LEN];
    data[..3].copy_from_slice(&WRITE_PREFIX);
    data[3] = command.opcode.code();
    match command.argument {
        Argument::Value(value) => data[4..].copy_from_slice(&float::encode(value)),
        Argument::Flag(on) => data[4] = u8::from(on),
    }
    data
}

/// Read request addressed to the configured read identifier.
pub fn read_frame(measurement: Measurement, config: &BridgeConfig) -> CanFrame {
    CanFrame::new(config.read_request_id, read_payload(measurement))
}

/// Write command addressed to the configured command identifier.
pub fn write_frame(command: &WriteCommand, config: &BridgeConfig) -> CanFrame {
    CanFrame::new(config.command_id, write_payload(command))
}

/// `[0x41, 0xF0, 0x00, code, value...]`, the rectifier side of a read.
///
/// The bridge never sends it; simulators and bench tools do.
pub fn response_payload(measurement: Measurement, value: f32) -> [u8; FRAME_LEN] {
    let mut data = [0u8; FRAME_LEN];
    data[..3].copy_from_slice(&RESPONSE_PREFIX);
    data[3] = measurement.code();
    data[4..].copy_from_slice(&float::encode(value));
    data
}

/// Answer addressed to the configured response identifier.
pub fn response_frame(measurement: Measurement, value: f32, config: &BridgeConfig) -> CanFrame {
    CanFrame::new(config.response_id, response_payload(measurement, value))
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
