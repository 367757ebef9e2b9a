//! Decoder for rectifier answers.
//!
//! The bus carries traffic the bridge does not model (other rectifiers'
//! broadcasts, alarms, echoes). Such frames are reported as [`FrameError`]
//! and must simply be dropped by the caller; none of them is a fault.
use crate::core::Measurement;
use crate::error::FrameError;
use crate::infra::codec::float;
use crate::protocol::control::state::DeviceState;
use crate::protocol::frames::RESPONSE_PREFIX;
use crate::protocol::transport::can_frame::{CanFrame, FRAME_LEN};
use crate::protocol::transport::can_id::CanId;

/// A decoded measurement answer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub measurement: Measurement,
    pub value: f32,
}

/// Validate `frame` as an answer on `response_id` and decode it.
///
/// Accepted frames carry exactly eight bytes starting with
/// `[0x41, 0xF0, 0x00]`; byte 3 is the measurement code and bytes 4..8 the
/// value, most-significant byte first.
pub fn decode_response(frame: &CanFrame, response_id: CanId) -> Result<Reading, FrameError> {
    if frame.id != response_id {
        return Err(FrameError::UnexpectedId {
            id: frame.id.as_raw(),
        });
    }
    if frame.len != FRAME_LEN {
        return Err(FrameError::InvalidDataLen { len: frame.len });
    }
    if frame.data[..3] != RESPONSE_PREFIX {
        return Err(FrameError::UnexpectedPrefix);
    }

    let code = frame.data[3];
    let value = float::decode([frame.data[4], frame.data[5], frame.data[6], frame.data[7]]);

    match Measurement::from_code(code) {
        Some(measurement) => Ok(Reading { measurement, value }),
        None => Err(FrameError::UnknownMeasurement { code, value }),
    }
}

/// Decode `frame` and store the reading in `state`.
///
/// On error `state` is left untouched.
pub fn ingest(
    state: &mut DeviceState,
    frame: &CanFrame,
    response_id: CanId,
) -> Result<Reading, FrameError> {
    let reading = decode_response(frame, response_id)?;
    state.record(reading.measurement, reading.value);
    Ok(reading)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
