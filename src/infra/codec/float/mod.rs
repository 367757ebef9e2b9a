//! IEEE-754 single-precision values as they travel in bytes 4..8 of a frame.
//!
//! The rectifier puts the most-significant byte first (big-endian), which is
//! the reverse of the in-memory layout on the little-endian MCUs this bridge
//! targets. Both functions operate on the bit pattern, so every finite value,
//! subnormals and signed zeros included, survives a round trip unchanged.
//!
//! NaN payloads are not guaranteed to be preserved; the protocol never
//! carries NaN or infinities and the command gate refuses them upstream.

/// Number of bytes a float occupies on the wire.
pub const FLOAT_WIRE_LEN: usize = 4;

/// Encode `value` most-significant byte first.
#[inline]
pub fn encode(value: f32) -> [u8; FLOAT_WIRE_LEN] {
    value.to_bits().to_be_bytes()
}

/// Decode four wire bytes (most-significant first) back into a float.
#[inline]
pub fn decode(bytes: [u8; FLOAT_WIRE_LEN]) -> f32 {
    f32::from_bits(u32::from_be_bytes(bytes))
}

/// Decode the float stored at `bytes[offset..offset + 4]`.
///
/// Returns `None` when the slice is too short.
pub fn decode_at(bytes: &[u8], offset: usize) -> Option<f32> {
    let end = offset.checked_add(FLOAT_WIRE_LEN)?;
    let raw: [u8; FLOAT_WIRE_LEN] = bytes.get(offset..end)?.try_into().ok()?;
    Some(decode(raw))
}
