//! Eight-byte payload layouts of the rectifier protocol.
//!
//! ```text
//! byte   0        1     2     3          4..8
//! read   0x01     0xF0  0x00  meas code  00 00 00 00
//! write  0x03     0xF0  0x00  opcode     f32 (MSB first) | flag 00 00 00
//! answer 0x41     0xF0  0x00  meas code  f32 (MSB first)
//! ```
pub mod builder;
pub mod parser;

/// Leading bytes of a read request.
pub const READ_PREFIX: [u8; 3] = [0x01, 0xF0, 0x00];
/// Leading bytes of a write command.
pub const WRITE_PREFIX: [u8; 3] = [0x03, 0xF0, 0x00];
/// Leading bytes of a rectifier answer.
pub const RESPONSE_PREFIX: [u8; 3] = [0x41, 0xF0, 0x00];
