//! Rectifier transport layer: CAN frame representation, 29-bit identifiers,
//! and the bus/timer/clock abstraction traits.
//!
//! Only classic CAN data frames in extended format with an eight-byte
//! payload are exchanged. Bus arbitration and retransmission are left to
//! the controller.

pub mod can_frame;
pub mod can_id;
pub mod traits;
