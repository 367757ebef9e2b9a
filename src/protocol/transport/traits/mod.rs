//! Abstraction traits used by the transport layer (CAN bus, timer, clock).
pub mod bridge_timer;
pub mod can_bus;
pub mod clock;
