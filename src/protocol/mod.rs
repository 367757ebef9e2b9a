//! Rectifier protocol: CAN transport, frame layouts, the control loop
//! (polling, command gating, settling), and the network-facing endpoints.
pub mod control;
pub mod frames;
pub mod transport;
pub mod web;
