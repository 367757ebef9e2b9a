//! `r48-can-bridge` library: the CAN command/response layer used to drive a
//! Vertiv/Emerson R48 rectifier from a networked control surface, in a
//! `no_std` environment. The crate exposes the wire codec, the frame
//! builder/parser, the polling and command-gating state machines, and the
//! request glue the network layer calls into.
#![no_std]
//==================================================================================
/// Domain vocabulary: measurements, opcodes, write commands.
pub mod core;
/// Bridge-wide tuning knobs (identifiers, delays, overlap policy).
pub mod config;
/// Domain and low-level errors (validation, frame rejection, transport).
pub mod error;
/// Byte-level codecs used on the wire.
pub mod infra;
/// Protocol implementation: CAN transport, frame layouts, control loop,
/// and the network-facing endpoints.
pub mod protocol;
//==================================================================================
