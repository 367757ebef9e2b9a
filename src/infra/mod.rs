//! Infrastructure shared by the protocol layer: byte-level codecs.
pub mod codec;
