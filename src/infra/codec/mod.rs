//! Wire codecs. The rectifier only ever exchanges 32-bit floats, so this is
//! the single value representation the frame layouts rely on.
pub mod float;
