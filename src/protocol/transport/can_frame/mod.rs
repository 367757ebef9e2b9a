//! In-memory representation of a rectifier CAN frame.
use crate::protocol::transport::can_id::CanId;
use embedded_can::{Frame, Id};

/// Payload length of every frame the rectifier sends or accepts.
pub const FRAME_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Extended-format data frame as exchanged with the bus driver.
pub struct CanFrame {
    /// 29-bit identifier.
    pub id: CanId,
    /// Payload buffer; bytes past `len` are zero.
    pub data: [u8; FRAME_LEN],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Full eight-byte frame, the only shape the bridge transmits.
    pub const fn new(id: CanId, data: [u8; FRAME_LEN]) -> Self {
        Self {
            id,
            data,
            len: FRAME_LEN,
        }
    }

    /// Valid payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(FRAME_LEN)]
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let id = CanId::try_from(id.into()).ok()?;
        if data.len() > FRAME_LEN {
            return None;
        }
        let mut payload = [0u8; FRAME_LEN];
        payload[..data.len()].copy_from_slice(data);
        Some(Self {
            id,
            data: payload,
            len: data.len(),
        })
    }

    /// Remote frames are not part of the protocol.
    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        true
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        self.id.into()
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}
