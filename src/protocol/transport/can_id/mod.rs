//! 29-bit extended CAN identifiers used by the rectifier protocol.
//!
//! The R48 family talks on three fixed identifiers: one for write commands,
//! one for read requests, and one for the answers it sends back.
use embedded_can::{ExtendedId, Id};

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Extended CAN identifier (29 significant bits stored inside a `u32`).
pub struct CanId(u32);

impl CanId {
    /// Mask of the bits an extended identifier may use.
    pub const MASK: u32 = 0x1FFF_FFFF;

    /// Destination of every write command.
    pub const COMMAND: CanId = CanId(0x0608_0783);
    /// Destination of every read request.
    pub const READ_REQUEST: CanId = CanId(0x0600_0783);
    /// Identifier the rectifier answers read requests on.
    ///
    /// Some MCP2515 drivers report it as `0x860F_8003`: bit 31 is their
    /// extended-frame flag and is dropped by [`CanId::from_raw`].
    pub const RESPONSE: CanId = CanId(0x060F_8003);

    /// Build an identifier; `None` if `raw` does not fit in 29 bits.
    pub const fn new(raw: u32) -> Option<Self> {
        if raw & !Self::MASK == 0 {
            Some(CanId(raw))
        } else {
            None
        }
    }

    /// Build an identifier from a driver-reported value, discarding flag bits
    /// above bit 28.
    pub const fn from_raw(raw: u32) -> Self {
        CanId(raw & Self::MASK)
    }

    /// Raw 29-bit value.
    pub const fn as_raw(&self) -> u32 {
        self.0
    }

    /// `embedded-can` view of the identifier.
    pub fn to_extended(&self) -> ExtendedId {
        // Masked at construction, always within range.
        ExtendedId::new(self.0).unwrap_or(ExtendedId::ZERO)
    }
}

impl From<ExtendedId> for CanId {
    fn from(id: ExtendedId) -> Self {
        CanId(id.as_raw())
    }
}

impl From<CanId> for Id {
    fn from(id: CanId) -> Self {
        Id::Extended(id.to_extended())
    }
}

impl TryFrom<Id> for CanId {
    type Error = Id;

    /// Standard (11-bit) identifiers are never used by the rectifier.
    fn try_from(id: Id) -> Result<Self, Self::Error> {
        match id {
            Id::Extended(ext) => Ok(ext.into()),
            other => Err(other),
        }
    }
}
