//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (argument validation,
//! frame rejection, bus transmission, bring-up).
use crate::core::CommandOpcode;
use thiserror_no_std::Error;

//==================================================================================VALIDATION_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A write request was refused before any bus traffic was generated.
pub enum ValidationError {
    /// The argument lies outside the opcode's domain.
    #[error("Invalid value for {}", .0.name())]
    InvalidValue(CommandOpcode),
    /// The request carried no argument at all.
    #[error("Missing parameter for {}", .0.name())]
    MissingParameter(CommandOpcode),
}

impl ValidationError {
    /// Opcode the rejected request targeted.
    pub fn opcode(&self) -> CommandOpcode {
        match self {
            ValidationError::InvalidValue(op) | ValidationError::MissingParameter(op) => *op,
        }
    }

    /// Operator-facing rejection text.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::InvalidValue(op) => match op {
                CommandOpcode::PermanentVoltage | CommandOpcode::OnlineVoltage => {
                    "Invalid voltage value."
                }
                CommandOpcode::PermanentCurrentLimit | CommandOpcode::OnlineCurrentLimit => {
                    "Invalid current percentage."
                }
                CommandOpcode::MaxInputCurrent => {
                    "Invalid current, valid values between 3 and 13."
                }
                CommandOpcode::FanSpeed => "Invalid fan speed command.",
                CommandOpcode::WalkIn => "Invalid walk-in state command.",
                CommandOpcode::WalkInTime => "Invalid walk-in time value.",
            },
            ValidationError::MissingParameter(op) => match op {
                CommandOpcode::FanSpeed => "Missing fan speed parameter.",
                CommandOpcode::WalkIn => "Missing walk-in state parameter.",
                _ => "Missing value parameter.",
            },
        }
    }
}

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reasons an inbound frame was dropped by the parser. Never escalated.
pub enum FrameError {
    /// Identifier is not the rectifier response identifier.
    #[error("Unexpected identifier {id:#010x}")]
    UnexpectedId { id: u32 },
    /// Payload is not exactly eight bytes.
    #[error("Invalid data length {len}")]
    InvalidDataLen { len: usize },
    /// Bytes 0..3 are not the response prefix.
    #[error("Unexpected payload prefix")]
    UnexpectedPrefix,
    /// Well-formed response carrying a code this bridge does not track.
    #[error("Unknown measurement code {code:#04x}")]
    UnknownMeasurement { code: u8, value: f32 },
}

//==================================================================================COMMAND_ERROR
#[derive(Error, Debug, PartialEq)]
/// Errors returned by the command gate when submitting a write request.
pub enum CommandError<E: core::fmt::Debug> {
    /// Argument refused; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A settling window is running and the overlap policy rejects new writes.
    #[error("Command pending, {remaining_secs} s remaining")]
    Settling { remaining_secs: u32 },
    /// CAN controller refused the frame; the settling window was not armed.
    #[error("CAN bus send error: {0:?}")]
    Transport(E),
}

impl<E: core::fmt::Debug> CommandError<E> {
    /// Drop the transport error payload so the error can cross a typed channel.
    pub fn erase(self) -> CommandError<()> {
        match self {
            CommandError::Validation(err) => CommandError::Validation(err),
            CommandError::Settling { remaining_secs } => CommandError::Settling { remaining_secs },
            CommandError::Transport(_) => CommandError::Transport(()),
        }
    }
}

//==================================================================================INIT_ERROR
#[derive(Error, Debug)]
/// CAN controller bring-up failure. Fatal: the application restarts the device.
pub enum InitError<E: core::fmt::Debug> {
    /// Every start attempt failed; `last` is the final controller error.
    #[error("CAN controller failed to start after {attempts} attempts: {last:?}")]
    RetriesExhausted { attempts: u8, last: E },
}

//==================================================================================RUN_ERROR
#[derive(Error, Debug)]
/// Conditions that stop the bridge runner.
pub enum BridgeRunError<E: core::fmt::Debug> {
    /// The bus could not be read and the controller did not come back up.
    #[error("CAN controller restart failed: {0}")]
    Restart(#[from] InitError<E>),
}
