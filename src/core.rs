//! Vocabulary shared by the frame builder, the parser and the control loop.
//!
//! Every value here maps one-to-one onto a byte of the rectifier protocol:
//! measurements are identified by their read code, writable settings by
//! their command opcode.

//==================================================================================MEASUREMENT
/// One of the five readings polled from the rectifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Measurement {
    /// DC output voltage (V).
    OutputVoltage = 0x01,
    /// DC output current (A).
    OutputCurrent = 0x02,
    /// Output current limit, as a fraction of the rated current.
    OutputCurrentLimit = 0x03,
    /// Internal temperature (°C).
    Temperature = 0x04,
    /// AC supply voltage (V).
    SupplyVoltage = 0x05,
}

impl Measurement {
    /// All measurements in polling order.
    pub const ALL: [Measurement; 5] = [
        Measurement::OutputVoltage,
        Measurement::OutputCurrent,
        Measurement::OutputCurrentLimit,
        Measurement::Temperature,
        Measurement::SupplyVoltage,
    ];

    /// Wire code placed in byte 3 of read requests and responses.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Resolve a wire code; `None` for codes this bridge does not track.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Measurement::OutputVoltage),
            0x02 => Some(Measurement::OutputCurrent),
            0x03 => Some(Measurement::OutputCurrentLimit),
            0x04 => Some(Measurement::Temperature),
            0x05 => Some(Measurement::SupplyVoltage),
            _ => None,
        }
    }
}

//==================================================================================COMMAND_OPCODE
/// Writable settings of the rectifier, with their opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandOpcode {
    /// Output voltage stored in non-volatile memory.
    PermanentVoltage = 0x24,
    /// Output voltage applied immediately, lost on restart.
    OnlineVoltage = 0x21,
    /// Current limit stored in non-volatile memory.
    PermanentCurrentLimit = 0x19,
    /// Current limit applied immediately.
    OnlineCurrentLimit = 0x22,
    /// AC input current ceiling (the "diesel" power limit).
    MaxInputCurrent = 0x1A,
    /// Fan mode, auto or full speed.
    FanSpeed = 0x33,
    /// Soft-start (walk-in) enable.
    WalkIn = 0x32,
    /// Soft-start ramp time in seconds.
    WalkInTime = 0x29,
}

impl CommandOpcode {
    /// Opcode byte placed in byte 3 of command frames.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether the rectifier needs the settling window after this command.
    ///
    /// Only the two "online" setters are applied without one.
    pub const fn settles(self) -> bool {
        !matches!(
            self,
            CommandOpcode::OnlineVoltage | CommandOpcode::OnlineCurrentLimit
        )
    }

    /// Whether the argument travels as a flag byte instead of a float.
    pub const fn takes_flag(self) -> bool {
        matches!(self, CommandOpcode::FanSpeed | CommandOpcode::WalkIn)
    }

    /// Endpoint-style name used in acknowledgements.
    pub const fn name(self) -> &'static str {
        match self {
            CommandOpcode::PermanentVoltage => "set_perm_v",
            CommandOpcode::OnlineVoltage => "set_online_v",
            CommandOpcode::PermanentCurrentLimit => "set_perm_c",
            CommandOpcode::OnlineCurrentLimit => "set_online_c",
            CommandOpcode::MaxInputCurrent => "set_diesel_input_c",
            CommandOpcode::FanSpeed => "set_fan_speed",
            CommandOpcode::WalkIn => "set_walk_in",
            CommandOpcode::WalkInTime => "set_walk_in_time",
        }
    }
}

//==================================================================================ARGUMENTS
/// Fan operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FanSpeed {
    /// Temperature-controlled speed.
    Auto,
    /// Fan forced to full speed.
    Full,
}

impl FanSpeed {
    /// Form keyword (`auto` / `full`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "auto" => Some(FanSpeed::Auto),
            "full" => Some(FanSpeed::Full),
            _ => None,
        }
    }
}

/// Argument carried by a write command.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Argument {
    /// Engineering value, encoded as an IEEE-754 float on the wire.
    Value(f32),
    /// On/off style setting, encoded as `0x01`/`0x00`.
    Flag(bool),
}

//==================================================================================WRITE_COMMAND
/// A write request as received from the control surface.
///
/// Construction does not validate; [`WriteCommand::validate`] checks the
/// argument against the opcode's domain before anything reaches the bus.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteCommand {
    pub opcode: CommandOpcode,
    pub argument: Argument,
}

impl WriteCommand {
    pub const fn new(opcode: CommandOpcode, argument: Argument) -> Self {
        Self { opcode, argument }
    }

    pub const fn permanent_voltage(volts: f32) -> Self {
        Self::new(CommandOpcode::PermanentVoltage, Argument::Value(volts))
    }

    pub const fn online_voltage(volts: f32) -> Self {
        Self::new(CommandOpcode::OnlineVoltage, Argument::Value(volts))
    }

    /// `fraction` of the rated current, `0.1` to `1.21`.
    pub const fn permanent_current_limit(fraction: f32) -> Self {
        Self::new(CommandOpcode::PermanentCurrentLimit, Argument::Value(fraction))
    }

    /// `fraction` of the rated current, `0.1` to `1.21`.
    pub const fn online_current_limit(fraction: f32) -> Self {
        Self::new(CommandOpcode::OnlineCurrentLimit, Argument::Value(fraction))
    }

    pub const fn max_input_current(amps: f32) -> Self {
        Self::new(CommandOpcode::MaxInputCurrent, Argument::Value(amps))
    }

    pub const fn fan_speed(speed: FanSpeed) -> Self {
        Self::new(
            CommandOpcode::FanSpeed,
            Argument::Flag(matches!(speed, FanSpeed::Full)),
        )
    }

    pub const fn walk_in(enabled: bool) -> Self {
        Self::new(CommandOpcode::WalkIn, Argument::Flag(enabled))
    }

    pub const fn walk_in_time(seconds: f32) -> Self {
        Self::new(CommandOpcode::WalkInTime, Argument::Value(seconds))
    }

    /// Check the argument against the opcode's accepted domain.
    ///
    /// | Opcode | Domain |
    /// |---|---|
    /// | permanent / online voltage | `> 0` |
    /// | permanent / online current limit | `[0.1, 1.21]` |
    /// | max input current | `[3, 13]` |
    /// | fan speed, walk-in | flag |
    /// | walk-in time | `>= 0` |
    ///
    /// Non-finite values are always rejected: the rectifier never receives NaN or ±∞.
    pub fn validate(&self) -> Result<(), crate::error::ValidationError> {
        let valid = match (self.opcode.takes_flag(), self.argument) {
            (true, Argument::Flag(_)) => true,
            (false, Argument::Value(v)) if v.is_finite() => match self.opcode {
                CommandOpcode::PermanentVoltage | CommandOpcode::OnlineVoltage => v > 0.0,
                CommandOpcode::PermanentCurrentLimit | CommandOpcode::OnlineCurrentLimit => {
                    (0.1..=1.21).contains(&v)
                }
                CommandOpcode::MaxInputCurrent => (3.0..=13.0).contains(&v),
                CommandOpcode::WalkInTime => v >= 0.0,
                CommandOpcode::FanSpeed | CommandOpcode::WalkIn => false,
            },
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(crate::error::ValidationError::InvalidValue(self.opcode))
        }
    }
}
