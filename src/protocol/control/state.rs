//! Last known good readings of the rectifier.
use crate::core::Measurement;

/// Value copy of the five readings, as served to the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readings {
    pub output_voltage: f32,
    pub output_current: f32,
    /// Fraction of the rated current.
    pub output_current_limit: f32,
    pub temperature: f32,
    pub supply_voltage: f32,
}

/// Mutable measurement store. Every field starts at `0.0` and is only ever
/// overwritten by a decoded answer; nothing is ever cleared.
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    readings: Readings,
}

impl DeviceState {
    pub const fn new() -> Self {
        Self {
            readings: Readings {
                output_voltage: 0.0,
                output_current: 0.0,
                output_current_limit: 0.0,
                temperature: 0.0,
                supply_voltage: 0.0,
            },
        }
    }

    /// Overwrite one reading.
    pub fn record(&mut self, measurement: Measurement, value: f32) {
        *self.slot_mut(measurement) = value;
    }

    /// Current value of one reading.
    pub fn get(&self, measurement: Measurement) -> f32 {
        match measurement {
            Measurement::OutputVoltage => self.readings.output_voltage,
            Measurement::OutputCurrent => self.readings.output_current,
            Measurement::OutputCurrentLimit => self.readings.output_current_limit,
            Measurement::Temperature => self.readings.temperature,
            Measurement::SupplyVoltage => self.readings.supply_voltage,
        }
    }

    pub fn snapshot(&self) -> Readings {
        self.readings
    }

    fn slot_mut(&mut self, measurement: Measurement) -> &mut f32 {
        match measurement {
            Measurement::OutputVoltage => &mut self.readings.output_voltage,
            Measurement::OutputCurrent => &mut self.readings.output_current,
            Measurement::OutputCurrentLimit => &mut self.readings.output_current_limit,
            Measurement::Temperature => &mut self.readings.temperature,
            Measurement::SupplyVoltage => &mut self.readings.supply_voltage,
        }
    }
}
