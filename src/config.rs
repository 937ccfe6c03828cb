//! Configuration primitives for the AS7265X driver.

use crate::params::{BulbCurrent, Gain, IndicatorCurrent, MeasurementMode};
use crate::protocol::DEFAULT_INTEGRATION_CYCLES;

/// User-facing configuration for the AS7265X sensor.
///
/// Applied in full by [`As7265x::init`](crate::device::As7265x::init) and kept
/// in sync by the individual setters afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Analog gain applied on every die.
    pub gain: Gain,
    /// Measurement mode programmed at initialization.
    pub measurement_mode: MeasurementMode,
    /// Integration cycle count (one cycle is 2.8 ms).
    pub integration_cycles: u8,
    /// Whether the interrupt pin is driven on data ready.
    pub interrupt_enable: bool,
    /// Drive current for the indicator LED on the NIR die.
    pub indicator_current: IndicatorCurrent,
    /// Drive current for the white bulb (NIR die).
    pub white_bulb_current: BulbCurrent,
    /// Drive current for the IR bulb (visible die).
    pub ir_bulb_current: BulbCurrent,
    /// Drive current for the UV bulb (UV die).
    pub uv_bulb_current: BulbCurrent,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the analog gain.
    pub fn gain(mut self, gain: Gain) -> Self {
        self.config.gain = gain;
        self
    }

    /// Overrides the measurement mode.
    pub fn measurement_mode(mut self, mode: MeasurementMode) -> Self {
        self.config.measurement_mode = mode;
        self
    }

    /// Sets the integration cycle count.
    pub fn integration_cycles(mut self, cycles: u8) -> Self {
        self.config.integration_cycles = cycles;
        self
    }

    /// Enables or disables the interrupt pin.
    pub fn interrupt_enable(mut self, enable: bool) -> Self {
        self.config.interrupt_enable = enable;
        self
    }

    /// Sets the indicator LED current.
    pub fn indicator_current(mut self, current: IndicatorCurrent) -> Self {
        self.config.indicator_current = current;
        self
    }

    /// Sets the white bulb drive current.
    pub fn white_bulb_current(mut self, current: BulbCurrent) -> Self {
        self.config.white_bulb_current = current;
        self
    }

    /// Sets the IR bulb drive current.
    pub fn ir_bulb_current(mut self, current: BulbCurrent) -> Self {
        self.config.ir_bulb_current = current;
        self
    }

    /// Sets the UV bulb drive current.
    pub fn uv_bulb_current(mut self, current: BulbCurrent) -> Self {
        self.config.uv_bulb_current = current;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gain: Gain::X64,
            measurement_mode: MeasurementMode::Continuous4Channel,
            integration_cycles: DEFAULT_INTEGRATION_CYCLES,
            interrupt_enable: true,
            indicator_current: IndicatorCurrent::Ma8,
            white_bulb_current: BulbCurrent::Ma12_5,
            ir_bulb_current: BulbCurrent::Ma12_5,
            uv_bulb_current: BulbCurrent::Ma12_5,
        }
    }
}
