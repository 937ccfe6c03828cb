//! High-level AS7265X device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::i2c::I2cInterface;
use crate::interface::As7265xInterface;
use crate::params::{Bulb, BulbCurrent, Channel, Gain, IndicatorCurrent, MeasurementMode, SubDevice};
use crate::protocol::{TimeoutBudget, VirtualBus};
use crate::registers::{
    DeviceConfig,
    LedConfig,
    Register,
    EXPECTED_DEVICE_TYPE,
    FW_VERSION_BUILD,
    FW_VERSION_MAJOR,
    FW_VERSION_PATCH,
    VREG_FW_VERSION_HIGH,
    VREG_FW_VERSION_LOW,
    VREG_HW_VERSION_HIGH,
    VREG_HW_VERSION_LOW,
    VREG_INTEGRATION_TIME,
    VREG_TEMPERATURE,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// High-level synchronous driver for the AS7265X triad spectral sensor.
///
/// One instance is one protocol session: the sticky die selection and the
/// timeout budget live here rather than in process-wide state, so independent
/// sessions (for example in tests) cannot interfere with each other.
pub struct As7265x<IFACE, D> {
    bus: VirtualBus<IFACE, D>,
    config: Config,
}

/// Firmware version digits reported by the master die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareVersion {
    /// Major version digit.
    pub major: u8,
    /// Patch version digit.
    pub patch: u8,
    /// Build version digit.
    pub build: u8,
}

impl<IFACE, D> As7265x<IFACE, D> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE, delay: D, config: Config) -> Self {
        Self {
            bus: VirtualBus::new(interface, delay),
            config,
        }
    }

    /// Consumes the driver and returns the owned interface and delay source.
    pub fn release(self) -> (IFACE, D, Config) {
        let (interface, delay) = self.bus.release();
        (interface, delay, self.config)
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<I2C, D> As7265x<I2cInterface<I2C>, D>
where
    I2C: I2c,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I2C transports.
    pub fn new_i2c(i2c: I2C, delay: D, config: Config) -> Self {
        Self::new(I2cInterface::new(i2c), delay, config)
    }

    /// Releases the driver, returning the I2C bus and delay source.
    pub fn release_i2c(self) -> (I2C, D, Config) {
        let (iface, delay, config) = self.release();
        (iface.release(), delay, config)
    }
}

impl<IFACE, D, CommE> As7265x<IFACE, D>
where
    IFACE: As7265xInterface<Error = CommE>,
    D: DelayNs,
{
    // ==================================================================
    // == Initialization & Identification ===============================
    // ==================================================================
    /// Initializes the sensor using the current configuration.
    ///
    /// Verifies the device type byte, parks every light source off, and
    /// programs integration time, gain, measurement mode and interrupt
    /// behaviour from the configuration.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.refresh_budget();

        self.bus.select_device(SubDevice::Nir)?;
        let device_type = self.bus.read_virtual_register(VREG_HW_VERSION_HIGH)?;
        if device_type != EXPECTED_DEVICE_TYPE {
            return Err(Error::DeviceIdMismatch);
        }

        let config = self.config;
        self.set_bulb_current(Bulb::White, config.white_bulb_current)?;
        self.set_bulb_current(Bulb::Ir, config.ir_bulb_current)?;
        self.set_bulb_current(Bulb::Uv, config.uv_bulb_current)?;
        self.disable_bulb(Bulb::White)?;
        self.disable_bulb(Bulb::Ir)?;
        self.disable_bulb(Bulb::Uv)?;

        self.set_indicator_current(config.indicator_current)?;
        self.disable_indicator()?;

        self.set_integration_cycles(config.integration_cycles)?;
        self.set_gain(config.gain)?;
        self.set_measurement_mode(config.measurement_mode)?;

        if config.interrupt_enable {
            self.enable_interrupt()?;
        } else {
            self.disable_interrupt()?;
        }

        Ok(())
    }

    /// Reads the device type byte (0x40 for the AS7265X family).
    pub fn device_type(&mut self) -> Result<u8, CommE> {
        self.bus.select_device(SubDevice::Nir)?;
        self.bus.read_virtual_register(VREG_HW_VERSION_HIGH)
    }

    /// Reads the hardware version byte.
    pub fn hardware_version(&mut self) -> Result<u8, CommE> {
        self.bus.select_device(SubDevice::Nir)?;
        self.bus.read_virtual_register(VREG_HW_VERSION_LOW)
    }

    /// Reads the master firmware version digits.
    ///
    /// Each digit is addressed by writing its sub-index to both firmware
    /// version registers before reading the data byte back.
    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, CommE> {
        self.bus.select_device(SubDevice::Nir)?;
        Ok(FirmwareVersion {
            major: self.firmware_digit(FW_VERSION_MAJOR)?,
            patch: self.firmware_digit(FW_VERSION_PATCH)?,
            build: self.firmware_digit(FW_VERSION_BUILD)?,
        })
    }

    fn firmware_digit(&mut self, sub_index: u8) -> Result<u8, CommE> {
        self.bus.write_virtual_register(VREG_FW_VERSION_HIGH, sub_index)?;
        self.bus.write_virtual_register(VREG_FW_VERSION_LOW, sub_index)?;
        self.bus.read_virtual_register(VREG_FW_VERSION_LOW)
    }

    // ==================================================================
    // == Virtual Register Access =======================================
    // ==================================================================
    /// Selects the die addressed by subsequent virtual register accesses.
    pub fn select_device(&mut self, device: SubDevice) -> Result<(), CommE> {
        self.bus.select_device(device)
    }

    /// Reads a virtual register on the currently selected die.
    pub fn read_virtual_register(&mut self, register: u8) -> Result<u8, CommE> {
        self.bus.read_virtual_register(register)
    }

    /// Writes a virtual register on the currently selected die.
    pub fn write_virtual_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        self.bus.write_virtual_register(register, value)
    }

    // ==================================================================
    // == Measurement Configuration =====================================
    // ==================================================================
    /// Sets the integration cycle count and recomputes the timeout budget.
    pub fn set_integration_cycles(&mut self, cycles: u8) -> Result<(), CommE> {
        self.bus
            .write_virtual_register(VREG_INTEGRATION_TIME, cycles)?;
        self.config.integration_cycles = cycles;
        self.refresh_budget();
        Ok(())
    }

    /// Sets the analog gain applied on every die.
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), CommE> {
        self.update_device_config(|config| config.set_gain(gain))?;
        self.config.gain = gain;
        Ok(())
    }

    /// Sets the measurement mode and recomputes the timeout budget.
    pub fn set_measurement_mode(&mut self, mode: MeasurementMode) -> Result<(), CommE> {
        self.update_device_config(|config| config.set_mode(mode))?;
        self.config.measurement_mode = mode;
        self.refresh_budget();
        Ok(())
    }

    /// Drives the interrupt pin when a measurement completes.
    pub fn enable_interrupt(&mut self) -> Result<(), CommE> {
        self.update_device_config(|config| config.set_interrupt_enable(true))?;
        self.config.interrupt_enable = true;
        Ok(())
    }

    /// Stops driving the interrupt pin.
    pub fn disable_interrupt(&mut self) -> Result<(), CommE> {
        self.update_device_config(|config| config.set_interrupt_enable(false))?;
        self.config.interrupt_enable = false;
        Ok(())
    }

    /// Requests a device soft reset.
    ///
    /// The reset bit is self-clearing; the device drops off the bus for a
    /// moment afterwards and must be re-initialized by the caller.
    pub fn soft_reset(&mut self) -> Result<(), CommE> {
        self.update_device_config(|config| config.set_soft_reset(true))?;
        Ok(())
    }

    // ==================================================================
    // == Light Source Control ==========================================
    // ==================================================================
    /// Enables the indicator LED on the NIR die.
    pub fn enable_indicator(&mut self) -> Result<(), CommE> {
        self.update_led_config(SubDevice::Nir, |led| led.set_indicator_enable(true))
    }

    /// Disables the indicator LED.
    pub fn disable_indicator(&mut self) -> Result<(), CommE> {
        self.update_led_config(SubDevice::Nir, |led| led.set_indicator_enable(false))
    }

    /// Sets the indicator LED drive current.
    pub fn set_indicator_current(&mut self, current: IndicatorCurrent) -> Result<(), CommE> {
        self.update_led_config(SubDevice::Nir, |led| led.set_indicator_current(current))?;
        self.config.indicator_current = current;
        Ok(())
    }

    /// Energizes an illumination bulb.
    pub fn enable_bulb(&mut self, bulb: Bulb) -> Result<(), CommE> {
        self.update_led_config(bulb.sub_device(), |led| led.set_bulb_enable(true))
    }

    /// De-energizes an illumination bulb.
    pub fn disable_bulb(&mut self, bulb: Bulb) -> Result<(), CommE> {
        self.update_led_config(bulb.sub_device(), |led| led.set_bulb_enable(false))
    }

    /// Sets an illumination bulb's drive current.
    pub fn set_bulb_current(&mut self, bulb: Bulb, current: BulbCurrent) -> Result<(), CommE> {
        self.update_led_config(bulb.sub_device(), |led| led.set_bulb_current(current))?;
        match bulb {
            Bulb::White => self.config.white_bulb_current = current,
            Bulb::Ir => self.config.ir_bulb_current = current,
            Bulb::Uv => self.config.uv_bulb_current = current,
        }
        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Triggers a one-shot measurement and blocks until data is ready.
    ///
    /// Switches the device into one-shot 6-channel mode, then polls the
    /// data-ready flag bounded by the shared timeout budget.
    pub fn take_measurements(&mut self) -> Result<(), CommE> {
        self.set_measurement_mode(MeasurementMode::OneShot6Channel)?;
        self.bus.poll_virtual_register(DeviceConfig::ADDRESS, |value| {
            DeviceConfig::from(value).data_ready()
        })
    }

    /// Triggers a measurement with all three bulbs energized.
    ///
    /// The bulbs are de-energized unconditionally afterwards, even when the
    /// measurement times out, so a failure never leaves the light sources on.
    pub fn take_measurements_with_bulbs(&mut self) -> Result<(), CommE> {
        self.enable_bulb(Bulb::White)?;
        self.enable_bulb(Bulb::Ir)?;
        self.enable_bulb(Bulb::Uv)?;

        let measured = self.take_measurements();

        let white = self.disable_bulb(Bulb::White);
        let ir = self.disable_bulb(Bulb::Ir);
        let uv = self.disable_bulb(Bulb::Uv);

        measured?;
        white?;
        ir?;
        uv?;
        Ok(())
    }

    /// Reads a raw 16-bit channel value.
    ///
    /// Selects the channel's die, then reads the high and low bytes of its
    /// register pair. Any failing sub-read aborts the whole call; no partial
    /// value is composed.
    pub fn get_channel(&mut self, channel: Channel) -> Result<u16, CommE> {
        self.bus.select_device(channel.sub_device())?;

        let register = channel.raw_register();
        let high = self.bus.read_virtual_register(register)?;
        let low = self.bus.read_virtual_register(register + 1)?;

        Ok(u16::from_be_bytes([high, low]))
    }

    /// Reads a calibrated channel value.
    ///
    /// The sensor firmware delivers the radiometric value as four big-endian
    /// bytes holding an IEEE-754 binary32 bit pattern. The bytes are
    /// reassembled and bit-cast, never numerically converted. Any failing
    /// sub-read aborts the whole call.
    pub fn get_calibrated_value(&mut self, channel: Channel) -> Result<f32, CommE> {
        self.bus.select_device(channel.sub_device())?;

        let base = channel.calibrated_register();
        let mut bytes = [0u8; 4];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = self.bus.read_virtual_register(base + offset as u8)?;
        }

        Ok(f32::from_bits(u32::from_be_bytes(bytes)))
    }

    /// Reads a die's temperature in degrees Celsius.
    pub fn temperature(&mut self, device: SubDevice) -> Result<u8, CommE> {
        self.bus.select_device(device)?;
        self.bus.read_virtual_register(VREG_TEMPERATURE)
    }

    /// Averages the three die temperatures.
    pub fn temperature_average(&mut self) -> Result<f32, CommE> {
        let nir = self.temperature(SubDevice::Nir)?;
        let visible = self.temperature(SubDevice::Visible)?;
        let uv = self.temperature(SubDevice::Uv)?;

        Ok(f32::from(u16::from(nir) + u16::from(visible) + u16::from(uv)) / 3.0)
    }

    // ==================================================================
    // == Internal Configuration Helpers ================================
    // ==================================================================

    /// Re-derives the shared timeout budget from the current configuration.
    fn refresh_budget(&mut self) {
        self.bus.set_budget(TimeoutBudget::from_settings(
            self.config.integration_cycles,
            self.config.measurement_mode,
        ));
    }

    /// Read-modify-write of the `CONFIG` virtual register.
    ///
    /// Writes back only when the mutation changed the value, sparing a write
    /// handshake for no-op updates.
    fn update_device_config<F>(&mut self, mut mutate: F) -> Result<DeviceConfig, CommE>
    where
        F: FnMut(&mut DeviceConfig),
    {
        let current = self.bus.read_virtual_register(DeviceConfig::ADDRESS)?;

        let mut config = DeviceConfig::from(current);
        mutate(&mut config);

        let updated = u8::from(config);
        if updated != current {
            self.bus
                .write_virtual_register(DeviceConfig::ADDRESS, updated)?;
        }

        Ok(config)
    }

    /// Read-modify-write of a die's `LED_CONFIG` virtual register.
    fn update_led_config<F>(&mut self, device: SubDevice, mut mutate: F) -> Result<(), CommE>
    where
        F: FnMut(&mut LedConfig),
    {
        self.bus.select_device(device)?;

        let current = self.bus.read_virtual_register(LedConfig::ADDRESS)?;

        let mut led = LedConfig::from(current);
        mutate(&mut led);

        let updated = u8::from(led);
        if updated != current {
            self.bus
                .write_virtual_register(LedConfig::ADDRESS, updated)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Error;
    use crate::interface::As7265xInterface;
    use crate::params::{Channel, SubDevice};
    use crate::registers::{
        REG_READ,
        REG_STATUS,
        REG_WRITE,
        VIRTUAL_WRITE_FLAG,
        VREG_CONFIG,
        VREG_DEVICE_SELECT,
        VREG_HW_VERSION_HIGH,
        VREG_LED_CONFIG,
        VREG_TEMPERATURE,
    };

    const IDLE: u8 = 0x00;
    const RX_READY: u8 = 0x01;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct FaultInjected;

    #[derive(Clone, Copy)]
    enum BusExpectation {
        Read { register: u8, value: u8 },
        ReadFault { register: u8 },
        Write { register: u8, value: u8 },
    }

    /// Expectation sequence builder for whole mailbox handshakes.
    struct Script {
        steps: [BusExpectation; 128],
        len: usize,
    }

    impl Script {
        fn new() -> Self {
            Self {
                steps: [BusExpectation::Read { register: 0, value: 0 }; 128],
                len: 0,
            }
        }

        fn push(&mut self, step: BusExpectation) {
            assert!(self.len < self.steps.len(), "script capacity exceeded");
            self.steps[self.len] = step;
            self.len += 1;
        }

        /// One full write handshake with an idle mailbox.
        fn vreg_write(&mut self, register: u8, value: u8) {
            self.push(BusExpectation::Read { register: REG_STATUS, value: IDLE });
            self.push(BusExpectation::Write {
                register: REG_WRITE,
                value: register | VIRTUAL_WRITE_FLAG,
            });
            self.push(BusExpectation::Read { register: REG_STATUS, value: IDLE });
            self.push(BusExpectation::Write { register: REG_WRITE, value });
        }

        /// One full read handshake with an idle mailbox and no stale byte.
        fn vreg_read(&mut self, register: u8, value: u8) {
            self.push(BusExpectation::Read { register: REG_STATUS, value: IDLE });
            self.push(BusExpectation::Read { register: REG_STATUS, value: IDLE });
            self.push(BusExpectation::Write { register: REG_WRITE, value: register });
            self.push(BusExpectation::Read { register: REG_STATUS, value: RX_READY });
            self.push(BusExpectation::Read { register: REG_READ, value });
        }

        /// A read handshake whose final mailbox read fails on the bus.
        fn vreg_read_fault(&mut self, register: u8) {
            self.push(BusExpectation::Read { register: REG_STATUS, value: IDLE });
            self.push(BusExpectation::Read { register: REG_STATUS, value: IDLE });
            self.push(BusExpectation::Write { register: REG_WRITE, value: register });
            self.push(BusExpectation::Read { register: REG_STATUS, value: RX_READY });
            self.push(BusExpectation::ReadFault { register: REG_READ });
        }

        fn select(&mut self, device: SubDevice) {
            self.vreg_write(VREG_DEVICE_SELECT, device.code());
        }

        fn steps(&self) -> &[BusExpectation] {
            &self.steps[..self.len]
        }
    }

    struct MockInterface<'a> {
        expectations: &'a [BusExpectation],
        index: usize,
    }

    impl<'a> MockInterface<'a> {
        fn new(expectations: &'a [BusExpectation]) -> Self {
            Self { expectations, index: 0 }
        }

        fn next(&mut self) -> BusExpectation {
            let expected = *self
                .expectations
                .get(self.index)
                .expect("unexpected bus access");
            self.index += 1;
            expected
        }
    }

    impl<'a> Drop for MockInterface<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all bus expectations consumed"
            );
        }
    }

    impl<'a> As7265xInterface for MockInterface<'a> {
        type Error = FaultInjected;

        fn write_register(
            &mut self,
            register: u8,
            value: u8,
        ) -> core::result::Result<(), FaultInjected> {
            match self.next() {
                BusExpectation::Write {
                    register: expected_register,
                    value: expected_value,
                } => {
                    assert_eq!(register, expected_register, "write register mismatch");
                    assert_eq!(value, expected_value, "write value mismatch");
                    Ok(())
                }
                _ => panic!("expected a read, driver issued a write"),
            }
        }

        fn read_register(&mut self, register: u8) -> core::result::Result<u8, FaultInjected> {
            match self.next() {
                BusExpectation::Read {
                    register: expected_register,
                    value,
                } => {
                    assert_eq!(register, expected_register, "read register mismatch");
                    Ok(value)
                }
                BusExpectation::ReadFault {
                    register: expected_register,
                } => {
                    assert_eq!(register, expected_register, "read register mismatch");
                    Err(FaultInjected)
                }
                _ => panic!("expected a write, driver issued a read"),
            }
        }
    }

    struct NoopDelay;

    impl embedded_hal::delay::DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn device<'a>(
        script: &'a Script,
        config: Config,
    ) -> As7265x<MockInterface<'a>, NoopDelay> {
        As7265x::new(MockInterface::new(script.steps()), NoopDelay, config)
    }

    /// The bit pattern 0x41480000 decodes to 12.5 as IEEE-754 binary32.
    #[test]
    fn calibrated_value_is_bit_cast_big_endian() {
        let mut script = Script::new();
        script.select(SubDevice::Nir);
        let base = Channel::R.calibrated_register();
        script.vreg_read(base, 0x41);
        script.vreg_read(base + 1, 0x48);
        script.vreg_read(base + 2, 0x00);
        script.vreg_read(base + 3, 0x00);

        let mut sensor = device(&script, Config::default());
        let value = sensor.get_calibrated_value(Channel::R).unwrap();
        assert_eq!(value, 12.5);
    }

    /// Raw channel bytes compose big-endian, high byte first.
    #[test]
    fn raw_channel_composes_big_endian() {
        let mut script = Script::new();
        script.select(SubDevice::Nir);
        script.vreg_read(0x0A, 0x03);
        script.vreg_read(0x0B, 0xE8);

        let mut sensor = device(&script, Config::default());
        let value = sensor.get_channel(Channel::S).unwrap();
        assert_eq!(value, 1000);
    }

    /// A transport fault on the second byte read fails the whole call and
    /// yields no partial value.
    ///
    /// Channel S is the NIR die's slot-1 channel; the 0x0A/0x0B register pair
    /// it occupies is the same slot-1 pair every die exposes (H reads it on
    /// the visible die), so the property holds identically for all three.
    #[test]
    fn raw_channel_read_is_all_or_nothing() {
        let mut script = Script::new();
        script.select(SubDevice::Nir);
        script.vreg_read(0x0A, 0x03);
        script.vreg_read_fault(0x0B);

        let mut sensor = device(&script, Config::default());
        let result = sensor.get_channel(Channel::S);
        assert_eq!(result, Err(Error::Interface(FaultInjected)));
    }

    /// A fault on the third of four calibrated bytes aborts the decode.
    #[test]
    fn calibrated_read_is_all_or_nothing() {
        let mut script = Script::new();
        script.select(SubDevice::Uv);
        let base = Channel::A.calibrated_register();
        script.vreg_read(base, 0x41);
        script.vreg_read(base + 1, 0x48);
        script.vreg_read_fault(base + 2);

        let mut sensor = device(&script, Config::default());
        let result = sensor.get_calibrated_value(Channel::A);
        assert_eq!(result, Err(Error::Interface(FaultInjected)));
    }

    /// Selection is overwritten, never merged: the last select wins.
    #[test]
    fn later_selection_overwrites_earlier_one() {
        let mut script = Script::new();
        script.select(SubDevice::Uv);
        script.select(SubDevice::Nir);
        script.vreg_read(VREG_TEMPERATURE, 0x1C);

        let mut sensor = device(&script, Config::default());
        sensor.select_device(SubDevice::Uv).unwrap();
        sensor.select_device(SubDevice::Nir).unwrap();
        assert_eq!(sensor.read_virtual_register(VREG_TEMPERATURE).unwrap(), 0x1C);
    }

    /// Gain updates preserve the untouched CONFIG bits.
    #[test]
    fn set_gain_masks_only_the_gain_field() {
        let mut script = Script::new();
        // Interrupt enabled, one-shot mode, gain 1x.
        script.vreg_read(VREG_CONFIG, 0b0100_1100);
        script.vreg_write(VREG_CONFIG, 0b0110_1100);

        let mut sensor = device(&script, Config::default());
        sensor.set_gain(Gain::X16).unwrap();
        assert_eq!(sensor.config().gain, Gain::X16);
    }

    /// A no-op mutation skips the write handshake entirely.
    #[test]
    fn unchanged_config_is_not_written_back() {
        let mut script = Script::new();
        script.vreg_read(VREG_CONFIG, 0b0111_0000);

        let mut sensor = device(&script, Config::default());
        sensor.set_gain(Gain::X64).unwrap();
    }

    /// Initialization rejects a device reporting the wrong type byte.
    #[test]
    fn init_rejects_unknown_device_type() {
        let mut script = Script::new();
        script.select(SubDevice::Nir);
        script.vreg_read(VREG_HW_VERSION_HIGH, 0x3E);

        let mut sensor = device(&script, Config::default());
        assert_eq!(sensor.init(), Err(Error::DeviceIdMismatch));
    }

    /// Measurement trigger switches to one-shot mode and waits for data.
    #[test]
    fn take_measurements_polls_data_ready() {
        let mut script = Script::new();
        // Mode update: interrupt enabled, continuous 4-channel, gain 64x.
        script.vreg_read(VREG_CONFIG, 0b0111_0000);
        script.vreg_write(VREG_CONFIG, 0b0111_1100);
        // First poll sees no data, second poll observes DATA_RDY.
        script.vreg_read(VREG_CONFIG, 0b0111_1100);
        script.vreg_read(VREG_CONFIG, 0b0111_1110);

        let mut sensor = device(&script, Config::default());
        sensor.take_measurements().unwrap();
        assert_eq!(
            sensor.config().measurement_mode,
            MeasurementMode::OneShot6Channel
        );
    }

    /// Bulbs are de-energized even when the measurement times out.
    #[test]
    fn measurement_timeout_still_turns_bulbs_off() {
        let mut script = Script::new();
        // Energize white, IR and UV bulbs.
        script.select(SubDevice::Nir);
        script.vreg_read(VREG_LED_CONFIG, 0x00);
        script.vreg_write(VREG_LED_CONFIG, 0x08);
        script.select(SubDevice::Visible);
        script.vreg_read(VREG_LED_CONFIG, 0x00);
        script.vreg_write(VREG_LED_CONFIG, 0x08);
        script.select(SubDevice::Uv);
        script.vreg_read(VREG_LED_CONFIG, 0x00);
        script.vreg_write(VREG_LED_CONFIG, 0x08);
        // One-shot mode switch.
        script.vreg_read(VREG_CONFIG, 0b0100_0000);
        script.vreg_write(VREG_CONFIG, 0b0100_1100);
        // One integration cycle in a 6-channel mode budgets 10 ms: three
        // polls at the 5 ms interval before the bound trips.
        for _ in 0..3 {
            script.vreg_read(VREG_CONFIG, 0b0100_1100);
        }
        // The bulbs still get switched off afterwards.
        script.select(SubDevice::Nir);
        script.vreg_read(VREG_LED_CONFIG, 0x08);
        script.vreg_write(VREG_LED_CONFIG, 0x00);
        script.select(SubDevice::Visible);
        script.vreg_read(VREG_LED_CONFIG, 0x08);
        script.vreg_write(VREG_LED_CONFIG, 0x00);
        script.select(SubDevice::Uv);
        script.vreg_read(VREG_LED_CONFIG, 0x08);
        script.vreg_write(VREG_LED_CONFIG, 0x00);

        let config = Config::new().integration_cycles(1).build();
        let mut sensor = device(&script, config);
        let result = sensor.take_measurements_with_bulbs();
        assert_eq!(result, Err(Error::Timeout));
    }

    /// Die temperatures average as a float.
    #[test]
    fn temperature_average_spans_all_dies() {
        let mut script = Script::new();
        script.select(SubDevice::Nir);
        script.vreg_read(VREG_TEMPERATURE, 20);
        script.select(SubDevice::Visible);
        script.vreg_read(VREG_TEMPERATURE, 25);
        script.select(SubDevice::Uv);
        script.vreg_read(VREG_TEMPERATURE, 30);

        let mut sensor = device(&script, Config::default());
        let average = sensor.temperature_average().unwrap();
        assert_eq!(average, 25.0);
    }
}
