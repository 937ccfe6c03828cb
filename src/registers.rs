//! Register map definitions for the AS7265X spectral sensor.
//!
//! The device exposes only three physical registers at its I2C address; the
//! rest of the register map is virtual and reached through the mailbox
//! handshake implemented in [`crate::protocol`].
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{Gain, IndicatorCurrent, BulbCurrent, MeasurementMode};

/// Fixed 7-bit I2C address of the sensor.
pub const I2C_ADDRESS: u8 = 0x49;

/// Physical register address of `STATUS`.
pub const REG_STATUS: u8 = 0x00;
/// Physical register address of the outbound `WRITE` mailbox.
pub const REG_WRITE: u8 = 0x01;
/// Physical register address of the inbound `READ` mailbox.
pub const REG_READ: u8 = 0x02;

/// Bit 7 flag marking a mailbox byte as a virtual-register write request.
pub const VIRTUAL_WRITE_FLAG: u8 = 0x80;

/// Virtual register address of the hardware version high byte (device type).
pub const VREG_HW_VERSION_HIGH: u8 = 0x00;
/// Virtual register address of the hardware version low byte.
pub const VREG_HW_VERSION_LOW: u8 = 0x01;
/// Virtual register address of the firmware version sub-index selector.
pub const VREG_FW_VERSION_HIGH: u8 = 0x02;
/// Virtual register address of the firmware version data byte.
pub const VREG_FW_VERSION_LOW: u8 = 0x03;
/// Virtual register address of `CONFIG`.
pub const VREG_CONFIG: u8 = 0x04;
/// Virtual register address of the integration cycle count.
pub const VREG_INTEGRATION_TIME: u8 = 0x05;
/// Virtual register address of the die temperature (degrees Celsius).
pub const VREG_TEMPERATURE: u8 = 0x06;
/// Virtual register address of `LED_CONFIG`.
pub const VREG_LED_CONFIG: u8 = 0x07;
/// First virtual register of the six raw channel pairs (high byte first).
pub const VREG_RAW_DATA_BASE: u8 = 0x08;
/// First virtual register of the six calibrated channel quads (big-endian).
pub const VREG_CAL_DATA_BASE: u8 = 0x14;
/// Virtual register selecting the active die. Global, not die-scoped.
pub const VREG_DEVICE_SELECT: u8 = 0x4F;

/// Device type byte reported by `VREG_HW_VERSION_HIGH` for the AS7265X.
pub const EXPECTED_DEVICE_TYPE: u8 = 0x40;

/// Firmware version sub-index for the major version digit.
pub const FW_VERSION_MAJOR: u8 = 0x01;
/// Firmware version sub-index for the patch version digit.
pub const FW_VERSION_PATCH: u8 = 0x02;
/// Firmware version sub-index for the build version digit.
pub const FW_VERSION_BUILD: u8 = 0x03;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Register address, physical or virtual depending on the type.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
}

/// Bitfield representation of the physical `STATUS` register (address `0x00`).
///
/// At most one byte may be in flight in each mailbox: the client must never
/// write to `WRITE` while `TX_VALID` is set, and must only read `READ` after
/// observing `RX_VALID` set on a fresh status read.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // A byte is waiting in the READ mailbox (bit 0).
    pub rx_valid: bool,
    // A previously written byte has not been consumed yet (bit 1).
    pub tx_valid: bool,
    #[skip]
    __: B6,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CONFIG` virtual register (address `0x04`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    #[skip]
    __: B1,
    // Data ready flag, set by the device when a measurement completes (bit 1).
    pub data_ready: bool,
    // Measurement mode selection (bits 3:2).
    pub mode: MeasurementMode,
    // Analog gain selection (bits 5:4).
    pub gain: Gain,
    // Interrupt pin enable (bit 6).
    pub interrupt_enable: bool,
    // Soft reset, self-clearing (bit 7).
    pub soft_reset: bool,
}

impl From<u8> for DeviceConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<DeviceConfig> for u8 {
    fn from(value: DeviceConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `LED_CONFIG` virtual register (address `0x07`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedConfig {
    // Indicator LED enable, NIR die only (bit 0).
    pub indicator_enable: bool,
    // Indicator LED current (bits 2:1).
    pub indicator_current: IndicatorCurrent,
    // Illumination bulb enable (bit 3).
    pub bulb_enable: bool,
    // Illumination bulb current (bits 5:4).
    pub bulb_current: BulbCurrent,
    #[skip]
    __: B2,
}

impl From<u8> for LedConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<LedConfig> for u8 {
    fn from(value: LedConfig) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for Status {
    const ADDRESS: u8 = REG_STATUS;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
}

impl Register for DeviceConfig {
    const ADDRESS: u8 = VREG_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}

impl Register for LedConfig {
    const ADDRESS: u8 = VREG_LED_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}
