//! Strongly typed parameter enumerations for the AS7265X driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use as7265x::params::{Channel, Gain, MeasurementMode, SubDevice};
//!
//! let channel = Channel::S;
//! let gain = Gain::X64;
//! let mode = MeasurementMode::OneShot6Channel;
//! assert_eq!(channel.sub_device(), SubDevice::Nir);
//! let _ = (gain, mode);
//! ```

use modular_bitfield::prelude::Specifier;

/// One of the three sensor dies sharing the I2C address and physical mailbox.
///
/// Selection is sticky: writing the device-select virtual register scopes
/// every subsequent virtual-register access to that die until changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SubDevice {
    /// AS72651 near-infrared die (channels R..W). Hosts the master firmware.
    Nir = 0,
    /// AS72652 visible die (channels G..L).
    Visible = 1,
    /// AS72653 ultraviolet die (channels A..F).
    Uv = 2,
}

impl SubDevice {
    /// Returns the selection code written to the device-select register.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Measurement mode selections encoded in `CONFIG[3:2]`.
///
/// The 6-channel modes require two physical integration passes per logical
/// reading, which doubles the worst-case wait applied by the timeout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum MeasurementMode {
    /// Continuous 4-channel reading (S, T, U, V slots).
    Continuous4Channel = 0b00,
    /// Continuous 4-channel reading (R, T, U, W slots).
    Continuous4ChannelAlt = 0b01,
    /// Continuous reading of all 6 channels per die.
    Continuous6Channel = 0b10,
    /// Single reading of all 6 channels per die, then idle.
    OneShot6Channel = 0b11,
}

impl MeasurementMode {
    /// Returns `true` for the modes needing two integration passes.
    pub const fn is_six_channel(self) -> bool {
        matches!(self, Self::Continuous6Channel | Self::OneShot6Channel)
    }
}

/// Analog gain selections encoded in `CONFIG[5:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Gain {
    /// 1x gain.
    X1 = 0b00,
    /// 3.7x gain.
    X3_7 = 0b01,
    /// 16x gain.
    X16 = 0b10,
    /// 64x gain.
    X64 = 0b11,
}

/// Indicator LED drive current encoded in `LED_CONFIG[2:1]` (NIR die only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum IndicatorCurrent {
    /// 1 mA.
    Ma1 = 0b00,
    /// 2 mA.
    Ma2 = 0b01,
    /// 4 mA.
    Ma4 = 0b10,
    /// 8 mA.
    Ma8 = 0b11,
}

/// Illumination bulb drive current encoded in `LED_CONFIG[5:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum BulbCurrent {
    /// 12.5 mA.
    Ma12_5 = 0b00,
    /// 25 mA.
    Ma25 = 0b01,
    /// 50 mA.
    Ma50 = 0b10,
    /// 100 mA.
    Ma100 = 0b11,
}

/// The three illumination bulbs, one wired to each die's LED driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bulb {
    /// White bulb, driven by the NIR die.
    White,
    /// Incandescent IR bulb, driven by the visible die.
    Ir,
    /// UV bulb, driven by the UV die.
    Uv,
}

impl Bulb {
    /// Returns the die whose LED driver controls this bulb.
    pub const fn sub_device(self) -> SubDevice {
        match self {
            Self::White => SubDevice::Nir,
            Self::Ir => SubDevice::Visible,
            Self::Uv => SubDevice::Uv,
        }
    }
}

/// Named spectral channels, 6 per die across the three dies.
///
/// Channels A..F live on the UV die, G..L on the visible die and R..W on the
/// NIR die. The same per-die register slots serve all three dies; the die
/// selected at read time decides which channel a slot yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// 410 nm (UV die).
    A,
    /// 435 nm (UV die).
    B,
    /// 460 nm (UV die).
    C,
    /// 485 nm (UV die).
    D,
    /// 510 nm (UV die).
    E,
    /// 535 nm (UV die).
    F,
    /// 560 nm (visible die).
    G,
    /// 585 nm (visible die).
    H,
    /// 645 nm (visible die).
    I,
    /// 705 nm (visible die).
    J,
    /// 900 nm (visible die).
    K,
    /// 940 nm (visible die).
    L,
    /// 610 nm (NIR die).
    R,
    /// 680 nm (NIR die).
    S,
    /// 730 nm (NIR die).
    T,
    /// 760 nm (NIR die).
    U,
    /// 810 nm (NIR die).
    V,
    /// 860 nm (NIR die).
    W,
}

impl Channel {
    /// Returns the die that produces this channel.
    pub const fn sub_device(self) -> SubDevice {
        match self {
            Self::A | Self::B | Self::C | Self::D | Self::E | Self::F => SubDevice::Uv,
            Self::G | Self::H | Self::I | Self::J | Self::K | Self::L => SubDevice::Visible,
            Self::R | Self::S | Self::T | Self::U | Self::V | Self::W => SubDevice::Nir,
        }
    }

    /// Per-die register slot index (0..=5).
    const fn slot(self) -> u8 {
        match self {
            Self::A | Self::G | Self::R => 0,
            Self::B | Self::H | Self::S => 1,
            Self::C | Self::I | Self::T => 2,
            Self::D | Self::J | Self::U => 3,
            Self::E | Self::K | Self::V => 4,
            Self::F | Self::L | Self::W => 5,
        }
    }

    /// Virtual register address of the raw 16-bit reading's high byte.
    pub const fn raw_register(self) -> u8 {
        crate::registers::VREG_RAW_DATA_BASE + self.slot() * 2
    }

    /// Virtual register address of the first calibrated-value byte.
    pub const fn calibrated_register(self) -> u8 {
        crate::registers::VREG_CAL_DATA_BASE + self.slot() * 4
    }

    /// Nominal centre wavelength of the channel's filter in nanometres.
    pub const fn wavelength_nm(self) -> u16 {
        match self {
            Self::A => 410,
            Self::B => 435,
            Self::C => 460,
            Self::D => 485,
            Self::E => 510,
            Self::F => 535,
            Self::G => 560,
            Self::H => 585,
            Self::R => 610,
            Self::I => 645,
            Self::S => 680,
            Self::J => 705,
            Self::T => 730,
            Self::U => 760,
            Self::V => 810,
            Self::W => 860,
            Self::K => 900,
            Self::L => 940,
        }
    }
}
