//! Bus interface abstraction for the AS7265X driver.

pub mod i2c;

/// Abstraction over the byte-level bus access required by the driver.
///
/// The mailbox protocol only ever moves one byte at a time, so the seam is a
/// pair of single-byte accessors at a physical sub-address.
pub trait As7265xInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single byte to a physical register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single byte from a physical register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;
}
