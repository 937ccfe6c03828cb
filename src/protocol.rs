//! Virtual register mailbox protocol for the AS7265X.
//!
//! The sensor exposes three physical registers (`STATUS`, `WRITE`, `READ`)
//! behind which an arbitrarily large virtual register space is tunnelled.
//! Every logical register access is a handshake: poll `STATUS` for mailbox
//! availability, move one byte, repeat. Three independent dies share the one
//! mailbox; the die addressed by a virtual access is whichever was last
//! selected through the device-select virtual register.

use embedded_hal::delay::DelayNs;

use crate::error::{Error, Result};
use crate::interface::As7265xInterface;
use crate::params::{MeasurementMode, SubDevice};
use crate::registers::{
    Status,
    REG_READ,
    REG_STATUS,
    REG_WRITE,
    VIRTUAL_WRITE_FLAG,
    VREG_DEVICE_SELECT,
};

/// Delay between consecutive `STATUS` reads in every polling loop (ms).
pub const POLL_INTERVAL_MS: u32 = 5;

/// Duration of one integration cycle, in tenths of a millisecond.
const INTEGRATION_CYCLE_TENTHS_MS: u32 = 28;

/// Integration cycle count assumed before the driver is configured.
pub const DEFAULT_INTEGRATION_CYCLES: u8 = 20;

/// Worst-case wait bound shared by every polling loop in the protocol.
///
/// Derived from the configured integration cycle count and measurement mode,
/// and recomputed whenever either changes. The budget is a ceiling, not a
/// guarantee: a polling loop exits the instant its awaited bit is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeoutBudget {
    millis: u32,
}

impl TimeoutBudget {
    /// Computes the budget for the given integration cycle count and mode.
    ///
    /// One integration cycle is 2.8 ms. The 6-channel modes need two physical
    /// integration passes per logical reading, doubling the nominal period.
    /// A further 100% margin is applied on top in both cases. The division
    /// happens before the pass multiplier so the 6-channel budget is exactly
    /// twice the 4-channel one at any cycle count.
    pub fn from_settings(cycles: u8, mode: MeasurementMode) -> Self {
        let passes: u32 = if mode.is_six_channel() { 2 } else { 1 };
        let base = u32::from(cycles) * INTEGRATION_CYCLE_TENTHS_MS * 2 / 10;
        Self { millis: base * passes }
    }

    /// Returns the budget in milliseconds.
    pub const fn as_millis(self) -> u32 {
        self.millis
    }
}

impl Default for TimeoutBudget {
    fn default() -> Self {
        Self::from_settings(DEFAULT_INTEGRATION_CYCLES, MeasurementMode::Continuous4Channel)
    }
}

/// Client for the virtual register mailbox protocol.
///
/// Owns the byte transport, the delay source used between status polls, and
/// the shared [`TimeoutBudget`]. Selection state lives in the device, not
/// here: callers re-assert the die before every die-scoped access.
pub struct VirtualBus<IFACE, D> {
    interface: IFACE,
    delay: D,
    budget: TimeoutBudget,
}

impl<IFACE, D> VirtualBus<IFACE, D> {
    /// Creates a new client over the provided interface and delay source.
    pub fn new(interface: IFACE, delay: D) -> Self {
        Self {
            interface,
            delay,
            budget: TimeoutBudget::default(),
        }
    }

    /// Returns the currently active timeout budget.
    pub fn budget(&self) -> TimeoutBudget {
        self.budget
    }

    /// Replaces the timeout budget used by subsequent polling loops.
    pub fn set_budget(&mut self, budget: TimeoutBudget) {
        self.budget = budget;
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Consumes the client and returns the owned interface and delay source.
    pub fn release(self) -> (IFACE, D) {
        (self.interface, self.delay)
    }
}

impl<IFACE, D, CommE> VirtualBus<IFACE, D>
where
    IFACE: As7265xInterface<Error = CommE>,
    D: DelayNs,
{
    /// Writes a byte to a virtual register.
    ///
    /// Announces the target address with bit 7 set, then sends the payload,
    /// waiting for the outbound mailbox to free up before each byte. Returns
    /// as soon as the payload is handed over; the device applies the value
    /// asynchronously to this handshake.
    pub fn write_virtual_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        self.wait_tx_clear()?;
        self.interface
            .write_register(REG_WRITE, register | VIRTUAL_WRITE_FLAG)?;

        self.wait_tx_clear()?;
        self.interface.write_register(REG_WRITE, value)?;

        Ok(())
    }

    /// Reads a byte from a virtual register.
    ///
    /// A stale inbound byte left over from a previous, possibly aborted,
    /// transaction is drained first so the byte returned belongs to this
    /// request. The drain is a best-effort heuristic: the hardware carries no
    /// sequence numbering to verify the discarded byte's origin.
    pub fn read_virtual_register(&mut self, register: u8) -> Result<u8, CommE> {
        let status = self.read_status()?;
        if status.rx_valid() {
            self.interface.read_register(REG_READ)?;
        }

        self.wait_tx_clear()?;
        self.interface
            .write_register(REG_WRITE, register & !VIRTUAL_WRITE_FLAG)?;

        self.wait_rx_set()?;
        let value = self.interface.read_register(REG_READ)?;

        Ok(value)
    }

    /// Selects the die addressed by subsequent virtual register accesses.
    ///
    /// Selection is sticky on the device side. There is no cheaper way to
    /// query the current selection than to re-assert it, so die-scoped
    /// operations call this unconditionally rather than tracking selection
    /// client-side.
    pub fn select_device(&mut self, device: SubDevice) -> Result<(), CommE> {
        self.write_virtual_register(VREG_DEVICE_SELECT, device.code())
    }

    /// Polls a virtual register until `done` accepts its value.
    ///
    /// Bounded by the shared timeout budget with the fixed poll interval
    /// between reads.
    pub fn poll_virtual_register<F>(&mut self, register: u8, done: F) -> Result<(), CommE>
    where
        F: Fn(u8) -> bool,
    {
        let mut waited_ms = 0u32;
        loop {
            let value = self.read_virtual_register(register)?;
            if done(value) {
                return Ok(());
            }

            if waited_ms >= self.budget.as_millis() {
                return Err(Error::Timeout);
            }

            self.delay.delay_ms(POLL_INTERVAL_MS);
            waited_ms += POLL_INTERVAL_MS;
        }
    }

    fn read_status(&mut self) -> Result<Status, CommE> {
        let raw = self.interface.read_register(REG_STATUS)?;
        Ok(Status::from(raw))
    }

    /// Polls `STATUS` until the outbound mailbox is free.
    fn wait_tx_clear(&mut self) -> Result<(), CommE> {
        self.wait_status(|status| !status.tx_valid())
    }

    /// Polls `STATUS` until an inbound byte is waiting.
    fn wait_rx_set(&mut self) -> Result<(), CommE> {
        self.wait_status(|status| status.rx_valid())
    }

    fn wait_status<F>(&mut self, done: F) -> Result<(), CommE>
    where
        F: Fn(Status) -> bool,
    {
        // Each iteration re-reads STATUS; a stale snapshot is never reused
        // across polling iterations.
        let mut waited_ms = 0u32;
        loop {
            let status = self.read_status()?;
            if done(status) {
                return Ok(());
            }

            if waited_ms >= self.budget.as_millis() {
                return Err(Error::Timeout);
            }

            self.delay.delay_ms(POLL_INTERVAL_MS);
            waited_ms += POLL_INTERVAL_MS;
        }
    }
}
