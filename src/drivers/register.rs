//! Single-byte register access on an I²C peripheral.
//!
//! Every access is a fresh bus round trip; nothing is cached.  A NACK or
//! bus error surfaces as a [`BusFault`], never as a partial value.

use embedded_hal::i2c::I2c;

use crate::error::BusFault;

/// First and last 7-bit addresses probed by [`RegisterBus::scan`]
/// (reserved ranges excluded).
pub const SCAN_FIRST: u8 = 0x08;
pub const SCAN_LAST: u8 = 0x77;

/// Addresses that answered a bus scan, in ascending order.
pub type ScanResult = heapless::Vec<u8, { (SCAN_LAST - SCAN_FIRST + 1) as usize }>;

/// An I²C bus bound to one peripheral address.
#[derive(Debug)]
pub struct RegisterBus<I> {
    bus: I,
    address: u8,
}

impl<I: I2c> RegisterBus<I> {
    pub fn new(bus: I, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Memory read: write the register index, repeated start, read one byte.
    pub fn read_register(&mut self, reg: u8) -> Result<u8, BusFault> {
        let mut buf = [0u8; 1];
        self.bus
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|e| BusFault::from_i2c(&e))?;
        Ok(buf[0])
    }

    /// Memory write of exactly one payload byte.  The byte goes out as a
    /// signed 8-bit value, which has the same bit pattern as `value`.
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusFault> {
        let [payload] = (value as i8).to_le_bytes();
        self.bus
            .write(self.address, &[reg, payload])
            .map_err(|e| BusFault::from_i2c(&e))
    }

    /// Read-modify-write.  The register is always read first; the value
    /// produced by `f` is written back and returned.
    pub fn modify_register(&mut self, reg: u8, f: impl FnOnce(u8) -> u8) -> Result<u8, BusFault> {
        let current = self.read_register(reg)?;
        let next = f(current);
        self.write_register(reg, next)?;
        Ok(next)
    }

    /// Probe every non-reserved 7-bit address with a one-byte read and
    /// collect those that acknowledge.  Silence is not a fault here.
    pub fn scan(&mut self) -> ScanResult {
        let mut found = ScanResult::new();
        let mut probe = [0u8; 1];
        for addr in SCAN_FIRST..=SCAN_LAST {
            if self.bus.read(addr, &mut probe).is_ok() {
                let _ = found.push(addr);
            }
        }
        found
    }

    /// Give the bus back to the caller.
    pub fn release(self) -> I {
        self.bus
    }
}
