//! Inertial sensor bring-up over I²C.
//!
//! Sequence: look up `i2c_scl` / `i2c_sda`, open the bus at 100 kHz, wake
//! the device (`PWR_MGMT_1 = 0`), enable auxiliary bypass with a
//! read-modify-write of `INT_PIN_CFG`, then scan the bus so the log shows
//! what became reachable.

pub mod registers;

use embedded_hal::i2c::I2c;
use log::debug;

use crate::app::events::BringupEvent;
use crate::app::ports::{BoardPort, ConfigPort, EventSink};
use crate::bringup::{DeviceKind, report};
use crate::drivers::register::{RegisterBus, ScanResult};
use crate::error::Result;
use crate::pins::{I2C_FREQ_HZ, I2C_SCL, I2C_SDA, PINS_DEVICES};

use registers::{INT_PIN_CFG, MPU_ADDR, PWR_MGMT_1, enable_bypass};

/// An awake sensor with bypass enabled, plus what the post-bring-up scan saw.
#[derive(Debug)]
pub struct Mpu<I> {
    regs: RegisterBus<I>,
    scan: ScanResult,
}

impl<I: I2c> Mpu<I> {
    pub fn address(&self) -> u8 {
        self.regs.address()
    }

    /// Addresses that acknowledged after bypass was enabled.
    pub fn scan(&self) -> &[u8] {
        &self.scan
    }

    pub fn registers(&mut self) -> &mut RegisterBus<I> {
        &mut self.regs
    }

    pub fn into_bus(self) -> I {
        self.regs.release()
    }
}

/// Bring the sensor up on the configured bus pins.
pub fn bring_up<B, S>(board: &mut B, config: &impl ConfigPort, sink: &mut S) -> Result<Mpu<B::I2c>>
where
    B: BoardPort,
    S: EventSink,
{
    let result = init(board, config, sink);
    report(DeviceKind::Mpu, result, sink)
}

fn init<B, S>(board: &mut B, config: &impl ConfigPort, sink: &mut S) -> Result<Mpu<B::I2c>>
where
    B: BoardPort,
    S: EventSink,
{
    let scl = config.pin(PINS_DEVICES, I2C_SCL)?;
    let sda = config.pin(PINS_DEVICES, I2C_SDA)?;
    debug!("mpu: i2c scl={scl} sda={sda} @ {I2C_FREQ_HZ} Hz");

    let bus = board.open_i2c(scl, sda, I2C_FREQ_HZ)?;
    let mut regs = RegisterBus::new(bus, MPU_ADDR);

    regs.write_register(PWR_MGMT_1, 0)?;
    let cfg = regs.modify_register(INT_PIN_CFG, enable_bypass)?;
    debug!("mpu: INT_PIN_CFG <- {cfg:#04x}");

    let scan = regs.scan();
    sink.emit(&BringupEvent::I2cScan(scan.clone()));

    Ok(Mpu { regs, scan })
}
