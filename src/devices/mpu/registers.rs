//! MPU-6050/9250 register map (the subset bring-up touches).

/// 7-bit bus address with AD0 tied low.
pub const MPU_ADDR: u8 = 0x68;

/// Power management 1.  Writing 0 clears SLEEP and selects the internal
/// oscillator.
pub const PWR_MGMT_1: u8 = 0x6B;

/// Interrupt pin / bypass configuration.
pub const INT_PIN_CFG: u8 = 0x37;

/// `BYPASS_EN` field of [`INT_PIN_CFG`]: routes the auxiliary I²C pins
/// straight onto the host bus so the magnetometer becomes addressable.
pub const I2C_BYPASS_MASK: u8 = 0b0000_0010;
pub const I2C_BYPASS_EN: u8 = 0b0000_0010;

/// Identity register; reads 0x68 on the 6050 and 0x71 on the 9250.
pub const WHO_AM_I: u8 = 0x75;

/// New `INT_PIN_CFG` value with the bypass field set and every other bit
/// left as read.
pub const fn enable_bypass(int_pin_cfg: u8) -> u8 {
    (int_pin_cfg & !I2C_BYPASS_MASK) | I2C_BYPASS_EN
}
