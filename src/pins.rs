//! Pin-map vocabulary and fixed bus assignments.
//!
//! Pin numbers themselves live in the board's `config.json`; this module is
//! the single source of truth for the section/key names used to look them
//! up, plus the bus parameters that are fixed by the hardware.

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

/// Section holding the bus pins of the attached devices.
pub const PINS_DEVICES: &str = "pins_devices";
/// Section holding the PWM test-signal pins `s_1` .. `s_8`.
pub const PINS_PWM: &str = "pins_pwm";

// ---------------------------------------------------------------------------
// I²C bus (MPU inertial sensor)
// ---------------------------------------------------------------------------

pub const I2C_SCL: &str = "i2c_scl";
pub const I2C_SDA: &str = "i2c_sda";

/// Standard-mode bus clock.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// UART 1 (XBee radio modem)
// ---------------------------------------------------------------------------

pub const XBEE_UART_TX: &str = "xbee_uart_tx";
pub const XBEE_UART_RX: &str = "xbee_uart_rx";
pub const XBEE_UART_CHANNEL: u8 = 1;

// ---------------------------------------------------------------------------
// UART 2 (GPS receiver)
// ---------------------------------------------------------------------------

/// Optional: the receiver is only listened to, so TX may stay unrouted.
pub const GPS_UART_TX: &str = "gps_uart_tx";
pub const GPS_UART_RX: &str = "gps_uart_rx";
pub const GPS_UART_CHANNEL: u8 = 2;

// ---------------------------------------------------------------------------
// UART line settings shared by both serial devices
// ---------------------------------------------------------------------------

/// Rate the driver is first opened at.
pub const UART_BOOTSTRAP_BAUD: u32 = 115_200;
/// Rate both devices actually talk at (8-N-1).
pub const UART_WORKING_BAUD: u32 = 9_600;

// ---------------------------------------------------------------------------
// PWM test bank
// ---------------------------------------------------------------------------

pub const PWM_SLOTS: u8 = 8;
pub const PWM_TEST_FREQ_HZ: u32 = 50;
/// Duty on the 10-bit LEDC scale (0 – 1023), roughly a 2 ms servo pulse at 50 Hz.
pub const PWM_TEST_DUTY: u16 = 100;
pub const PWM_DUTY_RESOLUTION_BITS: u32 = 10;

/// Config key for a 1-based PWM slot (`s_1` .. `s_8`).
pub fn pwm_slot_key(slot: u8) -> heapless::String<8> {
    let mut key = heapless::String::new();
    let _ = core::fmt::Write::write_fmt(&mut key, format_args!("s_{slot}"));
    key
}
