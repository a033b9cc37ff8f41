//! Port traits — the hexagonal boundary between the bring-up protocols and
//! the board.
//!
//! ```text
//!   BoardPort ──▶ bring-up routine ──▶ EventSink
//!   ConfigPort ─┘        ▲
//!   ClockPort ───────────┘
//! ```
//!
//! The protocol layer never names a vendor driver.  I²C handles are plain
//! [`embedded_hal::i2c::I2c`] implementations; UART and PWM go through the
//! small traits below because embedded-hal 1.0 has no line-configuration or
//! LEDC-style abstraction.
//!
//! ## Ownership
//!
//! Every `open_*` call hands back an owned handle.  The board keeps nothing,
//! and the bring-up routine either returns the handle to its caller or drops
//! it before reporting failure.

use embedded_hal::delay::DelayNs;

use crate::config::PinId;
use crate::error::{BusFault, ConfigError};

// ───────────────────────────────────────────────────────────────
// Config port (pin lookup)
// ───────────────────────────────────────────────────────────────

/// Read-only pin lookup.
pub trait ConfigPort {
    /// Resolve `section.key` to a GPIO number, or say which key is missing.
    fn pin(&self, section: &str, key: &str) -> Result<PinId, ConfigError>;

    /// Like [`pin`](Self::pin), but an absent key is not an error.
    fn optional_pin(&self, section: &str, key: &str) -> Result<Option<PinId>, ConfigError> {
        match self.pin(section, key) {
            Ok(pin) => Ok(Some(pin)),
            Err(ConfigError::Missing { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port (monotonic time + blocking delay)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Deadlines are always computed relative to
/// it, never from wall time.
pub trait ClockPort: DelayNs {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Serial port (UART)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Line settings for a UART.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartSettings {
    pub baud: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
}

impl UartSettings {
    /// 8-N-1 at `baud`.
    pub const fn eight_n_one(baud: u32) -> Self {
        Self {
            baud,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
        }
    }
}

/// Pins a UART is routed to.  `tx` may be left unrouted for listen-only
/// devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartPins {
    pub tx: Option<PinId>,
    pub rx: PinId,
}

pub trait SerialPort {
    /// Re-initialise the line (baud, framing) on an open port.
    fn configure(&mut self, settings: &UartSettings) -> Result<(), BusFault>;

    /// Queue every byte for transmission.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), BusFault>;

    /// Copy whatever is already buffered into `buf` without waiting.
    /// Returns `Ok(0)` when nothing has arrived.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, BusFault>;
}

// ───────────────────────────────────────────────────────────────
// PWM output
// ───────────────────────────────────────────────────────────────

pub trait PwmOutput {
    fn set_frequency_hz(&mut self, hz: u32) -> Result<(), BusFault>;

    /// Duty on the board's 10-bit scale (0 – 1023).
    fn set_duty(&mut self, duty: u16) -> Result<(), BusFault>;

    /// Stop the signal and free the pin.
    fn release(self)
    where
        Self: Sized;
}

// ───────────────────────────────────────────────────────────────
// Board port (peripheral factory)
// ───────────────────────────────────────────────────────────────

/// Opens buses on the pins the config names.
pub trait BoardPort {
    type I2c: embedded_hal::i2c::I2c;
    type Uart: SerialPort;
    type Pwm: PwmOutput;

    fn open_i2c(&mut self, scl: PinId, sda: PinId, frequency_hz: u32)
    -> Result<Self::I2c, BusFault>;

    /// Open UART `channel` on `pins` with the given initial line settings.
    fn open_uart(
        &mut self,
        channel: u8,
        pins: UartPins,
        settings: &UartSettings,
    ) -> Result<Self::Uart, BusFault>;

    fn open_pwm(&mut self, pin: PinId) -> Result<Self::Pwm, BusFault>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// Bring-up routines report every outcome through this port.  Adapters
/// decide where it goes (serial log, test recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::BringupEvent);
}
