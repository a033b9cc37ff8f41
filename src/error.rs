//! Error taxonomy for the bring-up firmware.
//!
//! Only [`ConfigError::Load`] is allowed to end a session.  Every other
//! fault is absorbed at the boundary of the bring-up routine that owns it
//! and reaches the caller as a [`BringupError`] in place of a handle, with
//! a diagnostic line already emitted.

use core::fmt;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file is missing, unreadable, or not valid JSON.
    /// Fatal: no peripheral can be addressed without it.
    Load { source: String, reason: String },
    /// A section or key is absent.  Fatal to the one device being configured.
    Missing { section: String, key: String },
    /// The key exists but does not hold a GPIO number.
    InvalidPin { section: String, key: String },
}

impl ConfigError {
    pub fn missing(section: &str, key: &str) -> Self {
        Self::Missing {
            section: section.into(),
            key: key.into(),
        }
    }

    /// `true` for the one error class that aborts the whole session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { source, reason } => write!(f, "cannot load config {source}: {reason}"),
            Self::Missing { section, key } => write!(f, "missing config key {section}.{key}"),
            Self::InvalidPin { section, key } => {
                write!(f, "config key {section}.{key} is not a GPIO number")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Bus faults (I2C / UART / LEDC)
// ---------------------------------------------------------------------------

/// A bus could not be opened, or a transaction on it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusFault {
    /// Driver or peripheral could not be opened / reconfigured.
    Open(String),
    /// The addressed device did not acknowledge.
    Nack,
    /// Bus error, arbitration loss or overrun.
    Bus,
    /// The transaction did not complete in time.
    Timeout,
    /// Any other transport failure, with the driver's description.
    Io(String),
}

impl BusFault {
    /// Classify an embedded-hal I2C error.
    pub fn from_i2c<E: embedded_hal::i2c::Error>(err: &E) -> Self {
        use embedded_hal::i2c::ErrorKind;

        match err.kind() {
            ErrorKind::NoAcknowledge(_) => Self::Nack,
            ErrorKind::Bus | ErrorKind::ArbitrationLoss | ErrorKind::Overrun => Self::Bus,
            _ => Self::Io(format!("{err:?}")),
        }
    }
}

impl fmt::Display for BusFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(cause) => write!(f, "open failed: {cause}"),
            Self::Nack => write!(f, "no acknowledge"),
            Self::Bus => write!(f, "bus error"),
            Self::Timeout => write!(f, "bus timeout"),
            Self::Io(cause) => write!(f, "I/O error: {cause}"),
        }
    }
}

impl core::error::Error for BusFault {}

// ---------------------------------------------------------------------------
// Bring-up outcome
// ---------------------------------------------------------------------------

/// Why a bring-up routine returned no handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BringupError {
    /// Pin lookup failed; nothing was opened.
    Config(ConfigError),
    /// The bus could not be opened or a transaction failed.
    BusFault(BusFault),
    /// The deadline elapsed without an acceptable response.
    ProtocolTimeout { waited_ms: u64 },
}

impl fmt::Display for BringupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::BusFault(e) => write!(f, "bus: {e}"),
            Self::ProtocolTimeout { waited_ms } => {
                write!(f, "no response after {waited_ms} ms")
            }
        }
    }
}

impl core::error::Error for BringupError {}

impl From<ConfigError> for BringupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<BusFault> for BringupError {
    fn from(e: BusFault) -> Self {
        Self::BusFault(e)
    }
}

// ---------------------------------------------------------------------------
// PWM channel faults
// ---------------------------------------------------------------------------

/// A single PWM slot failed during the sweep.  Never stops the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFault {
    /// 1-based slot number (`s_1` .. `s_8`).
    pub channel: u8,
    pub cause: ChannelFaultCause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelFaultCause {
    Config(ConfigError),
    Bus(BusFault),
}

impl fmt::Display for ChannelFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            ChannelFaultCause::Config(e) => write!(f, "channel {}: {e}", self.channel),
            ChannelFaultCause::Bus(e) => write!(f, "channel {}: {e}", self.channel),
        }
    }
}

impl core::error::Error for ChannelFault {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Result of a single device bring-up.
pub type Result<T> = core::result::Result<T, BringupError>;
