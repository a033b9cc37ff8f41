//! Outbound bring-up events.
//!
//! Bring-up routines emit these through the
//! [`EventSink`](super::ports::EventSink) port, exactly one terminal event
//! (`DeviceReady`, `DeviceTimeout` or `DeviceFault`) per device call.

use core::time::Duration;

use crate::bringup::DeviceKind;
use crate::config::PinId;
use crate::drivers::register::ScanResult;
use crate::error::{BringupError, ChannelFault};

/// Structured events emitted by the bring-up layer.
#[derive(Debug, Clone, PartialEq)]
pub enum BringupEvent {
    /// The device acknowledged; a handle is being returned.
    DeviceReady(DeviceKind),

    /// The bring-up deadline elapsed without an acceptable response.
    DeviceTimeout { device: DeviceKind, waited_ms: u64 },

    /// Config lookup or bus fault; no handle is returned.
    DeviceFault {
        device: DeviceKind,
        error: BringupError,
    },

    /// Addresses that answered the post-bring-up I²C scan.
    I2cScan(ScanResult),

    /// First line received from the GPS (lossy UTF-8, truncated).
    GpsSentence(heapless::String<96>),

    /// A PWM slot is driving its test signal.
    PwmChannelOk {
        channel: u8,
        pin: PinId,
        frequency_hz: u32,
        duty: u16,
        dwell: Duration,
    },

    /// A PWM slot failed; the sweep continues.
    PwmChannelFault(ChannelFault),

    /// The sweep visited every slot.
    PwmSweepDone { attempted: u8, faulted: u8 },
}
