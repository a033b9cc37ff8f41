//! Device dispatcher: maps a device name to its bring-up routine.

use core::fmt;

use crate::app::ports::{BoardPort, ClockPort, ConfigPort, EventSink};
use crate::devices::{gps, mpu, xbee};
use crate::error::Result;

/// Peripherals this firmware knows how to bring up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Xbee,
    Gps,
    Mpu,
}

impl DeviceKind {
    pub const ALL: [Self; 3] = [Self::Xbee, Self::Gps, Self::Mpu];

    /// Exact, case-sensitive match on the names used by operators.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "xbee" => Some(Self::Xbee),
            "gps" => Some(Self::Gps),
            "mpu" => Some(Self::Mpu),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Xbee => "xbee",
            Self::Gps => "gps",
            Self::Mpu => "mpu",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A live handle from any bring-up routine.  Owned by the caller.
pub enum DeviceHandle<B: BoardPort> {
    Xbee(B::Uart),
    Gps(B::Uart),
    Mpu(mpu::Mpu<B::I2c>),
}

impl<B: BoardPort> DeviceHandle<B> {
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Xbee(_) => DeviceKind::Xbee,
            Self::Gps(_) => DeviceKind::Gps,
            Self::Mpu(_) => DeviceKind::Mpu,
        }
    }
}

impl<B: BoardPort> fmt::Debug for DeviceHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeviceHandle").field(&self.kind()).finish()
    }
}

/// Run the bring-up routine for `kind`.
pub fn bring_up<B, C, S>(
    kind: DeviceKind,
    board: &mut B,
    config: &impl ConfigPort,
    clock: &mut C,
    sink: &mut S,
) -> Result<DeviceHandle<B>>
where
    B: BoardPort,
    C: ClockPort,
    S: EventSink,
{
    match kind {
        DeviceKind::Xbee => xbee::bring_up(board, config, clock, sink).map(DeviceHandle::Xbee),
        DeviceKind::Gps => gps::bring_up(board, config, clock, sink).map(DeviceHandle::Gps),
        DeviceKind::Mpu => mpu::bring_up(board, config, sink).map(DeviceHandle::Mpu),
    }
}

/// Look `name` up and bring the device up.  An unknown name yields `None`:
/// nothing is opened and nothing is reported.
pub fn dispatch<B, C, S>(
    name: &str,
    board: &mut B,
    config: &impl ConfigPort,
    clock: &mut C,
    sink: &mut S,
) -> Option<Result<DeviceHandle<B>>>
where
    B: BoardPort,
    C: ClockPort,
    S: EventSink,
{
    DeviceKind::from_name(name).map(|kind| bring_up(kind, board, config, clock, sink))
}
