//! Bring-up protocol layer: deadline, serial handshake engine, and the
//! name → routine dispatcher.
//!
//! Device-specific sequences live in [`crate::devices`]; this module holds
//! what they share.

pub mod deadline;
pub mod dispatch;
pub mod handshake;

pub use dispatch::{DeviceHandle, DeviceKind};

use crate::app::events::BringupEvent;
use crate::app::ports::EventSink;
use crate::error::{BringupError, Result};

/// Emit the single terminal event for a device call and pass the result
/// through unchanged.
pub(crate) fn report<T>(device: DeviceKind, result: Result<T>, sink: &mut impl EventSink) -> Result<T> {
    let event = match &result {
        Ok(_) => BringupEvent::DeviceReady(device),
        Err(BringupError::ProtocolTimeout { waited_ms }) => BringupEvent::DeviceTimeout {
            device,
            waited_ms: *waited_ms,
        },
        Err(error) => BringupEvent::DeviceFault {
            device,
            error: error.clone(),
        },
    };
    sink.emit(&event);
    result
}
