//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by rendering bring-up events as the status
//! lines operators watch on the serial console (UART0 / USB-CDC).

use log::{debug, error, info, warn};

use crate::app::events::BringupEvent;
use crate::app::ports::EventSink;
use crate::bringup::DeviceKind;
use crate::error::BringupError;

/// Adapter that logs every [`BringupEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Status-line tag for a device.  The MPU is reported by its bus.
fn tag(device: DeviceKind) -> &'static str {
    match device {
        DeviceKind::Xbee => "xbee-response",
        DeviceKind::Gps => "gps-response",
        DeviceKind::Mpu => "i2c",
    }
}

/// Status word for a device that did not come up.  Only a deadline expiry
/// reads as a timeout on the UART lines; the MPU keeps its combined word.
fn failure_status(device: DeviceKind, error: &BringupError) -> &'static str {
    match (device, error) {
        (_, BringupError::ProtocolTimeout { .. }) | (DeviceKind::Mpu, BringupError::BusFault(_)) => {
            "[FAILED/TIMEOUT]"
        }
        _ => "[FAILED]",
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &BringupEvent) {
        match event {
            BringupEvent::DeviceReady(device) => {
                info!("[device] {} \t\t\t[OK]", tag(*device));
            }
            BringupEvent::DeviceTimeout { device, waited_ms } => {
                warn!("[device] {} \t\t\t[FAILED/TIMEOUT] ({} ms)", tag(*device), waited_ms);
            }
            BringupEvent::DeviceFault { device, error } => match error {
                BringupError::Config(e) => {
                    error!("[device] {} \t\t\t[FAILED]: {}", device, e);
                }
                BringupError::BusFault(e) => {
                    error!("Error in {}-init: {}", device, e);
                    warn!("[device] {} \t\t\t{}", tag(*device), failure_status(*device, error));
                }
                BringupError::ProtocolTimeout { waited_ms } => {
                    warn!(
                        "[device] {} \t\t\t{} ({} ms)",
                        tag(*device),
                        failure_status(*device, error),
                        waited_ms
                    );
                }
            },
            BringupEvent::I2cScan(addrs) => {
                info!("[device] i2c detect addr: \t\t{:02x?}", addrs.as_slice());
            }
            BringupEvent::GpsSentence(line) => {
                debug!("[gps] first sentence: {}", line);
            }
            BringupEvent::PwmChannelOk {
                channel,
                pin,
                frequency_hz,
                duty,
                dwell,
            } => {
                info!(
                    "[pwm] signal {} \t\t\t\t[OK] Sets PWM s_{} (gpio {}) [freq: {}, duty: {}] for {} seconds",
                    channel,
                    channel,
                    pin,
                    frequency_hz,
                    duty,
                    dwell.as_secs_f32()
                );
            }
            BringupEvent::PwmChannelFault(fault) => {
                error!("[pwm] signal {} \t\t\t\t[FAILED]: {}", fault.channel, fault);
            }
            BringupEvent::PwmSweepDone { attempted, faulted } => {
                info!("[pwm] sweep done: {}/{} channels ok", attempted - faulted, attempted);
            }
        }
    }
}
