//! Radio modem bring-up on UART 1.
//!
//! After the line is at 9600 8-N-1 the modem is sent the command-mode
//! escape `+++` and must answer with exactly `OK\r`.

use crate::app::ports::{BoardPort, ClockPort, ConfigPort, EventSink, UartPins};
use crate::bringup::handshake::{ExactToken, Handshake};
use crate::bringup::{DeviceKind, report};
use crate::error::Result;
use crate::pins::{PINS_DEVICES, XBEE_UART_CHANNEL, XBEE_UART_RX, XBEE_UART_TX};

/// Command-mode escape sequence.
pub const COMMAND_MODE: &[u8] = b"+++";

/// The only response accepted as entry into command mode.
pub const COMMAND_MODE_ACK: &[u8] = b"OK\r";

pub fn bring_up<B, C, S>(
    board: &mut B,
    config: &impl ConfigPort,
    clock: &mut C,
    sink: &mut S,
) -> Result<B::Uart>
where
    B: BoardPort,
    C: ClockPort,
    S: EventSink,
{
    let result = pins(config).and_then(|pins| {
        Handshake::new(XBEE_UART_CHANNEL, pins)
            .with_preamble(COMMAND_MODE)
            .run(board, clock, &mut ExactToken(COMMAND_MODE_ACK))
    });
    report(DeviceKind::Xbee, result, sink)
}

fn pins(config: &impl ConfigPort) -> Result<UartPins> {
    Ok(UartPins {
        tx: Some(config.pin(PINS_DEVICES, XBEE_UART_TX)?),
        rx: config.pin(PINS_DEVICES, XBEE_UART_RX)?,
    })
}
