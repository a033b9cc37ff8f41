//! GPS receiver bring-up on UART 2.
//!
//! The receiver is never spoken to.  Any line feed in the incoming stream
//! is taken as proof of life, since NMEA sentences are CR/LF terminated and
//! streamed unprompted.

use log::debug;

use crate::app::events::BringupEvent;
use crate::app::ports::{BoardPort, ClockPort, ConfigPort, EventSink, UartPins};
use crate::bringup::handshake::{Handshake, LineTerminated};
use crate::bringup::{DeviceKind, report};
use crate::error::Result;
use crate::pins::{GPS_UART_CHANNEL, GPS_UART_RX, GPS_UART_TX, PINS_DEVICES};

/// Longest NMEA sentence kept for the log (82 chars per NMEA 0183, rounded up).
pub const SENTENCE_CAPTURE: usize = 96;

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
    let mut line = LineTerminated::<SENTENCE_CAPTURE>::new();
    let result = pins(config).and_then(|pins| Handshake::new(GPS_UART_CHANNEL, pins).run(board, clock, &mut line));

    if result.is_ok() {
        let sentence = first_sentence(line.first_line());
        debug!("gps: first sentence {:?}", sentence.as_str());
        sink.emit(&BringupEvent::GpsSentence(sentence));
    }
    report(DeviceKind::Gps, result, sink)
}

fn pins(config: &impl ConfigPort) -> Result<UartPins> {
    // TX is optional: a listen-only receiver needs no transmit line.
    Ok(UartPins {
        tx: config.optional_pin(PINS_DEVICES, GPS_UART_TX)?,
        rx: config.pin(PINS_DEVICES, GPS_UART_RX)?,
    })
}

/// Printable form of the captured line, trailing CR stripped.
fn first_sentence(raw: &[u8]) -> heapless::String<SENTENCE_CAPTURE> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let mut out = heapless::String::new();
    for ch in String::from_utf8_lossy(raw).chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
