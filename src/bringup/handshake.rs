//! UART handshake engine.
//!
//! The shared shape of every serial bring-up:
//!
//! 1. open the UART at the bootstrap rate, then re-initialise it to the
//!    working rate (8-N-1);
//! 2. optionally transmit a framing sequence;
//! 3. poll the receive buffer under a [`Deadline`] until an [`Acceptance`]
//!    predicate is satisfied.
//!
//! Each poll iteration checks the deadline first, then drains whatever is
//! buffered (never blocking), then pauses for [`POLL_INTERVAL_MS`].  The
//! loop therefore never overruns the deadline by more than one pause plus
//! one read.

use log::debug;

use super::deadline::{BRINGUP_DEADLINE_MS, Deadline, POLL_INTERVAL_MS};
use crate::app::ports::{BoardPort, ClockPort, SerialPort, UartPins, UartSettings};
use crate::error::{BringupError, Result};
use crate::pins::{UART_BOOTSTRAP_BAUD, UART_WORKING_BAUD};

/// Largest chunk pulled from the driver per poll.
pub const READ_CHUNK: usize = 256;

/// Device-specific response check.
pub trait Acceptance {
    /// Inspect one non-empty read.  `true` ends the handshake successfully.
    fn accept(&mut self, chunk: &[u8]) -> bool;
}

/// Accepts only a read whose bytes are exactly `token`.  A padded answer
/// (`OK\r\n`, `xOK\r`) is rejected even though the device did respond.
#[derive(Debug, Clone, Copy)]
pub struct ExactToken(pub &'static [u8]);

impl Acceptance for ExactToken {
    fn accept(&mut self, chunk: &[u8]) -> bool {
        chunk == self.0
    }
}

/// Accepts as soon as a line feed has been received anywhere in the
/// stream.  Keeps the first line (up to `N` bytes) for diagnostics.
#[derive(Debug, Default)]
pub struct LineTerminated<const N: usize> {
    line: heapless::Vec<u8, N>,
}

impl<const N: usize> LineTerminated<N> {
    pub fn new() -> Self {
        Self {
            line: heapless::Vec::new(),
        }
    }

    /// Bytes received up to (not including) the first line feed.
    pub fn first_line(&self) -> &[u8] {
        &self.line
    }
}

impl<const N: usize> Acceptance for LineTerminated<N> {
    fn accept(&mut self, chunk: &[u8]) -> bool {
        let (head, terminated) = match chunk.iter().position(|&b| b == b'\n') {
            Some(i) => (&chunk[..i], true),
            None => (chunk, false),
        };

        let room = N - self.line.len();
        let _ = self.line.extend_from_slice(&head[..head.len().min(room)]);
        terminated
    }
}

/// Parameters of one serial bring-up.
#[derive(Debug, Clone, Copy)]
pub struct Handshake<'a> {
    pub channel: u8,
    pub pins: UartPins,
    /// Sent once after the line is configured (`None` = listen only).
    pub preamble: Option<&'a [u8]>,
    pub deadline_ms: u64,
    pub poll_interval_ms: u32,
}

impl<'a> Handshake<'a> {
    pub fn new(channel: u8, pins: UartPins) -> Self {
        Self {
            channel,
            pins,
            preamble: None,
            deadline_ms: BRINGUP_DEADLINE_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }

    pub fn with_preamble(mut self, preamble: &'a [u8]) -> Self {
        self.preamble = Some(preamble);
        self
    }

    /// Open, configure, transmit, and wait.  The UART is handed back only
    /// once `acceptance` is satisfied; on any failure it is dropped.
    pub fn run<B, C, A>(&self, board: &mut B, clock: &mut C, acceptance: &mut A) -> Result<B::Uart>
    where
        B: BoardPort,
        C: ClockPort,
        A: Acceptance,
    {
        let bootstrap = UartSettings::eight_n_one(UART_BOOTSTRAP_BAUD);
        let mut uart = board.open_uart(self.channel, self.pins, &bootstrap)?;
        uart.configure(&UartSettings::eight_n_one(UART_WORKING_BAUD))?;

        if let Some(preamble) = self.preamble {
            uart.write_all(preamble)?;
        }

        self.await_response(&mut uart, clock, acceptance)?;
        Ok(uart)
    }

    /// The deadline-bounded polling loop on an already configured port.
    pub fn await_response<U, C, A>(&self, uart: &mut U, clock: &mut C, acceptance: &mut A) -> Result<()>
    where
        U: SerialPort,
        C: ClockPort,
        A: Acceptance,
    {
        let deadline = Deadline::start(clock, self.deadline_ms);
        let mut buf = [0u8; READ_CHUNK];
        let mut polls: u32 = 0;

        loop {
            let now = clock.now_ms();
            if deadline.expired(now) {
                debug!("uart{}: deadline after {} polls", self.channel, polls);
                return Err(BringupError::ProtocolTimeout {
                    waited_ms: deadline.elapsed_ms(now),
                });
            }

            polls += 1;
            let n = uart.read_available(&mut buf)?;
            if n > 0 && acceptance.accept(&buf[..n]) {
                debug!(
                    "uart{}: accepted after {} ms ({} polls)",
                    self.channel,
                    deadline.elapsed_ms(clock.now_ms()),
                    polls
                );
                return Ok(());
            }

            clock.delay_ms(self.poll_interval_ms);
        }
    }
}
