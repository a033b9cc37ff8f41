//! Mock board for integration tests.
//!
//! Simulates the I²C sensor, both UARTs and the LEDC bank against a shared
//! simulated clock, and records every open / transaction so tests can
//! assert on the full bus history without real hardware.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use boardcheck::app::events::BringupEvent;
use boardcheck::app::ports::{
    BoardPort, ClockPort, EventSink, PwmOutput, SerialPort, UartPins, UartSettings,
};
use boardcheck::bringup::DeviceKind;
use boardcheck::config::{BoardConfig, PinId};
use boardcheck::devices::mpu::registers::{INT_PIN_CFG, MPU_ADDR, PWR_MGMT_1, WHO_AM_I};
use boardcheck::error::BusFault;

/// Magnetometer behind the MPU; visible only once bypass is enabled.
pub const AUX_MAG_ADDR: u8 = 0x0C;

/// Identity byte the simulated sensor answers with (MPU-9250).
pub const MPU_WHO_AM_I: u8 = 0x71;

pub const BENCH_CONFIG: &str = r#"{
    "pins_devices": {
        "i2c_scl": 22, "i2c_sda": 21,
        "xbee_uart_tx": 17, "xbee_uart_rx": 16,
        "gps_uart_rx": 34
    },
    "pins_pwm": {
        "s_1": 12, "s_2": 13, "s_3": 14, "s_4": 15,
        "s_5": 25, "s_6": 26, "s_7": 27, "s_8": 32
    }
}"#;

pub fn bench_config() -> BoardConfig {
    BoardConfig::from_json(BENCH_CONFIG).unwrap()
}

// ── Simulated clock ───────────────────────────────────────────

/// Nanosecond counter shared by the clock, the board and every UART, so a
/// scripted byte arrives at the right simulated moment.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    ns: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.ns.set(self.ns.get() + ms * 1_000_000);
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.ns.set(self.ns.get() + u64::from(ns));
    }
}

impl ClockPort for SimClock {
    fn now_ms(&self) -> u64 {
        self.ns.get() / 1_000_000
    }
}

// ── I²C ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cOp {
    Write { addr: u8, bytes: Vec<u8> },
    Read { addr: u8, len: usize },
}

/// Register file of the MPU plus fault injection.
#[derive(Debug)]
pub struct I2cState {
    pub mpu_present: bool,
    pub regs: [u8; 256],
    pointer: u8,
    /// Register whose write is answered with a bus error.
    pub fail_write_to: Option<u8>,
    /// Every transaction addressed to the MPU.
    pub log: Vec<I2cOp>,
}

impl Default for I2cState {
    fn default() -> Self {
        let mut regs = [0u8; 256];
        regs[usize::from(PWR_MGMT_1)] = 0x40; // SLEEP
        regs[usize::from(WHO_AM_I)] = MPU_WHO_AM_I;
        Self {
            mpu_present: true,
            regs,
            pointer: 0,
            fail_write_to: None,
            log: Vec::new(),
        }
    }
}

impl I2cState {
    fn responds(&self, addr: u8) -> bool {
        match addr {
            MPU_ADDR => self.mpu_present,
            AUX_MAG_ADDR => self.mpu_present && self.regs[usize::from(INT_PIN_CFG)] & 0b10 != 0,
            _ => false,
        }
    }

    /// MPU writes only, as `[reg, value..]` byte vectors.
    pub fn mpu_writes(&self) -> Vec<Vec<u8>> {
        self.log
            .iter()
            .filter_map(|op| match op {
                I2cOp::Write { addr: MPU_ADDR, bytes } => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MockI2c {
    state: Rc<RefCell<I2cState>>,
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        if !s.responds(address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if address == MPU_ADDR {
                        s.log.push(I2cOp::Write {
                            addr: address,
                            bytes: bytes.to_vec(),
                        });
                    }
                    let Some((&reg, payload)) = bytes.split_first() else {
                        continue;
                    };
                    if !payload.is_empty() && s.fail_write_to == Some(reg) {
                        return Err(ErrorKind::Bus);
                    }
                    s.pointer = reg;
                    for (i, &b) in payload.iter().enumerate() {
                        s.regs[usize::from(reg.wrapping_add(i as u8))] = b;
                    }
                }
                Operation::Read(buf) => {
                    if address == MPU_ADDR {
                        s.log.push(I2cOp::Read {
                            addr: address,
                            len: buf.len(),
                        });
                    }
                    for b in buf.iter_mut() {
                        *b = s.regs[usize::from(s.pointer)];
                        s.pointer = s.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

// ── UART ──────────────────────────────────────────────────────

/// One UART's scripted receive stream and everything sent to it.
#[derive(Debug, Default)]
pub struct UartLine {
    /// `(arrival_ms, bytes)`; each chunk is delivered by a single read.
    pub rx: VecDeque<(u64, Vec<u8>)>,
    pub tx: Vec<u8>,
    pub settings: Vec<UartSettings>,
    pub reads: u32,
    pub read_fault: Option<BusFault>,
}

impl UartLine {
    pub fn bauds(&self) -> Vec<u32> {
        self.settings.iter().map(|s| s.baud).collect()
    }
}

#[derive(Debug)]
pub struct MockUart {
    line: Rc<RefCell<UartLine>>,
    clock: SimClock,
}

impl SerialPort for MockUart {
    fn configure(&mut self, settings: &UartSettings) -> Result<(), BusFault> {
        self.line.borrow_mut().settings.push(*settings);
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), BusFault> {
        self.line.borrow_mut().tx.extend_from_slice(bytes);
        Ok(())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, BusFault> {
        let mut line = self.line.borrow_mut();
        if let Some(fault) = line.read_fault.clone() {
            return Err(fault);
        }
        line.reads += 1;
        let now = self.clock.now_ms();
        if !line.rx.front().is_some_and(|(at, _)| *at <= now) {
            return Ok(0);
        }
        let (_, bytes) = line.rx.pop_front().unwrap();
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

// ── PWM ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmCall {
    Frequency { pin: PinId, hz: u32 },
    Duty { pin: PinId, duty: u16 },
    Release { pin: PinId },
}

#[derive(Debug)]
pub struct MockPwm {
    pin: PinId,
    fail_duty: bool,
    log: Rc<RefCell<Vec<PwmCall>>>,
}

impl PwmOutput for MockPwm {
    fn set_frequency_hz(&mut self, hz: u32) -> Result<(), BusFault> {
        self.log.borrow_mut().push(PwmCall::Frequency { pin: self.pin, hz });
        Ok(())
    }

    fn set_duty(&mut self, duty: u16) -> Result<(), BusFault> {
        if self.fail_duty {
            return Err(BusFault::Io("duty rejected".into()));
        }
        self.log.borrow_mut().push(PwmCall::Duty { pin: self.pin, duty });
        Ok(())
    }

    fn release(self) {
        self.log.borrow_mut().push(PwmCall::Release { pin: self.pin });
    }
}

// ── Board ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Open {
    I2c { scl: PinId, sda: PinId, hz: u32 },
    Uart { channel: u8, pins: UartPins, baud: u32 },
    Pwm { pin: PinId },
}

pub struct MockBoard {
    pub clock: SimClock,
    pub i2c: Rc<RefCell<I2cState>>,
    lines: HashMap<u8, Rc<RefCell<UartLine>>>,
    pub pwm_log: Rc<RefCell<Vec<PwmCall>>>,
    pub opens: Vec<Open>,
    pub fail_i2c_open: bool,
    pub fail_uart_open: Vec<u8>,
    /// Pins already claimed elsewhere; opening them fails.
    pub busy_pwm_pins: Vec<PinId>,
    pub bad_duty_pins: Vec<PinId>,
}

impl MockBoard {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            i2c: Rc::default(),
            lines: HashMap::new(),
            pwm_log: Rc::default(),
            opens: Vec::new(),
            fail_i2c_open: false,
            fail_uart_open: Vec::new(),
            busy_pwm_pins: Vec::new(),
            bad_duty_pins: Vec::new(),
        }
    }

    /// The line behind UART `channel`, created on first use.
    pub fn line(&mut self, channel: u8) -> Rc<RefCell<UartLine>> {
        self.lines.entry(channel).or_default().clone()
    }

    /// Queue `bytes` to arrive on `channel` at simulated `at_ms`.
    pub fn script_rx(&mut self, channel: u8, at_ms: u64, bytes: &[u8]) {
        self.line(channel).borrow_mut().rx.push_back((at_ms, bytes.to_vec()));
    }

    pub fn pwm_calls(&self) -> Vec<PwmCall> {
        self.pwm_log.borrow().clone()
    }
}

impl BoardPort for MockBoard {
    type I2c = MockI2c;
    type Uart = MockUart;
    type Pwm = MockPwm;

    fn open_i2c(&mut self, scl: PinId, sda: PinId, frequency_hz: u32) -> Result<MockI2c, BusFault> {
        self.opens.push(Open::I2c {
            scl,
            sda,
            hz: frequency_hz,
        });
        if self.fail_i2c_open {
            return Err(BusFault::Open("i2c0 in use".into()));
        }
        Ok(MockI2c {
            state: self.i2c.clone(),
        })
    }

    fn open_uart(&mut self, channel: u8, pins: UartPins, settings: &UartSettings) -> Result<MockUart, BusFault> {
        self.opens.push(Open::Uart {
            channel,
            pins,
            baud: settings.baud,
        });
        if self.fail_uart_open.contains(&channel) {
            return Err(BusFault::Open(format!("uart{channel} in use")));
        }
        let line = self.line(channel);
        line.borrow_mut().settings.push(*settings);
        Ok(MockUart {
            line,
            clock: self.clock.clone(),
        })
    }

    fn open_pwm(&mut self, pin: PinId) -> Result<MockPwm, BusFault> {
        self.opens.push(Open::Pwm { pin });
        if self.busy_pwm_pins.contains(&pin) {
            return Err(BusFault::Open(format!("gpio {pin} in use")));
        }
        Ok(MockPwm {
            pin,
            fail_duty: self.bad_duty_pins.contains(&pin),
            log: self.pwm_log.clone(),
        })
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<BringupEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminal events (ready / timeout / fault) for `device`.
    pub fn terminal_for(&self, device: DeviceKind) -> Vec<&BringupEvent> {
        self.events
            .iter()
            .filter(|e| match e {
                BringupEvent::DeviceReady(d) => *d == device,
                BringupEvent::DeviceTimeout { device: d, .. } => *d == device,
                BringupEvent::DeviceFault { device: d, .. } => *d == device,
                _ => false,
            })
            .collect()
    }

    pub fn timeouts(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BringupEvent::DeviceTimeout { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &BringupEvent) {
        self.events.push(event.clone());
    }
}

/// Clock, board and sink wired together.
pub fn rig() -> (SimClock, MockBoard, RecordingSink) {
    let clock = SimClock::new();
    let board = MockBoard::new(&clock);
    (clock, board, RecordingSink::new())
}
