//! Bring-up session — the application service.
//!
//! [`BringupSession`] owns everything one bring-up pass needs: the loaded
//! pin map, the board, the clock and the event sink.  Each call brings one
//! device up, records the outcome in the [`BringupReport`], and hands any
//! live handle straight to the caller.  The session keeps no handles.
//!
//! ```text
//!  BoardConfig ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                  │    BringupSession    │
//!  BoardPort  ◀────│  xbee · gps · mpu    │
//!  ClockPort  ◀────│  pwm sweep · report  │
//!                  └──────────────────────┘
//! ```

use core::time::Duration;
use std::path::Path;

use log::info;

use super::ports::{BoardPort, ClockPort, EventSink};
use crate::bringup::dispatch::{self, DeviceHandle, DeviceKind};
use crate::config::BoardConfig;
use crate::devices::mpu::Mpu;
use crate::diagnostics::{BringupReport, DeviceOutcome};
use crate::drivers::pwm_sweep::{self, PwmSweepReport};
use crate::error::{ConfigError, Result};

pub struct BringupSession<B, C, S> {
    config: BoardConfig,
    board: B,
    clock: C,
    sink: S,
    report: BringupReport,
}

impl<B, C, S> BringupSession<B, C, S>
where
    B: BoardPort,
    C: ClockPort,
    S: EventSink,
{
    pub fn new(config: BoardConfig, board: B, clock: C, sink: S) -> Self {
        Self {
            config,
            board,
            clock,
            sink,
            report: BringupReport::new(),
        }
    }

    /// Load the pin map from `path` and open a session.  A load failure is
    /// the one error that ends the session before it starts.
    pub fn load(path: impl AsRef<Path>, board: B, clock: C, sink: S) -> core::result::Result<Self, ConfigError> {
        let config = BoardConfig::load(path)?;
        Ok(Self::new(config, board, clock, sink))
    }

    // ── Device bring-up ───────────────────────────────────────

    /// Bring up the device called `name`.  Unknown names return `None`
    /// and leave the report untouched.
    pub fn device(&mut self, name: &str) -> Option<Result<DeviceHandle<B>>> {
        let result = dispatch::dispatch(name, &mut self.board, &self.config, &mut self.clock, &mut self.sink)?;
        if let Some(kind) = DeviceKind::from_name(name) {
            self.report.record(kind, DeviceOutcome::of(&result));
        }
        Some(result)
    }

    pub fn xbee(&mut self) -> Result<B::Uart> {
        let result = crate::devices::xbee::bring_up(&mut self.board, &self.config, &mut self.clock, &mut self.sink);
        self.report.record(DeviceKind::Xbee, DeviceOutcome::of(&result));
        result
    }

    pub fn gps(&mut self) -> Result<B::Uart> {
        let result = crate::devices::gps::bring_up(&mut self.board, &self.config, &mut self.clock, &mut self.sink);
        self.report.record(DeviceKind::Gps, DeviceOutcome::of(&result));
        result
    }

    pub fn mpu(&mut self) -> Result<Mpu<B::I2c>> {
        let result = crate::devices::mpu::bring_up(&mut self.board, &self.config, &mut self.sink);
        self.report.record(DeviceKind::Mpu, DeviceOutcome::of(&result));
        result
    }

    // ── PWM sweep ─────────────────────────────────────────────

    /// Exercise all eight PWM slots, `dwell` each.  Always completes.
    pub fn pwm(&mut self, dwell: Duration) -> PwmSweepReport {
        info!("[pwm] sweep: {} s per channel", dwell.as_secs_f32());
        let sweep = pwm_sweep::run(&mut self.board, &self.config, &mut self.clock, &mut self.sink, dwell);
        self.report.record_pwm(&sweep);
        sweep
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn report(&self) -> &BringupReport {
        &self.report
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    /// Tear the session down, returning the board, clock and sink.
    pub fn into_parts(self) -> (B, C, S, BringupReport) {
        (self.board, self.clock, self.sink, self.report)
    }
}
