//! End-of-session bring-up report.
//!
//! The session records one [`DeviceOutcome`] per device call and the PWM
//! sweep summary.  At the end the report is logged for the operator and
//! can be serialized for anything reading the console by machine.

use log::{info, warn};
use serde::Serialize;

use crate::bringup::DeviceKind;
use crate::drivers::pwm_sweep::PwmSweepReport;
use crate::error::BringupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceOutcome {
    Ready,
    Timeout,
    BusFault,
    Config,
}

impl DeviceOutcome {
    pub fn of<T>(result: &Result<T, BringupError>) -> Self {
        match result {
            Ok(_) => Self::Ready,
            Err(BringupError::ProtocolTimeout { .. }) => Self::Timeout,
            Err(BringupError::BusFault(_)) => Self::BusFault,
            Err(BringupError::Config(_)) => Self::Config,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Ready => "OK",
            Self::Timeout => "TIMEOUT",
            Self::BusFault => "BUS FAULT",
            Self::Config => "CONFIG",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PwmSummary {
    pub attempted: u8,
    pub faulted: u8,
}

/// Outcomes collected over one session.  A device brought up twice keeps
/// only its latest outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BringupReport {
    xbee: Option<DeviceOutcome>,
    gps: Option<DeviceOutcome>,
    mpu: Option<DeviceOutcome>,
    pwm: Option<PwmSummary>,
}

impl BringupReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, device: DeviceKind, outcome: DeviceOutcome) {
        *self.slot_mut(device) = Some(outcome);
    }

    pub fn record_pwm(&mut self, sweep: &PwmSweepReport) {
        self.pwm = Some(PwmSummary {
            attempted: sweep.attempted,
            faulted: sweep.faulted(),
        });
    }

    pub fn outcome(&self, device: DeviceKind) -> Option<DeviceOutcome> {
        match device {
            DeviceKind::Xbee => self.xbee,
            DeviceKind::Gps => self.gps,
            DeviceKind::Mpu => self.mpu,
        }
    }

    pub fn pwm(&self) -> Option<PwmSummary> {
        self.pwm
    }

    /// `true` when every device that was attempted came up.  Devices never
    /// attempted and PWM channel faults do not count against it.
    pub fn all_ready(&self) -> bool {
        DeviceKind::ALL
            .iter()
            .filter_map(|&d| self.outcome(d))
            .all(|o| o == DeviceOutcome::Ready)
    }

    /// One line per attempted device, then the PWM line if a sweep ran.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = DeviceKind::ALL
            .iter()
            .filter_map(|&d| self.outcome(d).map(|o| format!("{:<6}{}", d.name(), o.label())))
            .collect();
        if let Some(pwm) = self.pwm {
            lines.push(format!(
                "{:<6}{}/{} channels ok",
                "pwm",
                pwm.attempted - pwm.faulted,
                pwm.attempted
            ));
        }
        lines
    }

    pub fn log_summary(&self) {
        info!("── bring-up summary ──");
        for line in self.summary_lines() {
            info!("  {line}");
        }
        if !self.all_ready() {
            warn!("one or more devices did not come up");
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn slot_mut(&mut self, device: DeviceKind) -> &mut Option<DeviceOutcome> {
        match device {
            DeviceKind::Xbee => &mut self.xbee,
            DeviceKind::Gps => &mut self.gps,
            DeviceKind::Mpu => &mut self.mpu,
        }
    }
}
