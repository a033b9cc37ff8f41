//! BoardCheck Firmware — Main Entry Point
//!
//! Brings every peripheral up once, in order, then idles so the console
//! stays readable.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  EspBoard          LogEventSink      MonotonicClock      │
//! │  (BoardPort)       (EventSink)       (ClockPort)         │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ─────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │           BringupSession (pure logic)              │  │
//! │  │  mpu · xbee · gps · pwm sweep · report             │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use boardcheck::adapters::esp_board::{self, CONFIG_FS_BASE, EspBoard};
use boardcheck::adapters::log_sink::LogEventSink;
use boardcheck::adapters::time::MonotonicClock;
use boardcheck::app::session::BringupSession;
use boardcheck::config::DEFAULT_CONFIG_PATH;

/// How long each PWM slot holds its test signal.
const PWM_DWELL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BoardCheck v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Pin map (fatal on failure) ─────────────────────────
    esp_board::mount_config_fs().context("mounting config filesystem")?;
    let path = format!("{CONFIG_FS_BASE}/{DEFAULT_CONFIG_PATH}");
    let mut session = BringupSession::load(&path, EspBoard::new(), MonotonicClock::new(), LogEventSink::new())
        .with_context(|| format!("loading {path}"))?;

    // ── 3. Devices, one at a time ─────────────────────────────
    let mpu = session.mpu().ok();
    let xbee = session.xbee().ok();
    let gps = session.gps().ok();

    // ── 4. PWM bank ───────────────────────────────────────────
    session.pwm(PWM_DWELL);

    // ── 5. Report ─────────────────────────────────────────────
    session.report().log_summary();
    match session.report().to_json() {
        Ok(json) => info!("[report] {json}"),
        Err(e) => warn!("[report] serialise failed: {e}"),
    }

    // Keep live handles open; the radio and GPS stay configured for
    // whoever inspects the board next.
    let _handles = (mpu, xbee, gps);
    loop {
        esp_idf_hal::delay::FreeRtos::delay_ms(1_000);
    }
}
