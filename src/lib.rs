//! BoardCheck firmware library.
//!
//! Peripheral bring-up for an ESP32 sensor board: MPU inertial sensor on
//! I²C, XBee radio and GPS receiver on UART, and a PWM test bank.  The
//! protocol logic is exposed here for integration testing on the host;
//! all ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bringup;
pub mod config;
pub mod devices;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod pins;
