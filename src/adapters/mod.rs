//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements  | Connects to                     |
//! |--------------|-------------|---------------------------------|
//! | `esp_board`  | BoardPort   | ESP32 I2C0, UART1/2, LEDC       |
//! | `log_sink`   | EventSink   | Serial log output               |
//! | `time`       | ClockPort   | ESP32 system timer / host clock |
//!
//! `ConfigPort` is implemented directly by [`crate::config::BoardConfig`].

#[cfg(target_os = "espidf")]
pub mod esp_board;
pub mod log_sink;
pub mod time;
