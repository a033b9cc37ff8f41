//! Per-device bring-up sequences.
//!
//! | Device | Bus          | Proof of life                       |
//! |--------|--------------|-------------------------------------|
//! | `mpu`  | I²C @100 kHz | register writes ACKed, bypass set   |
//! | `xbee` | UART 1       | exactly `OK\r` after `+++`          |
//! | `gps`  | UART 2       | any line feed in the NMEA stream    |

pub mod gps;
pub mod mpu;
pub mod xbee;
