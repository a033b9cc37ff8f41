//! Bus-level helpers shared by the device sequences.

pub mod pwm_sweep;
pub mod register;
