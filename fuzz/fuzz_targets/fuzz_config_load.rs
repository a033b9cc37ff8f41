//! Fuzz target: `BoardConfig::from_json` + pin lookup
//!
//! Feeds arbitrary text to the pin-map parser and, when it parses, looks
//! up every key the bring-up routines use.  Must never panic, and a
//! resolved pin is never negative.
//!
//! cargo fuzz run fuzz_config_load

#![no_main]

use boardcheck::config::BoardConfig;
use boardcheck::pins::{self, PINS_DEVICES, PINS_PWM, PWM_SLOTS};
use libfuzzer_sys::fuzz_target;

const DEVICE_KEYS: [&str; 6] = [
    pins::I2C_SCL,
    pins::I2C_SDA,
    pins::XBEE_UART_TX,
    pins::XBEE_UART_RX,
    pins::GPS_UART_TX,
    pins::GPS_UART_RX,
];

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(cfg) = BoardConfig::from_json(text) else {
        return;
    };

    for key in DEVICE_KEYS {
        if let Ok(pin) = cfg.get(PINS_DEVICES, key) {
            assert!(pin >= 0, "negative pin accepted for {key}");
        }
    }
    for slot in 1..=PWM_SLOTS {
        if let Ok(pin) = cfg.get(PINS_PWM, &pins::pwm_slot_key(slot)) {
            assert!(pin >= 0, "negative pin accepted for s_{slot}");
        }
    }
});
