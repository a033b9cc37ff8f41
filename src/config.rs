//! Board pin map.
//!
//! Loaded once from `config.json` at boot and read-only afterwards.  The
//! file is a JSON object of sections, each mapping a logical pin name to a
//! GPIO number:
//!
//! ```json
//! {
//!   "pins_devices": { "i2c_scl": 22, "i2c_sda": 21, "xbee_uart_tx": 17,
//!                     "xbee_uart_rx": 16, "gps_uart_rx": 34 },
//!   "pins_pwm":     { "s_1": 12, "s_2": 13, "s_3": 14, "s_4": 15,
//!                     "s_5": 25, "s_6": 26, "s_7": 27, "s_8": 32 }
//! }
//! ```
//!
//! Sections the bring-up layer does not know about are kept but ignored.

use std::collections::BTreeMap;
use std::path::Path;

use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::app::ports::ConfigPort;
use crate::error::ConfigError;

/// GPIO number, as the ESP-IDF drivers take it.
pub type PinId = i32;

/// Default location of the pin map on the board's filesystem.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Immutable section → key → value map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardConfig {
    sections: BTreeMap<String, Value>,
}

impl BoardConfig {
    /// Read and parse the config file.  Any failure here is fatal to the
    /// session.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let text = std::fs::read_to_string(path).map_err(|e| {
            error!("[config] load {} \t\t\t[FAILED]: {}", source, e);
            ConfigError::Load {
                source: source.clone(),
                reason: e.to_string(),
            }
        })?;

        Self::parse(&source, &text)
    }

    /// Parse an in-memory JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::parse("<inline>", text)
    }

    fn parse(source: &str, text: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<Self>(text) {
            Ok(cfg) => {
                info!("[config] load \t\t\t\t[OK]");
                Ok(cfg)
            }
            Err(e) => {
                error!("[config] load {} \t\t\t[FAILED]: {}", source, e);
                Err(ConfigError::Load {
                    source: source.into(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// A whole section, if present and an object.
    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.sections.get(name).and_then(Value::as_object)
    }

    /// Names of every section in the file.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Resolve `section.key` to a GPIO number.
    ///
    /// Absent section or key is [`ConfigError::Missing`]; no default is
    /// substituted.
    pub fn get(&self, section: &str, key: &str) -> Result<PinId, ConfigError> {
        let value = self
            .section(section)
            .and_then(|s| s.get(key))
            .ok_or_else(|| ConfigError::missing(section, key))?;

        value
            .as_i64()
            .and_then(|n| PinId::try_from(n).ok())
            .filter(|n| *n >= 0)
            .ok_or_else(|| ConfigError::InvalidPin {
                section: section.into(),
                key: key.into(),
            })
    }
}

impl ConfigPort for BoardConfig {
    fn pin(&self, section: &str, key: &str) -> Result<PinId, ConfigError> {
        self.get(section, key)
    }
}
