//! Application identity and per-device settings.

use serde::Deserialize;

use crate::qos::Qos;

/// Name and version announced to Home Assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Application name, used in device and entity identifiers.
    pub name: String,
    /// Application version, reported as the device software version.
    pub version: String,
}

/// Process-wide settings the discovery layer relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Identity of this bridge.
    pub app: AppInfo,
    /// Whether Home Assistant discovery is enabled at all.
    pub homeassistant: bool,
    /// Prefix of every topic the bridge owns (e.g. `mibridge`).
    pub base_topic: String,
}

impl AppConfig {
    /// Topic carrying the bridge's `online`/`offline` availability.
    #[must_use]
    pub fn availability_topic(&self) -> String {
        availability_topic(&self.base_topic)
    }

    /// Device identifier shared by all sub-sensors of one physical sensor.
    #[must_use]
    pub fn device_identifier(&self, sid: &str) -> String {
        format!("{}_{sid}", self.app.name)
    }

    /// Software version string shown on the device card.
    #[must_use]
    pub fn sw_version(&self) -> String {
        format!("{} {}", self.app.name, self.app.version)
    }
}

/// Build the availability topic for a base topic prefix.
#[must_use]
pub fn availability_topic(base_topic: &str) -> String {
    format!("{base_topic}/bridge/state")
}

/// Per-device settings supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    /// Display name, also used to derive entity names.
    pub friendly_name: String,
    /// QoS used for every discovery publish of this device.
    #[serde(default)]
    pub qos: Qos,
}

impl DeviceConfig {
    /// Create device settings.
    pub fn new(friendly_name: impl Into<String>, qos: Qos) -> Self {
        Self {
            friendly_name: friendly_name.into(),
            qos,
        }
    }
}
