//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `mibridge.toml` in the working directory (or the path in
//! `MIBRIDGE_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashSet;

use serde::Deserialize;

use mibridge_adapter_mqtt::MqttConfig;
use mibridge_domain::config::{AppConfig, AppInfo, DeviceConfig};
use mibridge_domain::qos::Qos;
use mibridge_domain::sensor::Sensor;

const DEFAULT_PATH: &str = "mibridge.toml";

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Publish Home Assistant discovery documents.
    pub homeassistant: bool,
    /// Identity announced to Home Assistant.
    pub app: AppSection,
    /// Broker settings.
    pub mqtt: MqttConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Sensors announced at startup.
    pub devices: Vec<DeviceEntry>,
}

/// Application identity.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// A sensor known ahead of time, with its per-device settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceEntry {
    pub sid: String,
    pub model: String,
    pub friendly_name: String,
    #[serde(default)]
    pub qos: Qos,
}

impl DeviceEntry {
    #[must_use]
    pub fn sensor(&self) -> Sensor {
        Sensor::new(&self.sid, &self.model)
    }

    #[must_use]
    pub fn device_config(&self) -> DeviceConfig {
        DeviceConfig::new(&self.friendly_name, self.qos)
    }
}

impl Config {
    /// Load configuration from `mibridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MIBRIDGE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("MIBRIDGE_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(val) = var("MIBRIDGE_MQTT_PORT") {
            if let Ok(port) = val.parse() {
                self.mqtt.broker_port = port;
            }
        }
        if let Some(val) = var("MIBRIDGE_BASE_TOPIC") {
            self.mqtt.base_topic = val;
        }
        if let Some(val) = var("MIBRIDGE_HOMEASSISTANT") {
            match val.as_str() {
                "1" | "true" => self.homeassistant = true,
                "0" | "false" => self.homeassistant = false,
                _ => {}
            }
        }
        if let Some(val) = var("MIBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation("mqtt port must be non-zero".to_string()));
        }
        let base = &self.mqtt.base_topic;
        if base.is_empty() || base.contains(['#', '+']) {
            return Err(ConfigError::Validation(format!(
                "invalid mqtt base topic {base:?}"
            )));
        }
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.sid.is_empty() {
                return Err(ConfigError::Validation("device sid must not be empty".to_string()));
            }
            if !seen.insert(device.sid.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate device sid {:?}",
                    device.sid
                )));
            }
        }
        Ok(())
    }

    /// Identity and topic settings for the discovery layer.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            app: AppInfo {
                name: self.app.name.clone(),
                version: self.app.version.clone(),
            },
            homeassistant: self.homeassistant,
            base_topic: self.mqtt.base_topic.clone(),
        }
    }

    /// Topic a device's telemetry is published on.
    #[must_use]
    pub fn telemetry_topic(&self, device: &DeviceEntry) -> String {
        format!("{}/{}", self.mqtt.base_topic, device.friendly_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            homeassistant: true,
            app: AppSection::default(),
            mqtt: MqttConfig::default(),
            logging: LoggingConfig::default(),
            devices: Vec::new(),
        }
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "mibridge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "mibridged=info,mibridge=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
