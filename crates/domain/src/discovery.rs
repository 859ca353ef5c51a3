//! Home Assistant MQTT discovery documents.
//!
//! A discovery document is the flat merge of a [`DiscoveryBase`] shared by
//! every sub-sensor of one physical sensor, the fixed fields of the
//! [`SubSensor`], and the sub-sensor's identity (`unique_id`, `name`).
//! Absent optional fields are omitted from the JSON.

mod sub_sensor;

pub use sub_sensor::{Component, SubSensor};

use serde::Serialize;

use crate::config::{AppConfig, DeviceConfig};
use crate::sensor::Sensor;

/// Root of the Home Assistant discovery topic namespace.
pub const DISCOVERY_PREFIX: &str = "homeassistant";

/// Manufacturer reported for every bridged device.
pub const MANUFACTURER: &str = "Xiaomi";

/// Discovery topic for one sub-sensor of `sid`.
#[must_use]
pub fn config_topic(sid: &str, sub: SubSensor) -> String {
    format!("{DISCOVERY_PREFIX}/{}/{sid}/{sub}/config", sub.component())
}

/// The `device` block grouping sub-sensors under one physical device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub identifiers: Vec<String>,
    pub name: String,
    pub sw_version: String,
    pub model: String,
    pub manufacturer: &'static str,
}

/// Fields common to every sub-sensor of one physical sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryBase {
    pub state_topic: String,
    pub json_attributes_topic: String,
    pub device: DeviceDescriptor,
    pub availability_topic: String,
}

impl DiscoveryBase {
    /// Build the shared fields for `sensor`, reading telemetry from `telemetry_topic`.
    #[must_use]
    pub fn new(
        app: &AppConfig,
        sensor: &Sensor,
        device_config: &DeviceConfig,
        telemetry_topic: &str,
    ) -> Self {
        Self {
            state_topic: telemetry_topic.to_string(),
            json_attributes_topic: telemetry_topic.to_string(),
            device: DeviceDescriptor {
                identifiers: vec![app.device_identifier(&sensor.sid)],
                name: device_config.friendly_name.clone(),
                sw_version: app.sw_version(),
                model: sensor.model().display_name().to_string(),
                manufacturer: MANUFACTURER,
            },
            availability_topic: app.availability_topic(),
        }
    }
}

/// A complete discovery document for one sub-sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryPayload<'a> {
    #[serde(flatten)]
    pub base: &'a DiscoveryBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_off: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub value_template: String,
    pub unique_id: String,
    pub name: String,
}

impl<'a> DiscoveryPayload<'a> {
    /// Combine the shared base with the fixed fields of `sub`.
    #[must_use]
    pub fn new(
        base: &'a DiscoveryBase,
        app: &AppConfig,
        sensor: &Sensor,
        device_config: &DeviceConfig,
        sub: SubSensor,
    ) -> Self {
        let (payload_on, payload_off) = sub.binary_payloads().unzip();
        Self {
            base,
            payload_on,
            payload_off,
            unit_of_measurement: sub.unit_of_measurement(),
            device_class: sub.device_class(),
            icon: sub.icon(),
            value_template: sub.value_template(),
            unique_id: format!("{}_{sub}_{}", sensor.sid, app.app.name),
            name: format!("{}_{sub}", device_config.friendly_name),
        }
    }
}

/// A discovery document ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryMessage {
    pub sub_sensor: SubSensor,
    pub topic: String,
    pub payload: String,
}

impl DiscoveryMessage {
    /// Render the document announcing `sub` of `sensor`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the payload cannot be encoded.
    pub fn build(
        base: &DiscoveryBase,
        app: &AppConfig,
        sensor: &Sensor,
        device_config: &DeviceConfig,
        sub: SubSensor,
    ) -> Result<Self, serde_json::Error> {
        let payload = DiscoveryPayload::new(base, app, sensor, device_config, sub);
        Ok(Self {
            sub_sensor: sub,
            topic: config_topic(&sensor.sid, sub),
            payload: serde_json::to_string(&payload)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppInfo;
    use crate::qos::Qos;
    use serde_json::json;

    fn app() -> AppConfig {
        AppConfig {
            app: AppInfo {
                name: "mibridge".to_string(),
                version: "0.3.0".to_string(),
            },
            homeassistant: true,
            base_topic: "mibridge".to_string(),
        }
    }

    fn render(sensor: &Sensor, sub: SubSensor) -> (String, serde_json::Value) {
        let app = app();
        let device = DeviceConfig::new("hall", Qos::AtLeastOnce);
        let base = DiscoveryBase::new(&app, sensor, &device, "mibridge/hall");
        let msg = DiscoveryMessage::build(&base, &app, sensor, &device, sub).unwrap();
        (msg.topic, serde_json::from_str(&msg.payload).unwrap())
    }

    #[test]
    fn should_build_binary_sensor_topic_for_occupancy() {
        assert_eq!(
            config_topic("abc", SubSensor::Occupancy),
            "homeassistant/binary_sensor/abc/occupancy/config"
        );
        assert_eq!(
            config_topic("abc", SubSensor::Pressure),
            "homeassistant/sensor/abc/pressure/config"
        );
    }

    #[test]
    fn should_render_full_occupancy_document() {
        let sensor = Sensor::new("158d000112", "motion");
        let (topic, payload) = render(&sensor, SubSensor::Occupancy);
        assert_eq!(topic, "homeassistant/binary_sensor/158d000112/occupancy/config");
        assert_eq!(
            payload,
            json!({
                "state_topic": "mibridge/hall",
                "json_attributes_topic": "mibridge/hall",
                "device": {
                    "identifiers": ["mibridge_158d000112"],
                    "name": "hall",
                    "sw_version": "mibridge 0.3.0",
                    "model": "MiJia human body movement sensor (RTCGQ01LM)",
                    "manufacturer": "Xiaomi",
                },
                "availability_topic": "mibridge/bridge/state",
                "payload_on": true,
                "payload_off": false,
                "value_template": "{{ value_json.occupancy }}",
                "device_class": "motion",
                "unique_id": "158d000112_occupancy_mibridge",
                "name": "hall_occupancy",
            })
        );
    }

    #[test]
    fn should_render_voltage_without_device_class() {
        let sensor = Sensor::new("158d000112", "magnet");
        let (_, payload) = render(&sensor, SubSensor::Voltage);
        assert_eq!(payload["unit_of_measurement"], "mV");
        assert_eq!(payload["icon"], "mdi:battery-charging");
        assert!(payload.get("device_class").is_none());
        assert!(payload.get("payload_on").is_none());
    }

    #[test]
    fn should_render_inverted_contact_payloads() {
        let sensor = Sensor::new("158d000112", "sensor_magnet.aq2");
        let (_, payload) = render(&sensor, SubSensor::Contact);
        assert_eq!(payload["payload_on"], false);
        assert_eq!(payload["payload_off"], true);
        assert_eq!(payload["device_class"], "door");
    }

    #[test]
    fn should_report_unknown_model_for_unmapped_hardware() {
        let sensor = Sensor::new("158d000112", "plug");
        let (_, payload) = render(&sensor, SubSensor::Battery);
        assert_eq!(payload["device"]["model"], "unknown");
        assert_eq!(payload["unit_of_measurement"], "%");
    }
}
