//! Sub-sensors — the virtual channels a physical sensor is split into.

use std::fmt;

use crate::sensor::SensorKind;

/// Home Assistant integration a sub-sensor is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Two-state entities (occupancy, contact).
    BinarySensor,
    /// Numeric readings.
    Sensor,
}

impl Component {
    /// Topic segment for this component.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BinarySensor => "binary_sensor",
            Self::Sensor => "sensor",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One virtual measurement or state channel of a physical sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubSensor {
    Occupancy,
    Contact,
    Battery,
    Voltage,
    Temperature,
    Humidity,
    Pressure,
}

const MOTION: &[SubSensor] = &[SubSensor::Occupancy, SubSensor::Battery, SubSensor::Voltage];
const MAGNET: &[SubSensor] = &[SubSensor::Contact, SubSensor::Battery, SubSensor::Voltage];
const WEATHER: &[SubSensor] = &[
    SubSensor::Temperature,
    SubSensor::Humidity,
    SubSensor::Battery,
    SubSensor::Voltage,
];
const WEATHER_WITH_PRESSURE: &[SubSensor] = &[
    SubSensor::Temperature,
    SubSensor::Humidity,
    SubSensor::Pressure,
    SubSensor::Battery,
    SubSensor::Voltage,
];

impl SubSensor {
    /// Sub-sensors announced for a sensor kind, in publish order.
    #[must_use]
    pub fn for_kind(kind: SensorKind) -> &'static [SubSensor] {
        match kind {
            SensorKind::Motion => MOTION,
            SensorKind::Magnet => MAGNET,
            SensorKind::Weather { pressure: false } => WEATHER,
            SensorKind::Weather { pressure: true } => WEATHER_WITH_PRESSURE,
        }
    }

    /// Short name, used in topics, ids, and as the telemetry JSON field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Occupancy => "occupancy",
            Self::Contact => "contact",
            Self::Battery => "battery",
            Self::Voltage => "voltage",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Pressure => "pressure",
        }
    }

    #[must_use]
    pub fn component(self) -> Component {
        match self {
            Self::Occupancy | Self::Contact => Component::BinarySensor,
            _ => Component::Sensor,
        }
    }

    #[must_use]
    pub fn unit_of_measurement(self) -> Option<&'static str> {
        match self {
            Self::Battery | Self::Humidity => Some("%"),
            Self::Voltage => Some("mV"),
            Self::Temperature => Some("\u{b0}C"),
            Self::Pressure => Some("hPa"),
            Self::Occupancy | Self::Contact => None,
        }
    }

    #[must_use]
    pub fn device_class(self) -> Option<&'static str> {
        match self {
            Self::Occupancy => Some("motion"),
            Self::Contact => Some("door"),
            Self::Battery => Some("battery"),
            Self::Temperature => Some("temperature"),
            Self::Humidity => Some("humidity"),
            Self::Pressure => Some("pressure"),
            Self::Voltage => None,
        }
    }

    #[must_use]
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Self::Voltage => Some("mdi:battery-charging"),
            _ => None,
        }
    }

    /// `(payload_on, payload_off)` for binary sub-sensors.
    ///
    /// The gateway reports `contact: true` for a closed door, so contact
    /// is inverted relative to occupancy.
    #[must_use]
    pub fn binary_payloads(self) -> Option<(bool, bool)> {
        match self {
            Self::Occupancy => Some((true, false)),
            Self::Contact => Some((false, true)),
            _ => None,
        }
    }

    /// Home Assistant template extracting this channel from telemetry JSON.
    #[must_use]
    pub fn value_template(self) -> String {
        format!("{{{{ value_json.{} }}}}", self.as_str())
    }
}

impl fmt::Display for SubSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
