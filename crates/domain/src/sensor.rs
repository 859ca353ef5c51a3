//! Sensor — a physical device known to the sensor registry.
//!
//! Only the identity (`sid`) and hardware model matter here. Measurement
//! fields (temperature, occupancy, …) travel on the telemetry topic and are
//! never interpreted by the bridge.

use std::fmt;

/// Fallback description for models missing from the description table.
pub const UNKNOWN_MODEL_NAME: &str = "unknown";

/// A physical sensor as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sensor {
    /// Stable, unique hardware identifier.
    pub sid: String,
    /// Raw model string as reported by the gateway.
    pub model: String,
}

impl Sensor {
    /// Create a sensor from its identifier and raw model string.
    pub fn new(sid: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            model: model.into(),
        }
    }

    /// Classify the raw model string.
    #[must_use]
    pub fn model(&self) -> SensorModel {
        SensorModel::parse(&self.model)
    }
}

/// Closed vocabulary of supported hardware models.
///
/// Parsing is total: anything outside the table becomes
/// [`Unsupported`](Self::Unsupported) carrying the original string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorModel {
    /// `motion` — MiJia RTCGQ01LM.
    Motion,
    /// `sensor_motion.aq2` — Aqara RTCGQ11LM.
    MotionAq2,
    /// `sensor_ht` — MiJia WSDCGQ01LM.
    SensorHt,
    /// `weather.v1` — Aqara WSDCGQ11LM.
    WeatherV1,
    /// `magnet` — MiJia MCCGQ01LM.
    Magnet,
    /// `sensor_magnet.aq2` — Aqara MCCGQ11LM.
    MagnetAq2,
    /// Any model string not listed above.
    Unsupported(String),
}

/// What a model measures, which decides the sub-sensors it exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Occupancy detection.
    Motion,
    /// Temperature and humidity, plus barometric pressure when `pressure`.
    Weather { pressure: bool },
    /// Door/window contact.
    Magnet,
}

impl SensorModel {
    /// Classify a raw model string.
    #[must_use]
    pub fn parse(model: &str) -> Self {
        match model {
            "motion" => Self::Motion,
            "sensor_motion.aq2" => Self::MotionAq2,
            "sensor_ht" => Self::SensorHt,
            "weather.v1" => Self::WeatherV1,
            "magnet" => Self::Magnet,
            "sensor_magnet.aq2" => Self::MagnetAq2,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// The raw model string as the gateway reports it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Motion => "motion",
            Self::MotionAq2 => "sensor_motion.aq2",
            Self::SensorHt => "sensor_ht",
            Self::WeatherV1 => "weather.v1",
            Self::Magnet => "magnet",
            Self::MagnetAq2 => "sensor_magnet.aq2",
            Self::Unsupported(raw) => raw,
        }
    }

    /// The measurement family, or `None` for unsupported hardware.
    #[must_use]
    pub fn kind(&self) -> Option<SensorKind> {
        match self {
            Self::Motion | Self::MotionAq2 => Some(SensorKind::Motion),
            Self::SensorHt => Some(SensorKind::Weather { pressure: false }),
            Self::WeatherV1 => Some(SensorKind::Weather { pressure: true }),
            Self::Magnet | Self::MagnetAq2 => Some(SensorKind::Magnet),
            Self::Unsupported(_) => None,
        }
    }

    /// Human-readable product name, `None` for unsupported hardware.
    #[must_use]
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Self::Motion => Some("MiJia human body movement sensor (RTCGQ01LM)"),
            Self::MotionAq2 => {
                Some("Aqara human body movement and illuminance sensor (RTCGQ11LM)")
            }
            Self::SensorHt => Some("MiJia temperature & humidity sensor (WSDCGQ01LM)"),
            Self::WeatherV1 => {
                Some("Aqara temperature, humidity and pressure sensor (WSDCGQ11LM)")
            }
            Self::Magnet => Some("MiJia door & window contact sensor (MCCGQ01LM)"),
            Self::MagnetAq2 => Some("Aqara door & window contact sensor (MCCGQ11LM)"),
            Self::Unsupported(_) => None,
        }
    }

    /// Product name for the discovery device block, `"unknown"` when unmapped.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        self.description().unwrap_or(UNKNOWN_MODEL_NAME)
    }
}

impl fmt::Display for SensorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
