//! MQTT broker configuration.

use std::time::Duration;

use rumqttc::{LastWill, MqttOptions, QoS};
use serde::Deserialize;

use mibridge_domain::config::availability_topic;

/// Payload published on the availability topic while the bridge runs.
pub const ONLINE: &str = "online";
/// Payload left behind (last will or shutdown) once the bridge is gone.
pub const OFFLINE: &str = "offline";

/// Configuration for the MQTT connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Base topic prefix for all bridge-owned topics.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Optional broker username.
    pub username: Option<String>,
    /// Optional broker password, only used together with `username`.
    pub password: Option<String>,
    /// Capacity of the outgoing request queue.
    pub channel_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "mibridge".to_string(),
            base_topic: "mibridge".to_string(),
            keep_alive_secs: 30,
            username: None,
            password: None,
            channel_capacity: 64,
        }
    }
}

impl MqttConfig {
    /// Topic carrying the bridge's `online`/`offline` state.
    #[must_use]
    pub fn availability_topic(&self) -> String {
        availability_topic(&self.base_topic)
    }

    /// Build rumqttc options, with a retained `offline` last will on the
    /// availability topic.
    #[must_use]
    pub fn mqtt_options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(
            self.client_id.clone(),
            self.broker_host.clone(),
            self.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(self.keep_alive_secs)));
        options.set_last_will(LastWill::new(
            self.availability_topic(),
            OFFLINE,
            QoS::AtLeastOnce,
            true,
        ));
        if let Some(username) = &self.username {
            options.set_credentials(username.clone(), self.password.clone().unwrap_or_default());
        }
        options
    }
}
