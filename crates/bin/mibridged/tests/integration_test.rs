//! End-to-end tests for the discovery stack.
//!
//! Each test wires real domain types and the real propagator to an in-memory
//! publisher and checks the exact documents that would reach the broker.

use std::future::Future;
use std::sync::{Arc, Mutex};

use mibridge_app::ports::{MessagePublisher, PublishOptions};
use mibridge_app::services::discovery_propagator::{DiscoveryPropagator, Propagation};
use mibridge_domain::config::{AppConfig, AppInfo, DeviceConfig};
use mibridge_domain::error::BridgeError;
use mibridge_domain::qos::Qos;
use mibridge_domain::sensor::Sensor;
use serde_json::{Value, json};

#[derive(Default)]
struct InMemoryBroker {
    retained: Mutex<Vec<(String, Value, PublishOptions)>>,
}

impl InMemoryBroker {
    fn messages(&self) -> Vec<(String, Value, PublishOptions)> {
        self.retained.lock().unwrap().clone()
    }
}

impl MessagePublisher for InMemoryBroker {
    fn publish(
        &self,
        topic: &str,
        payload: String,
        options: PublishOptions,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let result = serde_json::from_str(&payload)
            .map(|value| {
                self.retained
                    .lock()
                    .unwrap()
                    .push((topic.to_string(), value, options));
            })
            .map_err(BridgeError::from);
        async { result }
    }
}

fn stack(homeassistant: bool) -> (Arc<InMemoryBroker>, DiscoveryPropagator<Arc<InMemoryBroker>>) {
    let broker = Arc::new(InMemoryBroker::default());
    let config = AppConfig {
        app: AppInfo {
            name: "mibridge".to_string(),
            version: "1.4.0".to_string(),
        },
        homeassistant,
        base_topic: "xiaomi".to_string(),
    };
    (Arc::clone(&broker), DiscoveryPropagator::new(broker, config))
}

fn base(sid: &str, name: &str, model: &str) -> Value {
    json!({
        "state_topic": format!("xiaomi/{name}"),
        "json_attributes_topic": format!("xiaomi/{name}"),
        "device": {
            "identifiers": [format!("mibridge_{sid}")],
            "name": name,
            "sw_version": "mibridge 1.4.0",
            "model": model,
            "manufacturer": "Xiaomi",
        },
        "availability_topic": "xiaomi/bridge/state",
    })
}

fn merge(mut base: Value, extra: Value) -> Value {
    let target = base.as_object_mut().unwrap();
    for (key, value) in extra.as_object().unwrap() {
        target.insert(key.clone(), value.clone());
    }
    base
}

// ---------------------------------------------------------------------------
// Magnet sensors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_announce_magnet_sensor_with_exact_documents() {
    let (broker, propagator) = stack(true);
    let sensor = Sensor::new("158d0001ffee00", "magnet");
    let device = DeviceConfig::new("front_door", Qos::AtLeastOnce);

    let outcome = propagator
        .propagate(&sensor, &device, "xiaomi/front_door")
        .await
        .unwrap();
    assert_eq!(outcome, Propagation::Published { count: 3 });

    let model = "MiJia door & window contact sensor (MCCGQ01LM)";
    let base = base("158d0001ffee00", "front_door", model);
    let messages = broker.messages();

    assert_eq!(
        messages[0].0,
        "homeassistant/binary_sensor/158d0001ffee00/contact/config"
    );
    assert_eq!(
        messages[0].1,
        merge(
            base.clone(),
            json!({
                "payload_on": false,
                "payload_off": true,
                "value_template": "{{ value_json.contact }}",
                "device_class": "door",
                "unique_id": "158d0001ffee00_contact_mibridge",
                "name": "front_door_contact",
            })
        )
    );

    assert_eq!(messages[1].0, "homeassistant/sensor/158d0001ffee00/battery/config");
    assert_eq!(
        messages[1].1,
        merge(
            base.clone(),
            json!({
                "unit_of_measurement": "%",
                "device_class": "battery",
                "value_template": "{{ value_json.battery }}",
                "unique_id": "158d0001ffee00_battery_mibridge",
                "name": "front_door_battery",
            })
        )
    );

    assert_eq!(messages[2].0, "homeassistant/sensor/158d0001ffee00/voltage/config");
    assert_eq!(
        messages[2].1,
        merge(
            base,
            json!({
                "unit_of_measurement": "mV",
                "icon": "mdi:battery-charging",
                "value_template": "{{ value_json.voltage }}",
                "unique_id": "158d0001ffee00_voltage_mibridge",
                "name": "front_door_voltage",
            })
        )
    );

    assert!(
        messages
            .iter()
            .all(|(_, _, options)| options.retain && options.qos == Qos::AtLeastOnce)
    );
}

// ---------------------------------------------------------------------------
// Weather sensors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_announce_weather_v1_pressure_in_hectopascal() {
    let (broker, propagator) = stack(true);
    let sensor = Sensor::new("158d0001a2b3c4", "weather.v1");
    let device = DeviceConfig::new("living_room", Qos::ExactlyOnce);

    propagator
        .propagate(&sensor, &device, "xiaomi/living_room")
        .await
        .unwrap();

    let messages = broker.messages();
    assert_eq!(messages.len(), 5);
    let (topic, pressure, options) = &messages[2];
    assert_eq!(topic, "homeassistant/sensor/158d0001a2b3c4/pressure/config");
    assert_eq!(
        *pressure,
        merge(
            base(
                "158d0001a2b3c4",
                "living_room",
                "Aqara temperature, humidity and pressure sensor (WSDCGQ11LM)"
            ),
            json!({
                "unit_of_measurement": "hPa",
                "device_class": "pressure",
                "value_template": "{{ value_json.pressure }}",
                "unique_id": "158d0001a2b3c4_pressure_mibridge",
                "name": "living_room_pressure",
            })
        )
    );
    assert_eq!(options.qos, Qos::ExactlyOnce);
}

#[tokio::test]
async fn should_announce_temperature_in_celsius_for_sensor_ht() {
    let (broker, propagator) = stack(true);
    let sensor = Sensor::new("ht1", "sensor_ht");
    let device = DeviceConfig::new("bedroom", Qos::AtMostOnce);

    propagator.propagate(&sensor, &device, "xiaomi/bedroom").await.unwrap();

    let messages = broker.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].1["unit_of_measurement"], "°C");
    assert_eq!(messages[0].1["device_class"], "temperature");
    assert_eq!(messages[1].1["unit_of_measurement"], "%");
    assert_eq!(messages[1].1["device_class"], "humidity");
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_announce_each_of_many_sensors_exactly_once() {
    let (broker, propagator) = stack(true);
    let device = DeviceConfig::new("room", Qos::AtMostOnce);
    let sensors = [
        Sensor::new("a", "motion"),
        Sensor::new("b", "sensor_motion.aq2"),
        Sensor::new("c", "sensor_magnet.aq2"),
        Sensor::new("d", "ctrl_neutral1"),
    ];

    for _ in 0..3 {
        for sensor in &sensors {
            propagator.propagate(sensor, &device, "xiaomi/room").await.unwrap();
        }
    }

    assert_eq!(broker.messages().len(), 9);
    assert!(sensors.iter().all(|s| propagator.is_propagated(&s.sid)));
}

#[tokio::test]
async fn should_stay_silent_when_homeassistant_disabled() {
    let (broker, propagator) = stack(false);
    let device = DeviceConfig::new("room", Qos::AtLeastOnce);

    let outcome = propagator
        .propagate(&Sensor::new("a", "weather.v1"), &device, "xiaomi/room")
        .await
        .unwrap();

    assert_eq!(outcome, Propagation::Disabled);
    assert!(broker.messages().is_empty());
}
