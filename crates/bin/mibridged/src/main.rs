//! # mibridged — mibridge daemon
//!
//! Composition root that wires the MQTT adapter to the discovery service.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise tracing
//! - Connect to the MQTT broker (adapter)
//! - Construct the discovery propagator, injecting the publisher via the port trait
//! - Announce every configured sensor to Home Assistant
//! - Handle graceful shutdown (Ctrl-C), leaving the bridge marked `offline`
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use mibridge_adapter_mqtt::MqttClient;
use mibridge_app::ports::MessagePublisher;
use mibridge_app::services::discovery_propagator::{DiscoveryPropagator, Propagation};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    tracing::info!(
        name = %config.app.name,
        version = %config.app.version,
        homeassistant = config.homeassistant,
        devices = config.devices.len(),
        "mibridged starting"
    );

    let mqtt = MqttClient::connect(&config.mqtt);
    let propagator = DiscoveryPropagator::new(mqtt.publisher(), config.app_config());

    announce_devices(&propagator, &config).await;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");

    mqtt.shutdown().await?;
    Ok(())
}

/// Propagate every configured device, logging failures without aborting startup.
async fn announce_devices<P: MessagePublisher>(
    propagator: &DiscoveryPropagator<P>,
    config: &Config,
) {
    let mut published = 0;
    for device in &config.devices {
        let topic = config.telemetry_topic(device);
        match propagator
            .propagate(&device.sensor(), &device.device_config(), &topic)
            .await
        {
            Ok(Propagation::Published { count }) => published += count,
            Ok(outcome) => tracing::debug!(sid = %device.sid, ?outcome, "nothing published"),
            Err(err) => {
                tracing::error!(sid = %device.sid, error = %err, "failed to propagate sensor");
            }
        }
    }
    tracing::info!(published, "discovery announcement complete");
}
