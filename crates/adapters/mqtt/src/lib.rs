//! # mibridge-adapter-mqtt
//!
//! MQTT adapter — carries discovery documents to the broker.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker and keep the rumqttc event loop running
//! - Implement the `MessagePublisher` port on top of rumqttc
//! - Maintain the bridge availability topic (`<base_topic>/bridge/state`):
//!   `online` after every connect, `offline` on shutdown or as last will
//!
//! ## Dependency rule
//! Same as other adapters: depends on `mibridge-app` and `mibridge-domain`.

mod client;
mod config;
mod error;
mod publisher;

pub use client::MqttClient;
pub use config::{MqttConfig, OFFLINE, ONLINE};
pub use error::MqttError;
pub use publisher::MqttPublisher;
