//! Discovery propagator — announces sensors to Home Assistant.
//!
//! Each physical sensor is split into sub-sensors according to its model and
//! every sub-sensor gets one retained discovery document. A sensor is
//! announced at most once per process lifetime: its `sid` is recorded before
//! the first publish and stays recorded even if a publish fails.

use mibridge_domain::config::{AppConfig, DeviceConfig};
use mibridge_domain::discovery::{DiscoveryBase, DiscoveryMessage, SubSensor};
use mibridge_domain::error::BridgeError;
use mibridge_domain::sensor::Sensor;

use crate::ports::{MessagePublisher, PublishOptions};
use crate::services::propagated_set::PropagatedSet;

/// What a call to [`DiscoveryPropagator::propagate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Home Assistant integration is turned off.
    Disabled,
    /// The sensor was announced by an earlier call.
    AlreadyPropagated,
    /// The model has no discovery mapping; nothing was published.
    Unsupported,
    /// `count` discovery documents were published.
    Published { count: usize },
}

/// Application service publishing Home Assistant discovery documents.
pub struct DiscoveryPropagator<P> {
    publisher: P,
    config: AppConfig,
    propagated: PropagatedSet,
}

impl<P: MessagePublisher> DiscoveryPropagator<P> {
    /// Create a propagator publishing through `publisher`.
    pub fn new(publisher: P, config: AppConfig) -> Self {
        Self {
            publisher,
            config,
            propagated: PropagatedSet::new(),
        }
    }

    /// Whether `sid` needs no further announcement.
    ///
    /// Always `true` when Home Assistant integration is disabled.
    #[must_use]
    pub fn is_propagated(&self, sid: &str) -> bool {
        !self.config.homeassistant || self.propagated.contains(sid)
    }

    /// Forget that `sid` was announced so the next
    /// [`propagate`](Self::propagate) call publishes it again.
    ///
    /// Returns whether `sid` had been recorded.
    pub fn forget(&self, sid: &str) -> bool {
        self.propagated.remove(sid)
    }

    /// Announce `sensor` unless it was already announced.
    ///
    /// Discovery documents are published one after another, in the order
    /// given by [`SubSensor::for_kind`], retained and at the device's QoS.
    ///
    /// # Errors
    ///
    /// Returns the first [`BridgeError`] raised while encoding or publishing.
    /// The sensor stays marked as propagated and is not retried.
    #[tracing::instrument(
        skip(self, sensor, device_config),
        fields(sid = %sensor.sid, model = %sensor.model)
    )]
    pub async fn propagate(
        &self,
        sensor: &Sensor,
        device_config: &DeviceConfig,
        telemetry_topic: &str,
    ) -> Result<Propagation, BridgeError> {
        if !self.config.homeassistant {
            return Ok(Propagation::Disabled);
        }
        if !self.propagated.insert(&sensor.sid) {
            tracing::trace!("sensor already propagated");
            return Ok(Propagation::AlreadyPropagated);
        }

        let model = sensor.model();
        let Some(kind) = model.kind() else {
            tracing::warn!(
                model = %model,
                "model not implemented, please create an issue or pull request on GitHub"
            );
            return Ok(Propagation::Unsupported);
        };

        let base = DiscoveryBase::new(&self.config, sensor, device_config, telemetry_topic);
        let options = PublishOptions::retained(device_config.qos);
        let subs = SubSensor::for_kind(kind);
        for &sub in subs {
            let message = DiscoveryMessage::build(&base, &self.config, sensor, device_config, sub)?;
            tracing::debug!(topic = %message.topic, "publishing discovery config");
            self.publisher
                .publish(&message.topic, message.payload, options)
                .await?;
        }

        tracing::info!(count = subs.len(), "sensor propagated to Home Assistant");
        Ok(Propagation::Published { count: subs.len() })
    }
}
