//! [`MessagePublisher`] backed by a rumqttc [`AsyncClient`].

use rumqttc::{AsyncClient, QoS};

use mibridge_app::ports::{MessagePublisher, PublishOptions};
use mibridge_domain::error::BridgeError;
use mibridge_domain::qos::Qos;

use crate::error::MqttError;

/// Map a domain QoS level onto rumqttc's.
#[must_use]
pub(crate) fn to_rumqttc(qos: Qos) -> QoS {
    match qos {
        Qos::AtMostOnce => QoS::AtMostOnce,
        Qos::AtLeastOnce => QoS::AtLeastOnce,
        Qos::ExactlyOnce => QoS::ExactlyOnce,
    }
}

/// Cheaply cloneable publish handle.
///
/// A publish resolves once the request is queued for the event loop; broker
/// acknowledgements are handled by the event loop itself.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    pub(crate) fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

impl MessagePublisher for MqttPublisher {
    async fn publish(
        &self,
        topic: &str,
        payload: String,
        options: PublishOptions,
    ) -> Result<(), BridgeError> {
        self.client
            .publish(topic, to_rumqttc(options.qos), options.retain, payload)
            .await
            .map_err(MqttError::from)?;
        Ok(())
    }
}
