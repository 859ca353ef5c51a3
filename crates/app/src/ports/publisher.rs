//! Message publisher port — hand a payload to the messaging transport.

use std::future::Future;

use mibridge_domain::error::BridgeError;
use mibridge_domain::qos::Qos;

/// Delivery options for a single publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishOptions {
    pub qos: Qos,
    /// Ask the broker to keep the message for future subscribers.
    pub retain: bool,
}

impl PublishOptions {
    /// Options for a retained publish at `qos`.
    #[must_use]
    pub fn retained(qos: Qos) -> Self {
        Self { qos, retain: true }
    }
}

/// Publishes payloads on a publish/subscribe transport.
pub trait MessagePublisher {
    /// Publish `payload` on `topic`.
    ///
    /// Resolves once the transport has accepted the message.
    fn publish(
        &self,
        topic: &str,
        payload: String,
        options: PublishOptions,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: MessagePublisher + Send + Sync> MessagePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: String,
        options: PublishOptions,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(topic, payload, options)
    }
}
