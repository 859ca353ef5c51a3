//! MQTT adapter error types.

use mibridge_domain::error::BridgeError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request (invalid topic, closed event loop, …).
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),

    /// The background event-loop task ended abnormally.
    #[error("MQTT event loop task failed")]
    Driver(#[from] tokio::task::JoinError),
}

impl MqttError {
    /// Convert into a [`BridgeError::Publish`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> BridgeError {
        BridgeError::Publish(Box::new(self))
    }
}

impl From<MqttError> for BridgeError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
