//! Broker connection — owns the rumqttc event loop and bridge availability.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Outgoing, Packet, QoS};
use tokio::task::JoinHandle;

use crate::config::{MqttConfig, OFFLINE, ONLINE};
use crate::error::MqttError;
use crate::publisher::MqttPublisher;

/// Pause between polls after a connection error; rumqttc reconnects on the next poll.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// How long [`MqttClient::shutdown`] waits for the event loop to flush.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A live connection to the MQTT broker.
///
/// The event loop runs on a background task that also republishes `online`
/// on the availability topic after every (re)connect.
pub struct MqttClient {
    client: AsyncClient,
    availability: Arc<Availability>,
    driver: Option<JoinHandle<()>>,
}

impl MqttClient {
    /// Start connecting to the broker described by `config`.
    ///
    /// Returns immediately; the connection is established by the background
    /// task. Must be called from within a tokio runtime.
    #[must_use]
    pub fn connect(config: &MqttConfig) -> Self {
        let (client, eventloop) = AsyncClient::new(config.mqtt_options(), config.channel_capacity);
        let topic = config.availability_topic();
        let availability = Arc::new(Availability::new(client.clone(), topic));

        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            client_id = %config.client_id,
            "connecting to MQTT broker"
        );

        let driver = tokio::spawn(drive(eventloop, Arc::clone(&availability)));

        Self {
            client,
            availability,
            driver: Some(driver),
        }
    }

    /// A publish handle for the application layer.
    #[must_use]
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher::new(self.client.clone())
    }

    /// Mark the bridge `offline`, disconnect, and stop the event loop.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the final requests cannot be queued,
    /// or [`MqttError::Driver`] if the event-loop task panicked.
    pub async fn shutdown(mut self) -> Result<(), MqttError> {
        self.availability.announce_offline().await?;
        self.client.disconnect().await?;

        if let Some(mut driver) = self.driver.take() {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut driver).await {
                Ok(joined) => joined?,
                Err(_) => {
                    tracing::warn!("MQTT event loop did not stop in time, aborting");
                    driver.abort();
                }
            }
        }

        tracing::info!("MQTT client stopped");
        Ok(())
    }
}

impl Drop for MqttClient {
    fn drop(&mut self) {
        self.availability.cancel_online();
        if let Some(driver) = self.driver.take() {
            driver.abort();
            tracing::debug!("MQTT event loop task aborted");
        }
    }
}

/// The retained state published on the availability topic.
struct Availability {
    client: AsyncClient,
    topic: String,
    /// In-flight `online` announcement, if any.
    online: Mutex<Option<JoinHandle<()>>>,
}

impl Availability {
    fn new(client: AsyncClient, topic: String) -> Self {
        Self {
            client,
            topic,
            online: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.online.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a retained `online` without blocking the caller.
    ///
    /// The event loop drains the request queue, so it must never wait for
    /// room in it itself: the publish runs on its own task instead.
    fn announce_online(&self) {
        let client = self.client.clone();
        let topic = self.topic.clone();
        let task = tokio::spawn(async move {
            if let Err(err) = client.publish(topic, QoS::AtLeastOnce, true, ONLINE).await {
                tracing::warn!(error = %err, "failed to announce bridge availability");
            }
        });
        if let Some(previous) = self.pending().replace(task) {
            previous.abort();
        }
    }

    /// Drop an `online` announcement that has not been queued yet.
    fn cancel_online(&self) {
        if let Some(task) = self.pending().take() {
            task.abort();
        }
    }

    /// Queue a retained `offline`, after any `online` already queued.
    async fn announce_offline(&self) -> Result<(), MqttError> {
        self.cancel_online();
        self.client
            .publish(&self.topic, QoS::AtLeastOnce, true, OFFLINE)
            .await?;
        Ok(())
    }
}

/// What the event loop should do after handling one event.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Announce,
    Stop,
}

fn classify(event: &Event) -> Step {
    match event {
        Event::Incoming(Packet::ConnAck(_)) => Step::Announce,
        Event::Outgoing(Outgoing::Disconnect) => Step::Stop,
        _ => Step::Continue,
    }
}

async fn drive(mut eventloop: EventLoop, availability: Arc<Availability>) {
    loop {
        match eventloop.poll().await {
            Ok(event) => match classify(&event) {
                Step::Announce => {
                    tracing::info!("connected to MQTT broker");
                    availability.announce_online();
                }
                Step::Stop => {
                    tracing::debug!("MQTT disconnect sent");
                    break;
                }
                Step::Continue => tracing::trace!(?event, "MQTT event"),
            },
            Err(err) => {
                tracing::error!(error = %err, "MQTT connection error");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}
