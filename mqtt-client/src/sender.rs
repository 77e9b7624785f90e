use crate::{BrokerOptions, Publisher, QoS, TransportError, await_connack};
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, Outgoing};

pub struct MqttSender {
    client: AsyncClient,
    eventloop: EventLoop,
}

impl MqttSender {
    /// Creates the client without touching the network.
    pub fn new(options: &BrokerOptions) -> Self {
        let (client, eventloop) =
            AsyncClient::new(options.mqtt_options("sender"), crate::REQUEST_CAPACITY);

        Self { client, eventloop }
    }

    /// Creates the client and waits for the broker's CONNACK.
    pub async fn connect(options: &BrokerOptions) -> Result<Self, TransportError> {
        let mut sender = Self::new(options);
        await_connack(&mut sender.eventloop, options).await?;
        Ok(sender)
    }

    /// Sends DISCONNECT and drives the event loop until it is on the wire.
    pub async fn disconnect(mut self) {
        if let Err(e) = self.client.disconnect().await {
            log::error!("Error disconnecting MQTT client: {}", e);
            return;
        }

        loop {
            match self.eventloop.poll().await {
                Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                Ok(event) => log::debug!("Event while disconnecting: {:?}", event),
            }
        }
    }

    /// Polls until the queued PUBLISH has been written out.
    async fn flush(&mut self, topic: &str) -> Result<(), TransportError> {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Outgoing(Outgoing::Publish(mid))) => {
                    log::info!("Message with mid {} published successfully.", mid);
                    return Ok(());
                }
                Ok(event) => log::debug!("Event while publishing: {:?}", event),
                Err(e) => {
                    return Err(TransportError::Publish {
                        topic: topic.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl Publisher for MqttSender {
    async fn publish(
        &mut self,
        topic: &str,
        payload: &str,
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportError> {
        self.client
            .publish(topic, qos, retain, payload.as_bytes())
            .await
            .map_err(|e| TransportError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;

        self.flush(topic).await?;

        log::info!("Published message {} to topic: {}", payload, topic);
        Ok(())
    }
}
