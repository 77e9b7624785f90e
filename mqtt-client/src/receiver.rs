use crate::{BrokerOptions, QoS, Transport, TransportError, await_connack};
use async_trait::async_trait;
use rumqttc::{
    AsyncClient,
    Event::{self, Incoming, Outgoing},
    EventLoop,
    Packet::{ConnAck, Publish, SubAck},
    SubscribeReasonCode,
};

/// Invoked with the payload of every message received on a subscribed topic.
pub type MessageCallback = Box<dyn Fn(String) + Send + Sync>;

/// Subscribing MQTT client.
///
/// The event loop reconnects on the next poll after a dropped connection,
/// always with a clean session. Every acknowledged subscription is therefore
/// replayed when a new CONNACK arrives, otherwise the receiver would stay
/// connected but deaf.
pub struct MqttReceiver {
    client: AsyncClient,
    eventloop: EventLoop,
    on_message: Option<MessageCallback>,
    subscriptions: Vec<(String, QoS)>,
}

impl MqttReceiver {
    /// Creates the client without touching the network.
    pub fn new(options: &BrokerOptions) -> Self {
        let (client, eventloop) =
            AsyncClient::new(options.mqtt_options("receiver"), crate::REQUEST_CAPACITY);

        Self {
            client,
            eventloop,
            on_message: None,
            subscriptions: Vec::new(),
        }
    }

    /// Creates the client and waits for the broker's CONNACK.
    pub async fn connect(options: &BrokerOptions) -> Result<Self, TransportError> {
        let mut receiver = Self::new(options);
        await_connack(&mut receiver.eventloop, options).await?;
        Ok(receiver)
    }

    /// Registers the delivery callback, replacing any previous one.
    ///
    /// The callback runs inside [`Transport::poll`] and must not block.
    pub fn set_message_callback<F>(&mut self, callback: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.on_message = Some(Box::new(callback));
    }

    /// Subscribes and waits for the broker's SUBACK.
    ///
    /// Messages that arrive while waiting are dispatched as usual.
    pub async fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), TransportError> {
        let subscribe_error = |reason: String| TransportError::Subscribe {
            topic: topic.to_string(),
            reason,
        };

        self.client
            .subscribe(topic, qos)
            .await
            .map_err(|e| subscribe_error(e.to_string()))?;

        loop {
            let event = self
                .eventloop
                .poll()
                .await
                .map_err(|e| subscribe_error(e.to_string()))?;

            if let Incoming(SubAck(ack)) = &event {
                if ack
                    .return_codes
                    .iter()
                    .any(|code| matches!(code, SubscribeReasonCode::Failure))
                {
                    return Err(subscribe_error("rejected by broker".to_string()));
                }

                log::info!("Subscribed to topic: {}", topic);
                self.subscriptions.push((topic.to_string(), qos));
                return Ok(());
            }

            self.handle_event(event);
        }
    }

    pub async fn disconnect(mut self) {
        if let Err(e) = self.client.disconnect().await {
            log::error!("Error disconnecting MQTT client: {}", e);
            return;
        }

        loop {
            match self.eventloop.poll().await {
                Ok(Outgoing(rumqttc::Outgoing::Disconnect)) | Err(_) => break,
                Ok(event) => log::debug!("Event while disconnecting: {:?}", event),
            }
        }
    }

    fn handle_event(&self, event: Event) {
        match event {
            Incoming(Publish(msg)) => match String::from_utf8(msg.payload.to_vec()) {
                Ok(text) => {
                    log::debug!("Message received on {}: {:?}", msg.topic, text);
                    if let Some(callback) = &self.on_message {
                        callback(text);
                    }
                }
                Err(e) => log::warn!("Error converting payload: {:?}", e),
            },
            Incoming(ConnAck(ack)) => {
                log::warn!("Reconnected to MQTT broker ({:?}), resubscribing", ack.code);
                self.resubscribe();
            }
            Incoming(pk) => log::debug!("Incoming event: {:?}", pk),
            Outgoing(ev) => log::debug!("Outgoing event: {:?}", ev),
        }
    }

    /// Queues SUBSCRIBE for every known topic; sent on the following polls.
    fn resubscribe(&self) {
        for (topic, qos) in &self.subscriptions {
            if let Err(e) = self.client.try_subscribe(topic.clone(), *qos) {
                log::error!("Failed to resubscribe to topic {}: {}", topic, e);
            }
        }
    }
}

#[async_trait]
impl Transport for MqttReceiver {
    async fn poll(&mut self) -> Result<(), TransportError> {
        let event = self.eventloop.poll().await?;
        self.handle_event(event);
        Ok(())
    }
}
