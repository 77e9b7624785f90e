//! Thin MQTT plumbing over `rumqttc`: a publishing client, a subscribing
//! client that hands deliveries to a callback, and the traits the pipeline
//! code is written against.

pub mod receiver;
pub mod sender;

use async_trait::async_trait;
use rumqttc::{ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions, Packet};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub use rumqttc::QoS;

/// Capacity of the request channel between client handle and event loop.
const REQUEST_CAPACITY: usize = 10;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("unable to connect to MQTT broker {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: ConnectionError,
    },
    #[error("broker refused the connection: {0:?}")]
    Refused(ConnectReturnCode),
    #[error("failed to subscribe to topic {topic}: {reason}")]
    Subscribe { topic: String, reason: String },
    #[error("failed to publish to topic {topic}: {reason}")]
    Publish { topic: String, reason: String },
    #[error("MQTT connection error: {0}")]
    Connection(#[from] ConnectionError),
}

/// Where and how to reach the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerOptions {
    pub host: String,
    pub port: u16,
    pub keep_alive: Duration,
}

impl BrokerOptions {
    pub fn new(host: impl Into<String>, port: u16, keep_alive: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            keep_alive,
        }
    }

    pub(crate) fn mqtt_options(&self, role: &str) -> MqttOptions {
        let client_id = format!("gnss-{}-{}", role, Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, &self.host, self.port);
        options.set_keep_alive(self.keep_alive);
        options
    }
}

/// A connection that makes progress only when polled.
///
/// Deliveries for subscribed topics are dispatched from inside [`Transport::poll`].
#[async_trait]
pub trait Transport: Send {
    /// Services the connection for one network event.
    async fn poll(&mut self) -> Result<(), TransportError>;
}

#[async_trait]
pub trait Publisher: Send {
    async fn publish(
        &mut self,
        topic: &str,
        payload: &str,
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportError>;
}

/// Drives a fresh event loop until the broker acknowledges the connection.
pub(crate) async fn await_connack(
    eventloop: &mut EventLoop,
    options: &BrokerOptions,
) -> Result<(), TransportError> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                return if ack.code == ConnectReturnCode::Success {
                    log::info!("Connected to MQTT broker {}:{}", options.host, options.port);
                    Ok(())
                } else {
                    Err(TransportError::Refused(ack.code))
                };
            }
            Ok(event) => log::debug!("Event before CONNACK: {:?}", event),
            Err(source) => {
                return Err(TransportError::Connect {
                    host: options.host.clone(),
                    port: options.port,
                    source,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ids_are_unique_per_connection() {
        let options = BrokerOptions::new("localhost", 1883, Duration::from_secs(60));

        let a = options.mqtt_options("receiver");
        let b = options.mqtt_options("receiver");

        assert!(a.client_id().starts_with("gnss-receiver-"));
        assert_ne!(a.client_id(), b.client_id());
        assert_eq!(a.broker_address(), ("localhost".to_string(), 1883));
        assert_eq!(a.keep_alive(), Duration::from_secs(60));
    }
}
